use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One directory entry as stored in the `businesses` table.
///
/// Records are immutable for the duration of a search; the search layers only
/// ever read them out of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub city: String,
    /// Two-letter US state code, upper-case (see [`crate::states`]).
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Business {
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

impl std::fmt::Display for Business {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.city, self.state)
    }
}
