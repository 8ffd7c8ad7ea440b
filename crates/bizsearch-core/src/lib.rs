mod app_config;
mod business;
mod config;
pub mod expand;
pub mod geo;
pub mod search;
pub mod states;
pub mod validate;

pub use app_config::{AppConfig, Environment};
pub use business::Business;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use expand::{expand_radius, expand_radius_multi, DistanceMatch, RadiusExpansion};
pub use geo::{haversine_distance, is_within_radius, GeoPoint, RADIUS_EXPANSION_SEQUENCE};
pub use search::{
    BusinessStore, LocationFilter, SearchOutcome, SearchParams, SearchService, StoreFilter,
    DEFAULT_RADIUS_MILES, MAX_RESULTS,
};
pub use validate::{validate_search_request, RawLocation, RawSearchRequest, ValidationError};
