//! Fixed table of valid US state codes (50 states plus DC).

pub const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// True when `code` is a member of the fixed table. Expects upper-case input;
/// callers normalize before checking.
#[must_use]
pub fn is_valid_state_code(code: &str) -> bool {
    US_STATE_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_fifty_states_and_dc() {
        assert_eq!(US_STATE_CODES.len(), 51);
        for code in US_STATE_CODES {
            assert!(is_valid_state_code(code));
        }
    }

    #[test]
    fn rejects_unknown_and_lowercase_codes() {
        assert!(!is_valid_state_code("XX"));
        assert!(!is_valid_state_code("ca"));
        assert!(!is_valid_state_code(""));
    }
}
