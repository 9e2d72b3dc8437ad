//! Engine configuration.

use std::env;

use tracing::warn;

/// Tunables for feed construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchmakerConfig {
    /// Page size when the caller does not specify one.
    pub default_page_size: usize,
    /// Upper bound on caller-requested page sizes.
    pub max_page_size: usize,
    /// Symmetric age band around the requester's age, in years.
    pub age_band_years: u8,
    /// Maximum distance radius in miles. `None` disables distance
    /// filtering; candidates with unknown distance are never filtered
    /// either way.
    pub max_distance_miles: Option<f64>,
}

impl Default for MatchmakerConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 50,
            age_band_years: 10,
            max_distance_miles: None,
        }
    }
}

impl MatchmakerConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// - `MATCHMAKER_PAGE_SIZE`
    /// - `MATCHMAKER_MAX_PAGE_SIZE`
    /// - `MATCHMAKER_AGE_BAND_YEARS`
    /// - `MATCHMAKER_MAX_DISTANCE_MILES`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_page_size: parse_var("MATCHMAKER_PAGE_SIZE", defaults.default_page_size),
            max_page_size: parse_var("MATCHMAKER_MAX_PAGE_SIZE", defaults.max_page_size),
            age_band_years: parse_var("MATCHMAKER_AGE_BAND_YEARS", defaults.age_band_years),
            max_distance_miles: env::var("MATCHMAKER_MAX_DISTANCE_MILES")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(raw, "ignoring unparseable MATCHMAKER_MAX_DISTANCE_MILES");
                        None
                    }
                }),
        }
    }
}

fn parse_var<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, raw, "ignoring unparseable config value");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchmakerConfig::default();
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.age_band_years, 10);
        assert_eq!(config.max_distance_miles, None);
    }
}
