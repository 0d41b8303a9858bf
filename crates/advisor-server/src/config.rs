//! Server Configuration
//!
//! Everything comes from the environment (after `.env` is loaded). Values
//! that fail to parse fall back to their defaults with a warning.

use std::path::PathBuf;
use std::str::FromStr;

use risk_advisor::AdvisorConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// JSON catalog file; the built-in seed catalog when unset
    pub catalog_path: Option<PathBuf>,

    pub advisor: AdvisorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            catalog_path: None,
            advisor: AdvisorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let advisor = defaults.advisor;

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            catalog_path: lookup("CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            advisor: AdvisorConfig {
                top_n: parse_or(&lookup, "ADVISOR_TOP_N", advisor.top_n),
                sector_bonus: parse_or(&lookup, "ADVISOR_SECTOR_BONUS", advisor.sector_bonus),
                risk_distance_penalty: parse_or(
                    &lookup,
                    "ADVISOR_RISK_DISTANCE_PENALTY",
                    advisor.risk_distance_penalty,
                ),
                concentration_threshold: parse_or(
                    &lookup,
                    "ADVISOR_CONCENTRATION_THRESHOLD",
                    advisor.concentration_threshold,
                ),
                deviation_threshold: parse_or(
                    &lookup,
                    "ADVISOR_DEVIATION_THRESHOLD",
                    advisor.deviation_threshold,
                ),
                ..advisor
            },
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.catalog_path.is_none());
        assert_eq!(config.advisor, AdvisorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CATALOG_PATH", "data/catalog.json"),
            ("ADVISOR_TOP_N", "8"),
            ("ADVISOR_CONCENTRATION_THRESHOLD", "0.35"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.catalog_path, Some(PathBuf::from("data/catalog.json")));
        assert_eq!(config.advisor.top_n, 8);
        assert_eq!(config.advisor.concentration_threshold, dec!(0.35));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let vars = [("ADVISOR_TOP_N", "lots"), ("CATALOG_PATH", " ")];
        let config = ServerConfig::from_lookup(lookup(&vars));
        assert_eq!(config.advisor.top_n, 5);
        assert!(config.catalog_path.is_none());
    }
}
