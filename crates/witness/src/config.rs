//! Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use zkmix_smt::{SmtError, MAX_DEPTH};

/// Tree depth used when none is given
pub const DEFAULT_TREE_DEPTH: u32 = 20;

/// Witness file written when none is given
pub const DEFAULT_OUTPUT: &str = "input.json";

/// Witness builder configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Number of non-root tree levels
    pub depth: u32,
    /// Reject repeated nullifiers and coins
    pub strict: bool,
    /// Where the witness file is written
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
            strict: true,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source, falling back to defaults
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            depth: var("ZKMIX_TREE_DEPTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.depth),
            strict: var("ZKMIX_STRICT")
                .and_then(|s| match s.trim().to_lowercase().as_str() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                })
                .unwrap_or(defaults.strict),
            output: var("ZKMIX_OUTPUT").map(PathBuf::from).unwrap_or(defaults.output),
        }
    }

    /// Check the depth against the tree's limit
    pub fn validate(&self) -> Result<(), SmtError> {
        if self.depth > MAX_DEPTH {
            return Err(SmtError::InvalidDepth { depth: self.depth, max: MAX_DEPTH });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = from_map(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.depth, DEFAULT_TREE_DEPTH);
        assert!(config.strict);
        assert_eq!(config.output, PathBuf::from("input.json"));
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_map(&[
            ("ZKMIX_TREE_DEPTH", "8"),
            ("ZKMIX_STRICT", "false"),
            ("ZKMIX_OUTPUT", "out/witness.json"),
        ]);
        assert_eq!(config.depth, 8);
        assert!(!config.strict);
        assert_eq!(config.output, PathBuf::from("out/witness.json"));
    }

    #[test]
    fn test_unparsable_depth_falls_back() {
        let config = from_map(&[("ZKMIX_TREE_DEPTH", "deep"), ("ZKMIX_STRICT", "TRUE")]);
        assert_eq!(config.depth, DEFAULT_TREE_DEPTH);
        assert!(config.strict);
    }

    #[test]
    fn test_only_explicit_values_disable_strict() {
        for value in ["yes", "on", "enabled", "off", ""] {
            assert!(from_map(&[("ZKMIX_STRICT", value)]).strict, "{value:?}");
        }
        assert!(!from_map(&[("ZKMIX_STRICT", "0")]).strict);
        assert!(!from_map(&[("ZKMIX_STRICT", " False ")]).strict);
        assert!(from_map(&[("ZKMIX_STRICT", "1")]).strict);
    }

    #[test]
    fn test_validate_depth() {
        assert!(Config::default().validate().is_ok());
        let config = Config { depth: MAX_DEPTH + 1, ..Config::default() };
        assert_eq!(
            config.validate(),
            Err(SmtError::InvalidDepth { depth: MAX_DEPTH + 1, max: MAX_DEPTH })
        );
    }
}
