//! Eviction Policy Module
//!
//! Defines the closed set of eviction policies a cache can be configured
//! with. Victim selection is dispatched by pattern matching in the store,
//! never by string comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// == Eviction Policy ==
/// Per-cache eviction policy.
///
/// Victim selection and tie-breaks:
/// - `Lru`: least recently accessed entry; recency is a total order, so no
///   tie-break is needed.
/// - `Lfu`: entry with the minimum access count; ties are broken by
///   insertion age, oldest first.
/// - `Fifo`: oldest inserted entry, irrespective of access.
/// - `Ttl`: expired entries are always swept before policy eviction; when
///   nothing is expired this behaves like `Fifo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    #[default]
    Lru,
    Lfu,
    Fifo,
    Ttl,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Fifo => "fifo",
            EvictionPolicy::Ttl => "ttl",
        };
        f.write_str(name)
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    /// Parses a policy name, case-insensitively.
    ///
    /// An unrecognized name is a configuration error, never a silent
    /// fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            "fifo" => Ok(EvictionPolicy::Fifo),
            "ttl" => Ok(EvictionPolicy::Ttl),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse_known_names() {
        assert_eq!("lru".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!("LFU".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lfu);
        assert_eq!("fifo".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Fifo);
        assert_eq!("Ttl".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Ttl);
    }

    #[test]
    fn test_policy_parse_unknown_name() {
        let result = "mru".parse::<EvictionPolicy>();
        assert!(matches!(result, Err(ConfigError::UnknownPolicy(_))));
    }

    #[test]
    fn test_policy_display_round_trip() {
        for policy in [
            EvictionPolicy::Lru,
            EvictionPolicy::Lfu,
            EvictionPolicy::Fifo,
            EvictionPolicy::Ttl,
        ] {
            let parsed: EvictionPolicy = policy.to_string().parse().unwrap();
            assert_eq!(parsed, policy);
        }
    }

    #[test]
    fn test_policy_default_is_lru() {
        assert_eq!(EvictionPolicy::default(), EvictionPolicy::Lru);
    }
}
