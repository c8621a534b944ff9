//! Store configuration
//!
//! A store is configured with the maximum number of shortcuts each record may
//! hold. The synthetic seed record gets a larger table of its own, since every
//! scan starts there.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! # Maximum shortcuts per record: an integer, or "unbounded"
//! shortcut_bound = 8
//!
//! # Maximum shortcuts on the seed record (ignored when unbounded)
//! seed_shortcut_bound = 500
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default per-record shortcut bound
pub const DEFAULT_SHORTCUT_BOUND: usize = 8;

/// Default shortcut bound for the seed record
pub const DEFAULT_SEED_SHORTCUT_BOUND: usize = 500;

/// Keyword accepted in place of an integer bound
const UNBOUNDED_KEYWORD: &str = "unbounded";

/// Maximum number of entries a shortcut table retains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoundRepr", into = "BoundRepr")]
pub enum ShortcutBound {
    /// At most this many entries; `0` retains nothing
    Limited(usize),
    /// No limit
    Unbounded,
}

impl ShortcutBound {
    /// Whether a table holding `len` entries is over this bound
    #[inline]
    pub fn is_exceeded_by(self, len: usize) -> bool {
        match self {
            ShortcutBound::Limited(max) => len > max,
            ShortcutBound::Unbounded => false,
        }
    }

    /// The numeric limit, or `None` when unbounded
    pub fn limit(self) -> Option<usize> {
        match self {
            ShortcutBound::Limited(max) => Some(max),
            ShortcutBound::Unbounded => None,
        }
    }
}

impl Default for ShortcutBound {
    fn default() -> Self {
        ShortcutBound::Limited(DEFAULT_SHORTCUT_BOUND)
    }
}

impl From<usize> for ShortcutBound {
    fn from(max: usize) -> Self {
        ShortcutBound::Limited(max)
    }
}

impl std::fmt::Display for ShortcutBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortcutBound::Limited(max) => write!(f, "{}", max),
            ShortcutBound::Unbounded => f.write_str(UNBOUNDED_KEYWORD),
        }
    }
}

impl std::str::FromStr for ShortcutBound {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(UNBOUNDED_KEYWORD) {
            return Ok(ShortcutBound::Unbounded);
        }
        s.parse::<usize>().map(ShortcutBound::Limited).map_err(|_| {
            Error::Config(format!(
                "Invalid shortcut bound '{}'. Expected a non-negative integer or \"{}\".",
                s, UNBOUNDED_KEYWORD
            ))
        })
    }
}

/// Serialized form of [`ShortcutBound`]: an integer or the `"unbounded"` keyword
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<BoundRepr> for ShortcutBound {
    type Error = Error;

    fn try_from(repr: BoundRepr) -> Result<Self> {
        match repr {
            BoundRepr::Count(max) => Ok(ShortcutBound::Limited(max)),
            BoundRepr::Keyword(word) => word.parse(),
        }
    }
}

impl From<ShortcutBound> for BoundRepr {
    fn from(bound: ShortcutBound) -> Self {
        match bound {
            ShortcutBound::Limited(max) => BoundRepr::Count(max),
            ShortcutBound::Unbounded => BoundRepr::Keyword(UNBOUNDED_KEYWORD.to_string()),
        }
    }
}

fn default_seed_shortcut_bound() -> usize {
    DEFAULT_SEED_SHORTCUT_BOUND
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum shortcuts per ordinary record
    #[serde(default)]
    pub shortcut_bound: ShortcutBound,
    /// Maximum shortcuts on the seed record when `shortcut_bound` is limited
    #[serde(default = "default_seed_shortcut_bound")]
    pub seed_shortcut_bound: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shortcut_bound: ShortcutBound::default(),
            seed_shortcut_bound: DEFAULT_SEED_SHORTCUT_BOUND,
        }
    }
}

impl StoreConfig {
    /// Config with the given per-record bound and the default seed bound
    pub fn with_bound(shortcut_bound: impl Into<ShortcutBound>) -> Self {
        Self {
            shortcut_bound: shortcut_bound.into(),
            ..Self::default()
        }
    }

    /// Config with no limit on any table
    pub fn unbounded() -> Self {
        Self::with_bound(ShortcutBound::Unbounded)
    }

    /// Bound applied to the seed record's table
    ///
    /// Unbounded stores give the seed an unbounded table too.
    pub fn seed_bound(&self) -> ShortcutBound {
        match self.shortcut_bound {
            ShortcutBound::Unbounded => ShortcutBound::Unbounded,
            ShortcutBound::Limited(_) => ShortcutBound::Limited(self.seed_shortcut_bound),
        }
    }

    /// Parse a config from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML or a bound is
    /// neither an integer nor `"unbounded"`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# SkipScan store configuration
#
# Maximum shortcuts kept per record: a non-negative integer, or "unbounded".
# Higher means faster repeated searches and more memory.
shortcut_bound = 8

# Maximum shortcuts kept on the seed record (ignored when unbounded).
seed_shortcut_bound = 500
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.shortcut_bound, ShortcutBound::Limited(DEFAULT_SHORTCUT_BOUND));
        assert_eq!(config.seed_bound(), ShortcutBound::Limited(500));
    }

    #[test]
    fn test_default_toml_parses_to_default() {
        let config = StoreConfig::from_toml_str(StoreConfig::default_toml()).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_unbounded_seed_follows_store() {
        let config = StoreConfig::unbounded();
        assert_eq!(config.seed_bound(), ShortcutBound::Unbounded);
    }

    #[test]
    fn test_toml_unbounded_keyword() {
        let config = StoreConfig::from_toml_str("shortcut_bound = \"unbounded\"").unwrap();
        assert_eq!(config.shortcut_bound, ShortcutBound::Unbounded);
        assert_eq!(config.seed_shortcut_bound, DEFAULT_SEED_SHORTCUT_BOUND);
    }

    #[test]
    fn test_toml_integer_bound() {
        let config =
            StoreConfig::from_toml_str("shortcut_bound = 0\nseed_shortcut_bound = 20").unwrap();
        assert_eq!(config.shortcut_bound, ShortcutBound::Limited(0));
        assert_eq!(config.seed_bound(), ShortcutBound::Limited(20));
    }

    #[test]
    fn test_toml_empty_uses_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_toml_rejects_bad_keyword() {
        let err = StoreConfig::from_toml_str("shortcut_bound = \"lots\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bound_from_str() {
        assert_eq!("12".parse::<ShortcutBound>().unwrap(), ShortcutBound::Limited(12));
        assert_eq!("Unbounded".parse::<ShortcutBound>().unwrap(), ShortcutBound::Unbounded);
        assert!("-1".parse::<ShortcutBound>().is_err());
    }

    #[test]
    fn test_bound_display_roundtrip() {
        for bound in [ShortcutBound::Limited(0), ShortcutBound::Limited(63), ShortcutBound::Unbounded] {
            assert_eq!(bound.to_string().parse::<ShortcutBound>().unwrap(), bound);
        }
    }

    #[test]
    fn test_bound_json_form() {
        let json = serde_json::to_string(&StoreConfig::unbounded()).unwrap();
        assert!(json.contains("\"unbounded\""));
        let back: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StoreConfig::unbounded());
    }

    #[test]
    fn test_is_exceeded_by() {
        assert!(ShortcutBound::Limited(0).is_exceeded_by(1));
        assert!(!ShortcutBound::Limited(2).is_exceeded_by(2));
        assert!(!ShortcutBound::Unbounded.is_exceeded_by(usize::MAX));
    }
}
