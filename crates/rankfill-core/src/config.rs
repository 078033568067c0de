//! Run configuration loaded from `rankfill.toml`.
//!
//! Every field has a default, so a missing file or an empty table yields the
//! canonical setup: ranks 1001–2000, year groups of at most 25 sequenced
//! items, a no-evidence layer offset of 1000, and identifier seed 0.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up next to the input when no path is given.
pub const CONFIG_FILE_NAME: &str = "rankfill.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RankfillConfig {
    #[serde(default)]
    pub ranks: RankConfig,
    #[serde(default)]
    pub groups: GroupConfig,
    #[serde(default)]
    pub layering: LayeringConfig,
    #[serde(default)]
    pub ids: IdConfig,
}

/// The closed global rank range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_low")]
    pub low: u32,
    #[serde(default = "default_high")]
    pub high: u32,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            low: default_low(),
            high: default_high(),
        }
    }
}

impl RankConfig {
    /// Whether `rank` lies inside the configured range.
    #[must_use]
    pub const fn contains(&self, rank: u32) -> bool {
        rank >= self.low && rank <= self.high
    }

    /// Number of distinct ranks in the range.
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.high < self.low {
            return 0;
        }
        usize::try_from(self.high - self.low).map_or(usize::MAX, |span| span + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Largest group sequence number accepted within one year.
    #[serde(default = "default_max_seq")]
    pub max_seq: u32,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_seq: default_max_seq(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeringConfig {
    /// Offset added to the layer of unranked items that carry no ordering
    /// evidence at all. Presentation only; raised to the deepest layer when
    /// smaller so those items always sort last.
    #[serde(default = "default_isolated_offset")]
    pub isolated_offset: u32,
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            isolated_offset: default_isolated_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdConfig {
    /// Seed for the identifier pool shuffle.
    #[serde(default)]
    pub seed: u64,
}

const fn default_low() -> u32 {
    1001
}

const fn default_high() -> u32 {
    2000
}

const fn default_max_seq() -> u32 {
    25
}

const fn default_isolated_offset() -> u32 {
    1000
}

impl RankfillConfig {
    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error when the rank range is empty or `max_seq` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.ranks.low > self.ranks.high {
            bail!(
                "[ranks] low ({}) must not exceed high ({})",
                self.ranks.low,
                self.ranks.high
            );
        }
        if self.groups.max_seq == 0 {
            bail!("[groups] max_seq must be at least 1");
        }
        Ok(())
    }
}

/// Parse and validate a config from TOML text.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or fails [`RankfillConfig::validate`].
pub fn parse_config(content: &str) -> Result<RankfillConfig> {
    let config: RankfillConfig = toml::from_str(content).context("parse rankfill config")?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path`, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<RankfillConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(RankfillConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_setup() {
        let config = RankfillConfig::default();
        assert_eq!(config.ranks.low, 1001);
        assert_eq!(config.ranks.high, 2000);
        assert_eq!(config.ranks.capacity(), 1000);
        assert_eq!(config.groups.max_seq, 25);
        assert_eq!(config.layering.isolated_offset, 1000);
        assert_eq!(config.ids.seed, 0);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config, RankfillConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = parse_config("[ranks]\nhigh = 1010\n\n[ids]\nseed = 7\n").expect("parses");
        assert_eq!(config.ranks.low, 1001);
        assert_eq!(config.ranks.high, 1010);
        assert_eq!(config.ranks.capacity(), 10);
        assert_eq!(config.ids.seed, 7);
        assert_eq!(config.groups.max_seq, 25);
    }

    #[test]
    fn inverted_rank_range_is_rejected() {
        let err = parse_config("[ranks]\nlow = 10\nhigh = 5\n").expect_err("must fail");
        assert!(err.to_string().contains("low (10)"), "{err}");
    }

    #[test]
    fn zero_max_seq_is_rejected() {
        assert!(parse_config("[groups]\nmax_seq = 0\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join(CONFIG_FILE_NAME)).expect("load");
        assert_eq!(config, RankfillConfig::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[ranks\nlow = ").expect("write");
        let err = load_config(&path).expect_err("must fail");
        assert!(err.to_string().contains("Failed to parse"), "{err}");
    }

    #[test]
    fn contains_is_inclusive() {
        let ranks = RankConfig { low: 1, high: 3 };
        assert!(ranks.contains(1));
        assert!(ranks.contains(3));
        assert!(!ranks.contains(0));
        assert!(!ranks.contains(4));
    }
}
