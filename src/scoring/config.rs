use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Inclusive numeric bounds for a tunable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

pub const WEIGHT_BOUNDS: Bounds = Bounds::new(0.0, 1.5);
pub const SHADOW_RANK_BOUNDS: Bounds = Bounds::new(1.0, 100.0);
pub const K_VALUE_BOUNDS: Bounds = Bounds::new(0.0, 50.0);
pub const P_EXPONENT_BOUNDS: Bounds = Bounds::new(0.0, 1.1);
pub const BOOST_BOUNDS: Bounds = Bounds::new(0.0, 0.2);
pub const CLUSTER_THRESHOLD_BOUNDS: Bounds = Bounds::new(0.0, 100.0);
pub const RANK_BONUS_BOUNDS: Bounds = Bounds::new(1.0, 1.2);

/// Which decay curve turns a rank into points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayMode {
    /// Harmonic decay, `(1 + k) / (rank + k)`.
    #[default]
    Consensus,
    /// Power-law decay, `1 / rank^p`.
    Conviction,
}

impl DecayMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consensus" => Some(DecayMode::Consensus),
            "conviction" => Some(DecayMode::Conviction),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecayMode::Consensus => "consensus",
            DecayMode::Conviction => "conviction",
        }
    }
}

/// Tunable parameters for one scoring pass.
///
/// Example YAML (settings file `ranking:` block):
/// ```yaml
/// ranking:
///   decay_mode: conviction
///   p_exponent: 0.7
///   cluster_boost: 0.05
///   rank1_bonus: 1.15
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RankingParameters {
    pub decay_mode: DecayMode,

    /// Smoothing constant for consensus decay, in [0, 50]
    pub k_value: f64,

    /// Exponent for conviction decay, in [0, 1.1]
    pub p_exponent: f64,

    /// Maximum breadth-of-coverage boost, in [0, 0.2]
    pub consensus_boost: f64,

    /// Rank-divergence boost per 100 ranks of standard deviation, in [0, 0.2]
    pub provocation_boost: f64,

    /// Boost per additional qualifying cluster, in [0, 0.2]
    pub cluster_boost: f64,

    /// Appearances ranked at or above this count toward cluster reach
    pub cluster_threshold: u32,

    /// Direct multipliers for ranks 1, 2 and 3, each in [1.0, 1.2]
    pub rank1_bonus: f64,
    pub rank2_bonus: f64,
    pub rank3_bonus: f64,
}

impl Default for RankingParameters {
    fn default() -> Self {
        Self {
            decay_mode: DecayMode::Consensus,
            k_value: 20.0,
            p_exponent: 0.55,
            consensus_boost: 0.03,
            provocation_boost: 0.0,
            cluster_boost: 0.03,
            cluster_threshold: 25,
            rank1_bonus: 1.10,
            rank2_bonus: 1.075,
            rank3_bonus: 1.025,
        }
    }
}

impl RankingParameters {
    /// Bonus multiplier for a floored rank, 1.0 outside the podium.
    pub fn top_rank_bonus(&self, int_rank: i64) -> f64 {
        match int_rank {
            1 => self.rank1_bonus,
            2 => self.rank2_bonus,
            3 => self.rank3_bonus,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Ranked,
    Unranked,
}

/// Per-source settings, keyed by source name in [`SourceMap`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SourceConfig {
    /// Influence of this source, in [0, 1.5]
    pub weight: f64,

    /// Opaque category identifier used for cross-category reach
    pub cluster: String,

    #[serde(rename = "type", default)]
    pub source_type: SourceType,

    /// Synthetic rank for appearances on unranked lists, in [1, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_rank: Option<f64>,

    #[serde(default)]
    pub song_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Source configs ordered by name so every pass iterates them identically.
pub type SourceMap = BTreeMap<String, SourceConfig>;

/// Everything a scoring pass is configured with.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub ranking: RankingParameters,

    #[serde(default)]
    pub sources: SourceMap,
}
