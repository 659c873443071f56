use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::filter::Filters;
use crate::scoring::DecayMode;

/// User settings file. Every field overrides the dataset's embedded
/// defaults; anything left out keeps the default.
///
/// Example YAML:
/// ```yaml
/// dataset: ~/music/data.json
/// ranking:
///   decay_mode: conviction
///   p_exponent: 0.7
/// sources:
///   Pitchfork:
///     weight: 1.2
///   NPR Top 25:
///     shadow_rank: 10
/// filters:
///   min_sources: 2
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    #[serde(default)]
    pub ranking: RankingOverrides,

    #[serde(default)]
    pub sources: BTreeMap<String, SourceOverride>,

    #[serde(default)]
    pub filters: Filters,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RankingOverrides {
    #[serde(default)]
    pub decay_mode: Option<DecayMode>,
    #[serde(default)]
    pub k_value: Option<f64>,
    #[serde(default)]
    pub p_exponent: Option<f64>,
    #[serde(default)]
    pub consensus_boost: Option<f64>,
    #[serde(default)]
    pub provocation_boost: Option<f64>,
    #[serde(default)]
    pub cluster_boost: Option<f64>,
    #[serde(default)]
    pub cluster_threshold: Option<f64>,
    #[serde(default)]
    pub rank1_bonus: Option<f64>,
    #[serde(default)]
    pub rank2_bonus: Option<f64>,
    #[serde(default)]
    pub rank3_bonus: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceOverride {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub shadow_rank: Option<f64>,
}
