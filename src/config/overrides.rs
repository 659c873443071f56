use thiserror::Error;

use super::schema::Settings;
use crate::filter::Filters;
use crate::scoring::{
    DecayMode, ScoringConfig, BOOST_BOUNDS, CLUSTER_THRESHOLD_BOUNDS, K_VALUE_BOUNDS,
    P_EXPONENT_BOUNDS, RANK_BONUS_BOUNDS, SHADOW_RANK_BOUNDS, WEIGHT_BOUNDS,
};

#[derive(Debug, Error, PartialEq)]
pub enum OverrideError {
    #[error("expected key=value, got '{0}'")]
    Malformed(String),

    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("unknown source '{0}'")]
    UnknownSource(String),
}

fn parse_number(key: &str, value: &str) -> Result<f64, OverrideError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OverrideError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl Settings {
    /// Record one `key=value` override on top of these settings.
    ///
    /// Keys are the ranking parameter names, `min_sources`, `rank_cutoff`,
    /// `weight.<source>` and `shadow_rank.<source>`. Values are stored as
    /// given and clamped when applied.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), OverrideError> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| OverrideError::Malformed(assignment.to_string()))?;

        let ranking = &mut self.ranking;
        match key {
            "decay_mode" => {
                let mode = DecayMode::parse(value).ok_or_else(|| OverrideError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
                ranking.decay_mode = Some(mode);
            }
            "k_value" => ranking.k_value = Some(parse_number(key, value)?),
            "p_exponent" => ranking.p_exponent = Some(parse_number(key, value)?),
            "consensus_boost" => ranking.consensus_boost = Some(parse_number(key, value)?),
            "provocation_boost" => ranking.provocation_boost = Some(parse_number(key, value)?),
            "cluster_boost" => ranking.cluster_boost = Some(parse_number(key, value)?),
            "cluster_threshold" => ranking.cluster_threshold = Some(parse_number(key, value)?),
            "rank1_bonus" => ranking.rank1_bonus = Some(parse_number(key, value)?),
            "rank2_bonus" => ranking.rank2_bonus = Some(parse_number(key, value)?),
            "rank3_bonus" => ranking.rank3_bonus = Some(parse_number(key, value)?),
            "min_sources" => {
                self.filters.min_sources = Filters::to_count(parse_number(key, value)?)
            }
            "rank_cutoff" => {
                self.filters.rank_cutoff = Filters::to_count(parse_number(key, value)?)
            }
            _ => {
                if let Some(source) = key.strip_prefix("weight.") {
                    let weight = parse_number(key, value)?;
                    self.sources.entry(source.to_string()).or_default().weight = Some(weight);
                } else if let Some(source) = key.strip_prefix("shadow_rank.") {
                    let shadow = parse_number(key, value)?;
                    self.sources.entry(source.to_string()).or_default().shadow_rank = Some(shadow);
                } else {
                    return Err(OverrideError::UnknownKey(key.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Layer settings over the dataset defaults, clamping every overridden
/// value into its allowed range. Overrides naming a source the dataset
/// does not configure are rejected.
pub fn apply_settings(
    defaults: &ScoringConfig,
    settings: &Settings,
) -> Result<ScoringConfig, OverrideError> {
    let mut config = defaults.clone();
    let overrides = &settings.ranking;
    let ranking = &mut config.ranking;

    if let Some(mode) = overrides.decay_mode {
        ranking.decay_mode = mode;
    }
    if let Some(v) = overrides.k_value {
        ranking.k_value = K_VALUE_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.p_exponent {
        ranking.p_exponent = P_EXPONENT_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.consensus_boost {
        ranking.consensus_boost = BOOST_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.provocation_boost {
        ranking.provocation_boost = BOOST_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.cluster_boost {
        ranking.cluster_boost = BOOST_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.cluster_threshold {
        ranking.cluster_threshold = CLUSTER_THRESHOLD_BOUNDS.clamp(v).round() as u32;
    }
    if let Some(v) = overrides.rank1_bonus {
        ranking.rank1_bonus = RANK_BONUS_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.rank2_bonus {
        ranking.rank2_bonus = RANK_BONUS_BOUNDS.clamp(v);
    }
    if let Some(v) = overrides.rank3_bonus {
        ranking.rank3_bonus = RANK_BONUS_BOUNDS.clamp(v);
    }

    for (name, source_override) in &settings.sources {
        let source = config
            .sources
            .get_mut(name)
            .ok_or_else(|| OverrideError::UnknownSource(name.clone()))?;
        if let Some(weight) = source_override.weight {
            source.weight = WEIGHT_BOUNDS.clamp(weight);
        }
        if let Some(shadow) = source_override.shadow_rank {
            source.shadow_rank = Some(SHADOW_RANK_BOUNDS.clamp(shadow));
        }
    }

    Ok(config)
}

/// Whether the effective setup differs from the dataset defaults.
pub fn is_tuned(defaults: &ScoringConfig, effective: &ScoringConfig, filters: &Filters) -> bool {
    defaults != effective || filters.clamped() != Filters::default()
}
