use super::config::{DecayMode, RankingParameters};

impl DecayMode {
    /// Points for a rank before any top-rank bonus.
    pub fn curve(&self, rank: f64, params: &RankingParameters) -> f64 {
        match self {
            DecayMode::Consensus => (1.0 + params.k_value) / (rank + params.k_value),
            DecayMode::Conviction => 1.0 / rank.powf(params.p_exponent),
        }
    }
}

/// Decay weight for a rank under the configured curve, including the
/// podium bonus for ranks whose floor is 1, 2 or 3.
///
/// Callers must pass a finite `rank >= 1`.
pub fn decay(rank: f64, params: &RankingParameters) -> f64 {
    let value = params.decay_mode.curve(rank, params);
    let int_rank = rank.floor() as i64;
    value * params.top_rank_bonus(int_rank)
}
