use super::config::{
    Bounds, ScoringConfig, SourceType, BOOST_BOUNDS, CLUSTER_THRESHOLD_BOUNDS, K_VALUE_BOUNDS,
    P_EXPONENT_BOUNDS, RANK_BONUS_BOUNDS, SHADOW_RANK_BOUNDS, WEIGHT_BOUNDS,
};

fn check(errors: &mut Vec<String>, path: &str, value: f64, bounds: Bounds) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number", path));
    } else if !bounds.contains(value) {
        errors.push(format!("{}: {} outside {}", path, value, bounds));
    }
}

/// Validate a scoring configuration before it reaches the engine.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let ranking = &config.ranking;

    check(&mut errors, "ranking.k_value", ranking.k_value, K_VALUE_BOUNDS);
    check(&mut errors, "ranking.p_exponent", ranking.p_exponent, P_EXPONENT_BOUNDS);
    check(&mut errors, "ranking.consensus_boost", ranking.consensus_boost, BOOST_BOUNDS);
    check(&mut errors, "ranking.provocation_boost", ranking.provocation_boost, BOOST_BOUNDS);
    check(&mut errors, "ranking.cluster_boost", ranking.cluster_boost, BOOST_BOUNDS);
    check(
        &mut errors,
        "ranking.cluster_threshold",
        ranking.cluster_threshold as f64,
        CLUSTER_THRESHOLD_BOUNDS,
    );
    check(&mut errors, "ranking.rank1_bonus", ranking.rank1_bonus, RANK_BONUS_BOUNDS);
    check(&mut errors, "ranking.rank2_bonus", ranking.rank2_bonus, RANK_BONUS_BOUNDS);
    check(&mut errors, "ranking.rank3_bonus", ranking.rank3_bonus, RANK_BONUS_BOUNDS);

    for (name, source) in &config.sources {
        check(
            &mut errors,
            &format!("sources.{}.weight", name),
            source.weight,
            WEIGHT_BOUNDS,
        );
        match (source.source_type, source.shadow_rank) {
            (SourceType::Unranked, Some(shadow)) => check(
                &mut errors,
                &format!("sources.{}.shadow_rank", name),
                shadow,
                SHADOW_RANK_BOUNDS,
            ),
            (SourceType::Unranked, None) => errors.push(format!(
                "sources.{}.shadow_rank: required for unranked sources",
                name
            )),
            (SourceType::Ranked, _) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
