pub mod aggregate;
pub mod boosts;
pub mod config;
pub mod decay;
pub mod engine;
pub mod rank;
pub mod validation;

pub use aggregate::{aggregate, resolve_rank, Aggregate, Placement, SourceContribution};
pub use boosts::{calculate_boosts, population_std_dev, ClusterSummary, Multipliers};
pub use config::*;
pub use decay::decay;
pub use engine::{compute_rankings, score_item, ScoredItem};
pub use rank::{assign_ranks, normalize, PlacementKey};
pub use validation::validate_scoring;
