//! NPC scoring provider.

mod scorer;

pub use scorer::{AiScorer, ScoreWeights, best_candidate};
