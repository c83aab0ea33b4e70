pub mod display;
pub mod tally;

pub use display::{format_ratio, truncate_to_one_decimal};
pub use tally::{buy_ratios, compute_ratios, dominant_side, top_consumer_types, VoteTally};

/// Which option a tally currently favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantSide {
    Agree,
    Disagree,
    Tie,
}

// Display-ready result for one post's vote bar
#[derive(Debug, Clone, PartialEq)]
pub struct TallySummary {
    pub agree_ratio: f64,
    pub disagree_ratio: f64,
    pub agree_label: String,
    pub disagree_label: String,
    pub dominant: DominantSide,
}
