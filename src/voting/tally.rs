use crate::models::{PostSummary, VoteInfo};
use crate::voting::display::{format_ratio, truncate_to_one_decimal};
use crate::voting::{DominantSide, TallySummary};
use std::collections::HashMap;

const TOP_CONSUMER_TYPES: usize = 2;

/// Percentage of `total` each side received.
///
/// Both divisions are independent, so abstentions counted in `total`
/// make the ratios sum to less than 100. A zero total yields `(0.0, 0.0)`.
pub fn compute_ratios(total: u64, agree: u64, disagree: u64) -> (f64, f64) {
    if total == 0 {
        return (0.0, 0.0);
    }

    let total = total as f64;
    (
        agree as f64 / total * 100.0,
        disagree as f64 / total * 100.0,
    )
}

/// Ratios for the feed card: the "buy" share truncated for display and its complement.
pub fn buy_ratios(total: u64, agree: u64) -> (f64, f64) {
    if total == 0 {
        return (0.0, 0.0);
    }

    let buy = truncate_to_one_decimal(agree as f64 / total as f64 * 100.0);
    (buy, 100.0 - buy)
}

pub fn dominant_side(agree_ratio: f64, disagree_ratio: f64) -> DominantSide {
    if agree_ratio > disagree_ratio {
        DominantSide::Agree
    } else if disagree_ratio > agree_ratio {
        DominantSide::Disagree
    } else {
        DominantSide::Tie
    }
}

/// The most common consumer types among agreeing and disagreeing voters.
///
/// Returns up to two types per side, most frequent first. Equal counts are
/// ordered by type name so the result does not depend on hash order.
pub fn top_consumer_types(votes: &[VoteInfo]) -> (Vec<String>, Vec<String>) {
    let (agree, disagree): (Vec<&VoteInfo>, Vec<&VoteInfo>) =
        votes.iter().partition(|vote| vote.is_agree);

    (rank_consumer_types(&agree), rank_consumer_types(&disagree))
}

fn rank_consumer_types(votes: &[&VoteInfo]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for vote in votes {
        *counts.entry(vote.consumer_type.as_str()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    sorted
        .into_iter()
        .take(TOP_CONSUMER_TYPES)
        .map(|(consumer_type, _)| consumer_type.to_string())
        .collect()
}

/// Raw vote counts of one post. Everything derived is recomputed on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub total: u64,
    pub agree: u64,
    pub disagree: u64,
}

impl VoteTally {
    pub fn new(total: u64, agree: u64, disagree: u64) -> Self {
        Self { total, agree, disagree }
    }

    pub fn from_post(post: &PostSummary) -> Self {
        let counts = post.vote_counts.unwrap_or_default();
        Self::new(post.vote_count, counts.agree_count, counts.disagree_count)
    }

    pub fn ratios(&self) -> (f64, f64) {
        compute_ratios(self.total, self.agree, self.disagree)
    }

    pub fn dominant(&self) -> DominantSide {
        let (agree, disagree) = self.ratios();
        dominant_side(agree, disagree)
    }

    pub fn summary(&self) -> TallySummary {
        let (agree_ratio, disagree_ratio) = self.ratios();
        TallySummary {
            agree_ratio,
            disagree_ratio,
            agree_label: format_ratio(agree_ratio),
            disagree_label: format_ratio(disagree_ratio),
            dominant: dominant_side(agree_ratio, disagree_ratio),
        }
    }
}
