use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope every endpoint of the REST API wraps its payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: 200, data: Some(data) }
    }

    pub fn with_status(status: u16) -> Self {
        Self { status, data: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityScope {
    Global,
    School,
}

impl VisibilityScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityScope::Global => "GLOBAL",
            VisibilityScope::School => "SCHOOL",
        }
    }
}

impl std::str::FromStr for VisibilityScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(VisibilityScope::Global),
            "school" => Ok(VisibilityScope::School),
            other => Err(format!("Unknown visibility scope: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Active,
    Closed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Active => "ACTIVE",
            PostStatus::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Agree,
    Disagree,
}

impl VoteType {
    pub fn is_agree(&self) -> bool {
        matches!(self, VoteType::Agree)
    }

    pub fn title(&self) -> &'static str {
        match self {
            VoteType::Agree => "추천",
            VoteType::Disagree => "비추천",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounts {
    pub agree_count: u64,
    pub disagree_count: u64,
}

/// One search or feed result as the list screens render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub post_id: i64,
    pub title: String,
    #[serde(default)]
    pub contents: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub post_status: Option<PostStatus>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_counts: Option<VoteCounts>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

/// Per-voter record attached to a post detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInfo {
    pub is_agree: bool,
    pub consumer_type: String,
}
