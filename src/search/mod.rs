pub mod controller;
pub mod history;

pub use controller::SearchController;
pub use history::{SearchHistory, MAX_HISTORY_LEN};

/// State changes published to whoever renders the search screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    HistoryUpdated(Vec<String>),
    ResultsUpdated { total: usize, page: u32 },
    ResultsCleared,
    FetchFailed(String),
}

/// What a call to `fetch_next_page` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was appended; `page` is the cursor after the fetch.
    Loaded { items: usize, page: u32 },
    /// Another request of this session is still outstanding.
    InFlight,
    /// The session changed while the request was outstanding; the response was dropped.
    Stale,
    /// No search term has been submitted.
    NoSearch,
    /// The requested filter was already in effect; nothing was reloaded.
    Unchanged,
}
