use crate::api::{ApiClient, ApiRequest, Endpoint};
use crate::auth::TokenStore;
use crate::config::SearchConfig;
use crate::db::KeyValueStore;
use crate::error::{Error, Result};
use crate::models::{PostStatus, PostSummary};
use crate::search::{FetchOutcome, SearchEvent, SearchHistory};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

struct SearchState {
    history: SearchHistory,
    term: Option<String>,
    post_status: PostStatus,
    session: u64,
    current_page: u32,
    is_fetching: bool,
    results: Vec<PostSummary>,
}

impl SearchState {
    // Starts a fresh session; responses still in flight for the old one will be dropped
    fn invalidate(&mut self) {
        self.session += 1;
        self.current_page = 0;
        self.is_fetching = false;
        self.results.clear();
    }
}

// Identifies the session and page a request was issued for
struct PageTicket {
    session: u64,
    page: u32,
    term: String,
    post_status: PostStatus,
}

/// Drives the search screen: recent-search history plus paged remote results.
///
/// All methods take `&self`. State lives behind a mutex that is never held
/// across an `.await`, so overlapping calls from the UI interleave at the
/// network boundary and the `is_fetching` guard decides who proceeds.
pub struct SearchController {
    client: Arc<dyn ApiClient>,
    tokens: Arc<dyn TokenStore>,
    store: Arc<dyn KeyValueStore>,
    config: SearchConfig,
    state: Mutex<SearchState>,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchController {
    /// Creates the controller and loads the persisted history once.
    pub async fn new(
        client: Arc<dyn ApiClient>,
        tokens: Arc<dyn TokenStore>,
        store: Arc<dyn KeyValueStore>,
        config: SearchConfig,
    ) -> Result<Self> {
        let entries = store.get(&config.history_key).await?.unwrap_or_default();
        info!("Loaded {} recent search term(s)", entries.len());

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = SearchState {
            history: SearchHistory::from_entries(entries, config.history_limit),
            term: None,
            post_status: PostStatus::default(),
            session: 0,
            current_page: 0,
            is_fetching: false,
            results: Vec::new(),
        };

        Ok(Self {
            client,
            tokens,
            store,
            config,
            state: Mutex::new(state),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    pub fn history(&self) -> Vec<String> {
        self.state().history.entries().to_vec()
    }

    pub fn results(&self) -> Vec<PostSummary> {
        self.state().results.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.state().current_page
    }

    pub fn is_fetching(&self) -> bool {
        self.state().is_fetching
    }

    pub fn term(&self) -> Option<String> {
        self.state().term.clone()
    }

    pub fn post_status(&self) -> PostStatus {
        self.state().post_status
    }

    /// Starts a new session for `term`, records it in the history and loads the first page.
    ///
    /// When the history cannot be saved nothing changes and no request is sent.
    pub async fn submit_search(&self, term: &str) -> Result<FetchOutcome> {
        self.add_recent_search(term).await?;

        {
            let mut state = self.state();
            state.invalidate();
            state.term = Some(term.to_string());
            info!("Starting search session {} for {:?}", state.session, term);
        }
        self.emit(SearchEvent::ResultsCleared);

        self.fetch_next_page().await
    }

    pub async fn add_recent_search(&self, term: &str) -> Result<()> {
        let mut history = self.state().history.clone();
        history.push(term);
        self.commit_history(history).await
    }

    /// Loads the page at the cursor and appends it to the results.
    pub async fn fetch_next_page(&self) -> Result<FetchOutcome> {
        let ticket = {
            let mut state = self.state();
            let Some(term) = state.term.clone() else {
                return Ok(FetchOutcome::NoSearch);
            };
            if state.is_fetching {
                debug!("Page {} for {:?} already in flight", state.current_page, term);
                return Ok(FetchOutcome::InFlight);
            }
            state.is_fetching = true;
            PageTicket {
                session: state.session,
                page: state.current_page,
                term,
                post_status: state.post_status,
            }
        };

        let request = Endpoint::Search {
            page: ticket.page,
            size: self.config.page_size,
            keyword: ticket.term.clone(),
            visibility_scope: self.config.visibility_scope,
            post_status: ticket.post_status,
        }
        .request();

        let fetched = self.send_with_reauth(&request).await;
        self.complete(ticket, fetched)
    }

    /// Removes one history entry. The current results are discarded with it.
    pub async fn remove_history_entry(&self, index: usize) -> Result<String> {
        let mut history = self.state().history.clone();
        let removed = history.remove(index)?;
        self.commit_history(history).await?;

        {
            let mut state = self.state();
            state.invalidate();
            state.term = None;
        }
        debug!("Removed recent search {:?}", removed);
        self.emit(SearchEvent::ResultsCleared);

        Ok(removed)
    }

    pub async fn clear_history(&self) -> Result<()> {
        let mut history = self.state().history.clone();
        history.clear();
        self.commit_history(history).await
    }

    /// Switches between active and closed posts, reloading the current term from page 0.
    pub async fn set_post_status(&self, post_status: PostStatus) -> Result<FetchOutcome> {
        {
            let mut state = self.state();
            if state.post_status == post_status {
                return Ok(FetchOutcome::Unchanged);
            }
            state.post_status = post_status;
            state.invalidate();
        }
        self.emit(SearchEvent::ResultsCleared);

        self.fetch_next_page().await
    }

    async fn send_with_reauth(&self, request: &ApiRequest) -> Result<Vec<PostSummary>> {
        let mut response = self.client.send(request).await?;

        if response.is_unauthorized() {
            info!("Search request unauthorized, refreshing tokens");
            self.tokens.refresh_all_tokens().await.map_err(|e| match e {
                Error::ReauthFailed(_) => e,
                other => Error::ReauthFailed(other.to_string()),
            })?;

            response = self.client.send(request).await?;
            if response.is_unauthorized() {
                return Err(Error::AuthExpired);
            }
        }

        if !response.is_success() {
            return Err(Error::UnexpectedStatus(response.status));
        }

        // A success without payload is an empty page
        let data = response.data.unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(serde_json::from_value(data)?)
    }

    fn complete(&self, ticket: PageTicket, fetched: Result<Vec<PostSummary>>) -> Result<FetchOutcome> {
        let mut state = self.state();
        if state.session != ticket.session {
            debug!(
                "Dropping page {} for {:?} from superseded session {}",
                ticket.page, ticket.term, ticket.session
            );
            return Ok(FetchOutcome::Stale);
        }
        state.is_fetching = false;

        match fetched {
            Ok(items) => {
                let count = items.len();
                state.results.extend(items);
                state.current_page += 1;
                info!(
                    "Loaded {} result(s) for {:?}, page cursor now {}",
                    count, ticket.term, state.current_page
                );
                self.emit(SearchEvent::ResultsUpdated {
                    total: state.results.len(),
                    page: state.current_page,
                });
                Ok(FetchOutcome::Loaded {
                    items: count,
                    page: state.current_page,
                })
            }
            Err(e) => {
                if e.is_network() {
                    warn!("Search page {} for {:?} failed: {}", ticket.page, ticket.term, e);
                } else {
                    error!("Search page {} for {:?} failed: {}", ticket.page, ticket.term, e);
                }
                self.emit(SearchEvent::FetchFailed(e.to_string()));
                Err(e)
            }
        }
    }

    // Saves first and only then replaces the in-memory history, so a failed write changes nothing
    async fn commit_history(&self, history: SearchHistory) -> Result<()> {
        if let Err(e) = self.store.set(&self.config.history_key, history.entries()).await {
            error!("Failed to save recent searches: {}", e);
            return Err(e);
        }

        let snapshot = history.entries().to_vec();
        self.state().history = history;
        self.emit(SearchEvent::HistoryUpdated(snapshot));
        Ok(())
    }

    fn emit(&self, event: SearchEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::ApiResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeApi {
        responses: Mutex<VecDeque<Result<ApiResponse<Value>>>>,
        requests: Mutex<Vec<ApiRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn new(responses: Vec<Result<ApiResponse<Value>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        // The first request waits until the gate is notified
        fn gated(responses: Vec<Result<ApiResponse<Value>>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(responses)
            }
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiClient for FakeApi {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse<Value>> {
            let call = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.len()
            };
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::ok(json!([]))));

            if call == 1 {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
            }
            response
        }
    }

    #[derive(Default)]
    struct FakeTokens {
        refreshes: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TokenStore for FakeTokens {
        fn read_token(&self, _key: &str) -> Option<String> {
            Some("token".to_string())
        }

        async fn refresh_all_tokens(&self) -> Result<()> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::ReauthFailed("refresh token expired".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn posts(keyword: &str, count: usize) -> ApiResponse<Value> {
        let items: Vec<Value> = (0..count)
            .map(|i| json!({ "postId": i, "title": format!("{} {}", keyword, i) }))
            .collect();
        ApiResponse::ok(Value::Array(items))
    }

    async fn controller(
        api: Arc<FakeApi>,
        tokens: Arc<FakeTokens>,
        store: Arc<MemoryStore>,
    ) -> SearchController {
        SearchController::new(api, tokens, store, SearchConfig::default())
            .await
            .unwrap()
    }

    async fn controller_with_store(api: Arc<FakeApi>, store: Arc<FlakyStore>) -> SearchController {
        SearchController::new(api, Arc::new(FakeTokens::default()), store, SearchConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_search_loads_one_page() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("shoes", 3))]));
        let store = Arc::new(MemoryStore::new());
        let search = controller(api.clone(), Arc::default(), store.clone()).await;

        let outcome = search.submit_search("shoes").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Loaded { items: 3, page: 1 });
        assert_eq!(search.results().len(), 3);
        assert_eq!(search.current_page(), 1);
        assert!(!search.is_fetching());
        assert_eq!(search.history(), vec!["shoes"]);
        assert_eq!(
            store.get("RecentSearch").await.unwrap(),
            Some(vec!["shoes".to_string()])
        );

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].parameter("page"), Some(&json!(0)));
        assert_eq!(requests[0].parameter("size"), Some(&json!(5)));
        assert_eq!(requests[0].parameter("keyword"), Some(&json!("shoes")));
    }

    #[tokio::test]
    async fn pages_accumulate_within_a_session() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("bag", 5)), Ok(posts("bag", 3))]));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        search.submit_search("bag").await.unwrap();
        let outcome = search.fetch_next_page().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Loaded { items: 3, page: 2 });
        assert_eq!(search.results().len(), 8);
        assert_eq!(api.requests()[1].parameter("page"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn new_search_replaces_results() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("bag", 5)), Ok(posts("coat", 2))]));
        let search = controller(api, Arc::default(), Arc::default()).await;

        search.submit_search("bag").await.unwrap();
        search.submit_search("coat").await.unwrap();

        assert_eq!(search.results().len(), 2);
        assert_eq!(search.results()[0].title, "coat 0");
        assert_eq!(search.current_page(), 1);
        assert_eq!(search.history(), vec!["coat", "bag"]);
    }

    #[tokio::test]
    async fn fetch_without_search_does_nothing() {
        let api = Arc::new(FakeApi::default());
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        assert_eq!(search.fetch_next_page().await.unwrap(), FetchOutcome::NoSearch);
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn overlapping_fetch_is_skipped() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::gated(vec![Ok(posts("shoes", 5))], gate.clone()));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        let (first, second) = tokio::join!(search.submit_search("shoes"), async {
            let second = search.fetch_next_page().await;
            gate.notify_one();
            second
        });

        assert_eq!(first.unwrap(), FetchOutcome::Loaded { items: 5, page: 1 });
        assert_eq!(second.unwrap(), FetchOutcome::InFlight);
        assert_eq!(api.requests().len(), 1);
        assert_eq!(search.results().len(), 5);
    }

    #[tokio::test]
    async fn response_from_superseded_session_is_dropped() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::gated(
            vec![Ok(posts("old", 4)), Ok(posts("new", 2))],
            gate.clone(),
        ));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        let (old, new) = tokio::join!(search.submit_search("old"), async {
            let new = search.submit_search("new").await;
            gate.notify_one();
            new
        });

        assert_eq!(old.unwrap(), FetchOutcome::Stale);
        assert_eq!(new.unwrap(), FetchOutcome::Loaded { items: 2, page: 1 });
        assert!(search.results().iter().all(|post| post.title.starts_with("new")));
        assert_eq!(search.current_page(), 1);
        assert!(!search.is_fetching());
    }

    #[tokio::test]
    async fn unauthorized_retries_once_after_refresh() {
        let api = Arc::new(FakeApi::new(vec![
            Ok(ApiResponse::with_status(401)),
            Ok(posts("shoes", 2)),
        ]));
        let tokens = Arc::new(FakeTokens::default());
        let search = controller(api.clone(), tokens.clone(), Arc::default()).await;

        let outcome = search.submit_search("shoes").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Loaded { items: 2, page: 1 });
        assert_eq!(tokens.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(search.results().len(), 2);
        assert_eq!(search.current_page(), 1);

        let requests = api.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn second_unauthorized_is_not_retried_again() {
        let api = Arc::new(FakeApi::new(vec![
            Ok(ApiResponse::with_status(401)),
            Ok(ApiResponse::with_status(401)),
        ]));
        let tokens = Arc::new(FakeTokens::default());
        let search = controller(api.clone(), tokens.clone(), Arc::default()).await;

        let err = search.submit_search("shoes").await.unwrap_err();

        assert!(matches!(err, Error::AuthExpired));
        assert_eq!(tokens.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(api.requests().len(), 2);
        assert_eq!(search.current_page(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_state_untouched() {
        let api = Arc::new(FakeApi::new(vec![Ok(ApiResponse::with_status(401))]));
        let tokens = Arc::new(FakeTokens {
            fail: true,
            ..Default::default()
        });
        let search = controller(api.clone(), tokens, Arc::default()).await;

        let err = search.submit_search("shoes").await.unwrap_err();

        assert!(matches!(err, Error::ReauthFailed(_)));
        assert_eq!(api.requests().len(), 1);
        assert!(search.results().is_empty());
        assert_eq!(search.current_page(), 0);
        assert!(!search.is_fetching());
    }

    #[tokio::test]
    async fn failed_page_is_retried_at_the_same_cursor() {
        let api = Arc::new(FakeApi::new(vec![
            Ok(posts("shoes", 5)),
            Err(Error::NetworkFailure("connection reset".to_string())),
            Ok(ApiResponse::with_status(500)),
            Ok(posts("shoes", 1)),
        ]));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        search.submit_search("shoes").await.unwrap();
        let err = search.fetch_next_page().await.unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
        let err = search.fetch_next_page().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus(500)));

        assert_eq!(search.results().len(), 5);
        assert_eq!(search.current_page(), 1);
        assert!(!search.is_fetching());

        search.fetch_next_page().await.unwrap();
        let pages: Vec<_> = api
            .requests()
            .iter()
            .map(|request| request.parameter("page").cloned())
            .collect();
        assert_eq!(
            pages,
            vec![Some(json!(0)), Some(json!(1)), Some(json!(1)), Some(json!(1))]
        );
        assert_eq!(search.results().len(), 6);
    }

    #[tokio::test]
    async fn undecodable_payload_is_a_network_failure() {
        let api = Arc::new(FakeApi::new(vec![Ok(ApiResponse::ok(json!({ "unexpected": true })))]));
        let search = controller(api, Arc::default(), Arc::default()).await;

        let err = search.submit_search("shoes").await.unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
        assert_eq!(search.current_page(), 0);
    }

    #[tokio::test]
    async fn removing_history_entry_clears_results() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("RecentSearch", &["b".to_string(), "c".to_string()])
            .await
            .unwrap();
        let api = Arc::new(FakeApi::new(vec![Ok(posts("a", 3))]));
        let search = controller(api, Arc::default(), store.clone()).await;

        search.submit_search("a").await.unwrap();
        assert_eq!(search.history(), vec!["a", "b", "c"]);

        let removed = search.remove_history_entry(0).await.unwrap();

        assert_eq!(removed, "a");
        assert_eq!(search.history(), vec!["b", "c"]);
        assert!(search.results().is_empty());
        assert_eq!(search.current_page(), 0);
        assert_eq!(
            store.get("RecentSearch").await.unwrap(),
            Some(vec!["b".to_string(), "c".to_string()])
        );
    }

    #[tokio::test]
    async fn removing_out_of_range_entry_fails() {
        let search = controller(Arc::default(), Arc::default(), Arc::default()).await;

        let err = search.remove_history_entry(0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidHistoryIndex { index: 0, len: 0 }));
    }

    #[tokio::test]
    async fn history_is_capped_at_twelve() {
        let store = Arc::new(MemoryStore::new());
        let search = controller(Arc::default(), Arc::default(), store.clone()).await;

        for i in 1..=13 {
            search.add_recent_search(&format!("term-{}", i)).await.unwrap();
            assert!(search.history().len() <= 12);
        }

        let history = search.history();
        assert_eq!(history.len(), 12);
        assert_eq!(history[0], "term-13");
        assert_eq!(history[11], "term-2");
        assert_eq!(store.get("RecentSearch").await.unwrap().unwrap().len(), 12);

        search.clear_history().await.unwrap();
        assert!(search.history().is_empty());
        assert_eq!(store.get("RecentSearch").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn configured_limit_above_twelve_still_caps_history() {
        let config = SearchConfig {
            history_limit: 20,
            ..SearchConfig::default()
        };
        let search = SearchController::new(
            Arc::new(FakeApi::default()),
            Arc::new(FakeTokens::default()),
            Arc::new(MemoryStore::new()),
            config,
        )
        .await
        .unwrap();

        for i in 1..=20 {
            search.add_recent_search(&format!("term-{}", i)).await.unwrap();
        }
        assert_eq!(search.history().len(), 12);
    }

    #[tokio::test]
    async fn status_filter_reloads_from_first_page() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("shoes", 5)), Ok(posts("shoes", 1))]));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        search.submit_search("shoes").await.unwrap();
        let outcome = search.set_post_status(PostStatus::Closed).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Loaded { items: 1, page: 1 });
        assert_eq!(search.results().len(), 1);
        let last = api.requests().pop().unwrap();
        assert_eq!(last.parameter("postStatus"), Some(&json!("CLOSED")));
        assert_eq!(last.parameter("page"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn same_status_is_reported_unchanged() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("shoes", 5))]));
        let search = controller(api.clone(), Arc::default(), Arc::default()).await;

        search.submit_search("shoes").await.unwrap();
        let outcome = search.set_post_status(PostStatus::Active).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Unchanged);
        assert_eq!(search.results().len(), 5);
        assert_eq!(search.current_page(), 1);
        assert_eq!(api.requests().len(), 1);
    }

    // Memory store whose writes can be switched to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, values: &[String]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Storage("disk full".to_string()));
            }
            self.inner.set(key, values).await
        }
    }

    #[tokio::test]
    async fn failed_history_write_leaves_search_untouched() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("bag", 3))]));
        let store = Arc::new(FlakyStore::default());
        let search = controller_with_store(api.clone(), store.clone()).await;

        search.submit_search("bag").await.unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);
        let mut events = search.subscribe();

        let err = search.submit_search("shoes").await.unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(search.history(), vec!["bag"]);
        assert_eq!(search.term(), Some("bag".to_string()));
        assert_eq!(search.results().len(), 3);
        assert_eq!(search.current_page(), 1);
        assert_eq!(api.requests().len(), 1);
        assert!(events.try_recv().is_err());
        assert_eq!(
            store.get("RecentSearch").await.unwrap(),
            Some(vec!["bag".to_string()])
        );
    }

    #[tokio::test]
    async fn failed_history_write_keeps_entries_on_remove_and_clear() {
        let api = Arc::new(FakeApi::new(vec![Ok(posts("bag", 3))]));
        let store = Arc::new(FlakyStore::default());
        let search = controller_with_store(api, store.clone()).await;

        search.submit_search("bag").await.unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        assert!(matches!(
            search.remove_history_entry(0).await.unwrap_err(),
            Error::Storage(_)
        ));
        assert_eq!(search.history(), vec!["bag"]);
        assert_eq!(search.term(), Some("bag".to_string()));
        assert_eq!(search.results().len(), 3);

        assert!(matches!(search.clear_history().await.unwrap_err(), Error::Storage(_)));
        assert_eq!(search.history(), vec!["bag"]);
    }

    #[tokio::test]
    async fn failed_add_keeps_history_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let search = controller_with_store(Arc::default(), store.clone()).await;
        store.fail_writes.store(true, Ordering::SeqCst);

        assert!(search.add_recent_search("shoes").await.is_err());
        assert!(search.history().is_empty());
    }

    #[tokio::test]
    async fn observers_see_each_transition() {
        let api = Arc::new(FakeApi::new(vec![
            Ok(posts("shoes", 2)),
            Err(Error::NetworkFailure("timeout".to_string())),
        ]));
        let search = controller(api, Arc::default(), Arc::default()).await;
        let mut events = search.subscribe();

        search.submit_search("shoes").await.unwrap();
        let _ = search.fetch_next_page().await;

        assert_eq!(
            events.try_recv().unwrap(),
            SearchEvent::HistoryUpdated(vec!["shoes".to_string()])
        );
        assert_eq!(events.try_recv().unwrap(), SearchEvent::ResultsCleared);
        assert_eq!(
            events.try_recv().unwrap(),
            SearchEvent::ResultsUpdated { total: 2, page: 1 }
        );
        assert!(matches!(events.try_recv().unwrap(), SearchEvent::FetchFailed(_)));
    }
}
