use crate::models::VisibilityScope;
use crate::search::MAX_HISTORY_LEN;
use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_HISTORY_LIMIT: usize = MAX_HISTORY_LEN;
pub const RECENT_SEARCH_KEY: &str = "RecentSearch";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub search: SearchConfig,
}

/// Tunables of the search controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub page_size: u32,
    pub history_limit: usize,
    pub history_key: String,
    pub visibility_scope: VisibilityScope,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_key: RECENT_SEARCH_KEY.to_string(),
            visibility_scope: VisibilityScope::Global,
        }
    }
}

impl Config {
    /// Reads the environment (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn from_env() -> Self {
        let defaults = SearchConfig::default();
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:twohosun.db".to_string()),
            search: SearchConfig {
                page_size: load_or("SEARCH_PAGE_SIZE", defaults.page_size),
                history_limit: clamp_history_limit(load_or(
                    "SEARCH_HISTORY_LIMIT",
                    defaults.history_limit,
                )),
                history_key: defaults.history_key,
                visibility_scope: load_or("VISIBILITY_SCOPE", defaults.visibility_scope),
            },
        }
    }
}

fn clamp_history_limit(limit: usize) -> usize {
    if limit > DEFAULT_HISTORY_LIMIT {
        warn!(
            "SEARCH_HISTORY_LIMIT {} exceeds the maximum of {}, clamping",
            limit, DEFAULT_HISTORY_LIMIT
        );
        return DEFAULT_HISTORY_LIMIT;
    }
    limit
}

fn load_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {} value {:?}: {}, using default {:?}", key, raw, e, default);
            default
        }),
        Err(_) => {
            info!("{} not set, using default: {:?}", key, default);
            default
        }
    }
}
