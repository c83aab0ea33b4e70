//! Client core of the TwoHoSun "buy or not" polling app: vote ratio
//! rendering and the paginated search controller with its recent-search
//! history. Networking, token storage and persistence are injected ports.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod validation;
pub mod voting;

pub use error::{Error, Result};
