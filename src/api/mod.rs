pub mod endpoint;

pub use endpoint::{Endpoint, HeaderPolicy, HttpMethod};

use crate::error::Result;
use crate::models::ApiResponse;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// How the parameters of a request are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    QueryString,
    FormUrlEncoded,
    Json,
    Multipart,
    Plain,
}

/// A fully described request, ready for an HTTP client to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub parameters: Map<String, Value>,
    pub encoding: Encoding,
    pub headers: HeaderPolicy,
}

impl ApiRequest {
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

/// Transport port. Implementations own the base URL, header values and
/// decoding of the JSON envelope; the core only inspects `status` and `data`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse<Value>>;
}
