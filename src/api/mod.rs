//! Marketplace backend API
//!
//! HTTP plumbing shared by every form and listing feature: the client with
//! token handling, the transport seam, the canonical list envelope and the
//! retry policy used for reference-data reads.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod logging;
pub mod multipart;
pub mod pagination;
pub mod retry;
pub mod transport;

pub use auth::{AuthSession, FileTokenStore, LogNotifier, MemoryTokenStore, SessionNotifier, TokenPair, TokenStore};
pub use client::{ApiClient, ClientKind, RequestConfig};
pub use error::ApiError;
pub use multipart::{MultipartPayload, Part};
pub use pagination::{PaginatedList, normalize};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody, ScriptedTransport, Transport, TransportError};
