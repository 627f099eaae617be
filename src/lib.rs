//! Client SDK for the SW REST API.
//!
//! Wraps a remote HTTP API behind two pieces of machinery:
//!
//! - a uniform response envelope ([`ApiResponse`]) into which every outcome
//!   converges — API-level errors, unexpected status codes, transport
//!   failures, and bodies that fail to deserialize all come back as the same
//!   typed shape, never as an `Err` at the call boundary
//! - a lazily-acquired, expiry-renewed bearer-token session ([`Session`])
//!   with single-flight refresh
//!
//! Every operation performs exactly one HTTP call: no retries, no pooling,
//! no rate limiting. The HTTP client is scoped per call so proxy and timeout
//! configuration never leak between operations.
//!
//! # Examples
//!
//! ## Authenticated call
//!
//! ```no_run
//! use sw_client::{Executor, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::with_credentials(
//!     "https://services.test.sw.com.mx",
//!     "user@example.com",
//!     "secret",
//! );
//! session.ensure_valid().await;
//!
//! let request = session.request().await?;
//! let executor = Executor::new(session.base_url());
//! let response: sw_client::ApiResponse<serde_json::Value> =
//!     executor.get("account/balance", &request).await;
//!
//! if response.is_success() {
//!     println!("balance: {:?}", response.data);
//! } else {
//!     eprintln!(
//!         "{}: {}",
//!         response.message.unwrap_or_default(),
//!         response.message_detail.unwrap_or_default(),
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Binary upload through a proxy
//!
//! ```no_run
//! use sw_client::{Executor, ProxyConfig, Request};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = Request::builder()
//!     .bearer("pre-issued-token")?
//!     .proxy(ProxyConfig::new("proxy.internal", 3128))
//!     .build();
//!
//! let executor = Executor::new("https://services.test.sw.com.mx");
//! let document = std::fs::read("invoice.xml")?;
//! let response: sw_client::ApiResponse<serde_json::Value> =
//!     executor.post_binary("cfdi33/stamp/v4", &request, document).await;
//! # Ok(())
//! # }
//! ```

mod body;
mod error;
mod executor;
mod request;
mod response;
mod session;

// Re-export public API
pub use body::Body;
pub use error::ClientError;
pub use executor::Executor;
pub use request::{ProxyConfig, Request, RequestBuilder};
pub use response::{ApiResponse, STATUS_ERROR, STATUS_SUCCESS};
pub use session::{AuthData, Credentials, Session};

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
