//! Client for the pizzeria API's bearer-token authentication.
//!
//! [`AuthClient`] logs in, registers, refreshes and logs out against the
//! backend's `/api/v1/auth` endpoints, and wraps arbitrary API calls with
//! [`AuthClient::fetch_with_auth`]: the held access token is attached and a
//! `401` triggers exactly one refresh followed by at most one retry.
//!
//! # Example
//!
//! ```no_run
//! use auth_client::{ApiRequest, AuthClient, ReqwestTransport};
//! use url::Url;
//!
//! # async fn run() -> Result<(), auth_client::ClientError> {
//! let base = Url::parse("http://localhost:3333").expect("valid URL");
//! let client = AuthClient::new(ReqwestTransport::new(base)?);
//! client.login("ana@pizzeria.test", "secret1").await?;
//! let orders = client.fetch_with_auth(ApiRequest::get("/api/v1/orders")).await?;
//! assert!(orders.is_success());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod transport;

pub use client::{AuthClient, RegisteredUser};
pub use error::ClientError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
