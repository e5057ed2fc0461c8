//! # portal-api
//!
//! Client for the remote resource API holding user and administrator
//! accounts.
//!
//! The API is resource oriented with two collections, `/users` and
//! `/admin`, in the style of json-server:
//!
//! - `GET /{collection}?email=E[&password=P]` - exact-match lookup
//! - `GET /{collection}` - full listing
//! - `POST /{collection}` - create, answered with `201 Created`
//! - `GET|PUT|PATCH|DELETE /{collection}/{id}`
//!
//! [`AccountApi`] is the seam the identity providers depend on.
//! [`HttpAccountApi`] talks to a real server; [`MemoryAccountApi`] keeps
//! both collections in process for offline development and tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use client::{AccountApi, AccountQuery, Collection, Created};
pub use error::{ApiError, ApiResult};
pub use http::HttpAccountApi;
pub use memory::{MemoryAccountApi, Operation};
