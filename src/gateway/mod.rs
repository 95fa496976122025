//! Registry protocol gateway
//!
//! This module maps inbound registry requests onto the provider version
//! layer and serves them over HTTP.
//!
//! # Modules
//!
//! - [`error`]: Handler errors and their HTTP status mapping
//! - [`handlers`]: List-versions and download handlers
//! - [`response`]: Response values and the per-request context
//! - [`router`]: Structural path matcher and dispatcher
//! - [`server`]: axum front end and server lifecycle

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod server;
