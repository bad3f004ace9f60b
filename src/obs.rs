//! Spans, events, and counters for REST requests, token exchanges, and the token cache.
//!
//! With the `tracing` feature every REST request and token exchange runs inside a
//! `rest_api_client.operation` span carrying `operation` and `stage`; cache activity is logged
//! at `debug`. With the `metrics` feature `rest_api_client_operation_total` counts outcomes per
//! operation and `rest_api_client_token_cache_total` counts cache events. Without either
//! feature the helpers compile to nothing.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, token::TokenRequest};

/// Operation kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// REST request dispatched through [`RestClient`](crate::client::RestClient).
	Request,
	/// Client Credentials grant.
	ClientCredentials,
	/// Password grant.
	Password,
	/// Refresh grant.
	Refresh,
	/// Token revocation.
	Revoke,
}
impl OperationKind {
	/// Label used for the `operation` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Request => "request",
			OperationKind::ClientCredentials => "client_credentials",
			OperationKind::Password => "password",
			OperationKind::Refresh => "refresh",
			OperationKind::Revoke => "revoke",
		}
	}

	/// Maps a token request onto its operation kind.
	pub const fn of_token_request(request: &TokenRequest) -> Self {
		match request {
			TokenRequest::ClientCredentials { .. } => OperationKind::ClientCredentials,
			TokenRequest::Password { .. } => OperationKind::Password,
			TokenRequest::Refresh { .. } => OperationKind::Refresh,
			TokenRequest::Revoke { .. } => OperationKind::Revoke,
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// A request or token exchange started.
	Attempt,
	/// The server answered with a success status and the body decoded.
	Success,
	/// An error, a non-success status, or an OAuth error response.
	Failure,
}
impl OperationOutcome {
	/// Label used for the `outcome` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token cache events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheEvent {
	/// A valid cached token was served.
	Hit,
	/// No usable cached token was found.
	Miss,
	/// A response was stored.
	Store,
	/// An entry was removed.
	Evict,
}
impl CacheEvent {
	/// Label used for the `event` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheEvent::Hit => "hit",
			CacheEvent::Miss => "miss",
			CacheEvent::Store => "store",
			CacheEvent::Evict => "evict",
		}
	}
}
