//! Authentication handlers and the credential strategies that feed them.
//!
//! An [`AuthenticationHandler`] mutates an outgoing [`RestRequest`] exactly once, after the URL
//! and headers are final and before the body is attached. Handlers come in three shapes, each
//! backed by an [`AuthenticationProvider`] that yields fresh credentials per request:
//!
//! - [`HeaderAuthenticationHandler`] replaces every header its provider returns.
//! - [`QueryAuthenticationHandler`] appends query parameters to the request URL.
//! - [`AuthorizationHeaderHandler`] writes a single optional `Authorization` value.
//!
//! Handlers and providers are shared by every request a client issues and must not keep
//! request-specific state.

pub mod api_key;
pub mod basic;
pub mod bearer;
pub mod header;
pub mod oauth2;
pub mod query;
pub mod secret;

pub use api_key::*;
pub use basic::*;
pub use bearer::*;
pub use header::*;
pub use oauth2::*;
pub use query::*;
pub use secret::*;

// self
use crate::{_prelude::*, client::RestRequest};

/// Future returned by [`AuthenticationHandler::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;
/// Future returned by [`AuthenticationProvider::provide`].
pub type ProvideFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Attaches credentials to an outgoing request.
pub trait AuthenticationHandler
where
	Self: Send + Sync,
{
	/// Mutates `request`; providers must observe `cancel` before any network side effect.
	fn authenticate<'a>(
		&'a self,
		request: &'a mut RestRequest,
		cancel: &'a CancellationToken,
	) -> AuthFuture<'a>;
}

/// Produces the credential value a handler attaches.
pub trait AuthenticationProvider<T>
where
	Self: Send + Sync,
{
	/// Yields a fresh credential for one request.
	fn provide<'a>(&'a self, cancel: &'a CancellationToken) -> ProvideFuture<'a, T>;
}

/// Handler that leaves requests untouched; registered by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuthentication;
impl AuthenticationHandler for NoAuthentication {
	fn authenticate<'a>(
		&'a self,
		_request: &'a mut RestRequest,
		_cancel: &'a CancellationToken,
	) -> AuthFuture<'a> {
		Box::pin(std::future::ready(Ok(())))
	}
}

/// `Authorization` header value split into scheme and credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationValue {
	/// Scheme such as `Basic` or `Bearer`.
	pub scheme: String,
	/// Credential following the scheme.
	pub credential: Secret,
}
impl AuthorizationValue {
	/// Creates a new value.
	pub fn new(scheme: impl Into<String>, credential: impl Into<Secret>) -> Self {
		Self { scheme: scheme.into(), credential: credential.into() }
	}

	/// Renders `scheme credential`.
	pub fn header_value(&self) -> String {
		format!("{} {}", self.scheme, self.credential.expose())
	}
}

/// Provider backed by an async closure invoked once per request.
pub struct FnProvider<F>(F);
impl<T, F, Fut> AuthenticationProvider<T> for FnProvider<F>
where
	F: Send + Sync + Fn(CancellationToken) -> Fut,
	Fut: 'static + Send + Future<Output = Result<T>>,
{
	fn provide<'a>(&'a self, cancel: &'a CancellationToken) -> ProvideFuture<'a, T> {
		Box::pin((self.0)(cancel.clone()))
	}
}

/// Wraps an async closure as an [`AuthenticationProvider`].
pub fn provider_fn<F, Fut>(f: F) -> FnProvider<F>
where
	F: Fn(CancellationToken) -> Fut,
{
	FnProvider(f)
}
