//! Header-based authentication handlers.

// self
use crate::{
	_prelude::*,
	auth::{AuthFuture, AuthenticationHandler, AuthenticationProvider, AuthorizationValue},
	client::RestRequest,
	headers::{AUTHORIZATION, RestHttpHeaders},
};

/// Replaces request headers with the ones returned by its provider.
///
/// Headers already on the request under a provided name are removed first, so credentials are
/// never appended next to a stale value.
#[derive(Clone)]
pub struct HeaderAuthenticationHandler {
	provider: Arc<dyn AuthenticationProvider<RestHttpHeaders>>,
}
impl HeaderAuthenticationHandler {
	/// Wraps `provider`.
	pub fn new(provider: impl 'static + AuthenticationProvider<RestHttpHeaders>) -> Self {
		Self { provider: Arc::new(provider) }
	}
}
impl AuthenticationHandler for HeaderAuthenticationHandler {
	fn authenticate<'a>(
		&'a self,
		request: &'a mut RestRequest,
		cancel: &'a CancellationToken,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			let provided = self.provider.provide(cancel).await?;

			for (name, values) in provided.iter() {
				request.headers.remove(name);

				for value in values {
					request.headers.add(name, value.as_str());
				}
			}

			Ok(())
		})
	}
}

/// Writes the `Authorization` header when its provider yields a value.
#[derive(Clone)]
pub struct AuthorizationHeaderHandler {
	provider: Arc<dyn AuthenticationProvider<Option<AuthorizationValue>>>,
}
impl AuthorizationHeaderHandler {
	/// Wraps `provider`.
	pub fn new(
		provider: impl 'static + AuthenticationProvider<Option<AuthorizationValue>>,
	) -> Self {
		Self { provider: Arc::new(provider) }
	}
}
impl AuthenticationHandler for AuthorizationHeaderHandler {
	fn authenticate<'a>(
		&'a self,
		request: &'a mut RestRequest,
		cancel: &'a CancellationToken,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			if let Some(value) = self.provider.provide(cancel).await? {
				request.headers.replace(AUTHORIZATION, value.header_value());
			}

			Ok(())
		})
	}
}
