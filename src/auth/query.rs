//! Query-parameter authentication handler.

// self
use crate::{
	_prelude::*,
	auth::{AuthFuture, AuthenticationHandler, AuthenticationProvider},
	client::RestRequest,
};

/// Query parameters appended by [`QueryAuthenticationHandler`].
pub type QueryParameters = Vec<(String, String)>;

/// Appends provider parameters to the request query, preserving existing parameters.
#[derive(Clone)]
pub struct QueryAuthenticationHandler {
	provider: Arc<dyn AuthenticationProvider<QueryParameters>>,
}
impl QueryAuthenticationHandler {
	/// Wraps `provider`.
	pub fn new(provider: impl 'static + AuthenticationProvider<QueryParameters>) -> Self {
		Self { provider: Arc::new(provider) }
	}
}
impl AuthenticationHandler for QueryAuthenticationHandler {
	fn authenticate<'a>(
		&'a self,
		request: &'a mut RestRequest,
		cancel: &'a CancellationToken,
	) -> AuthFuture<'a> {
		Box::pin(async move {
			let parameters = self.provider.provide(cancel).await?;

			if !parameters.is_empty() {
				request.url.query_pairs_mut().extend_pairs(parameters.iter());
			}

			Ok(())
		})
	}
}
