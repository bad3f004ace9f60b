//! Static bearer token authentication.

// self
use crate::{
	_prelude::*,
	auth::{AuthenticationProvider, AuthorizationValue, ProvideFuture, Secret},
};

/// Static bearer token (RFC 6750).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerAuthentication {
	scheme: String,
	token: Secret,
}
impl BearerAuthentication {
	/// Default scheme.
	pub const SCHEME: &'static str = "Bearer";

	/// Wraps `token`.
	pub fn new(token: impl Into<Secret>) -> Self {
		Self { scheme: Self::SCHEME.into(), token: token.into() }
	}

	/// Overrides the scheme.
	pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.scheme = scheme.into();

		self
	}

	/// Header value attached to requests.
	pub fn authorization(&self) -> AuthorizationValue {
		AuthorizationValue::new(self.scheme.clone(), self.token.clone())
	}
}
impl AuthenticationProvider<Option<AuthorizationValue>> for BearerAuthentication {
	fn provide<'a>(
		&'a self,
		_cancel: &'a CancellationToken,
	) -> ProvideFuture<'a, Option<AuthorizationValue>> {
		Box::pin(std::future::ready(Ok(Some(self.authorization()))))
	}
}
