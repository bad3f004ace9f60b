//! HTTP Basic authentication.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{AuthenticationProvider, AuthorizationValue, ProvideFuture, Secret},
};

/// HTTP Basic credentials (RFC 7617).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuthentication {
	scheme: String,
	credential: Secret,
}
impl BasicAuthentication {
	/// Default scheme.
	pub const SCHEME: &'static str = "Basic";

	/// Encodes `username:password` as Base64.
	pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
		let encoded = STANDARD.encode(format!("{}:{}", username.as_ref(), password.as_ref()));

		Self::from_token_hash(encoded)
	}

	/// Uses an already encoded credential verbatim.
	pub fn from_token_hash(token_hash: impl Into<Secret>) -> Self {
		Self { scheme: Self::SCHEME.into(), credential: token_hash.into() }
	}

	/// Overrides the scheme.
	pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.scheme = scheme.into();

		self
	}

	/// Header value attached to requests.
	pub fn authorization(&self) -> AuthorizationValue {
		AuthorizationValue::new(self.scheme.clone(), self.credential.clone())
	}
}
impl AuthenticationProvider<Option<AuthorizationValue>> for BasicAuthentication {
	fn provide<'a>(
		&'a self,
		_cancel: &'a CancellationToken,
	) -> ProvideFuture<'a, Option<AuthorizationValue>> {
		Box::pin(std::future::ready(Ok(Some(self.authorization()))))
	}
}
