//! OAuth 2.0 access token authentication, static or backed by the token service.

// self
use crate::{
	_prelude::*,
	auth::{AuthenticationProvider, AuthorizationValue, BearerAuthentication, ProvideFuture, Secret},
	flows::TokenService,
	token::{TokenRequest, TokenResponse},
};

/// Pre-issued OAuth 2.0 access token sent as `Authorization: Bearer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuth2Authentication {
	scheme: String,
	access_token: Secret,
}
impl OAuth2Authentication {
	/// Wraps `access_token`.
	pub fn new(access_token: impl Into<Secret>) -> Self {
		Self { scheme: BearerAuthentication::SCHEME.into(), access_token: access_token.into() }
	}

	/// Uses the access token and token type of a successful response.
	///
	/// Returns `None` when the response failed or carries no access token.
	pub fn from_token_response(response: &TokenResponse) -> Option<Self> {
		if response.has_error() || !response.has_access_token() {
			return None;
		}

		let access_token = response.access_token.clone()?;

		Some(Self { scheme: authorization_scheme(response.token_type.as_deref()), access_token })
	}

	/// Overrides the scheme.
	pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.scheme = scheme.into();

		self
	}

	/// Header value attached to requests.
	pub fn authorization(&self) -> AuthorizationValue {
		AuthorizationValue::new(self.scheme.clone(), self.access_token.clone())
	}
}
impl AuthenticationProvider<Option<AuthorizationValue>> for OAuth2Authentication {
	fn provide<'a>(
		&'a self,
		_cancel: &'a CancellationToken,
	) -> ProvideFuture<'a, Option<AuthorizationValue>> {
		Box::pin(std::future::ready(Ok(Some(self.authorization()))))
	}
}

/// Requests a token from a [`TokenService`] provider for every outgoing request.
///
/// Cached grants make this cheap: only the first request (and any request after expiry) reaches
/// the token endpoint.
#[derive(Clone, Debug)]
pub struct TokenServiceAuthentication {
	service: Arc<TokenService>,
	provider: String,
	request: TokenRequest,
}
impl TokenServiceAuthentication {
	/// Binds `request` against `provider` on `service`.
	pub fn new(
		service: Arc<TokenService>,
		provider: impl Into<String>,
		request: TokenRequest,
	) -> Self {
		Self { service, provider: provider.into(), request }
	}

	/// Provider the tokens are requested from.
	pub fn provider(&self) -> &str {
		&self.provider
	}
}
impl AuthenticationProvider<Option<AuthorizationValue>> for TokenServiceAuthentication {
	fn provide<'a>(
		&'a self,
		cancel: &'a CancellationToken,
	) -> ProvideFuture<'a, Option<AuthorizationValue>> {
		Box::pin(async move {
			let response = self.service.request_token(&self.provider, &self.request, cancel).await?;

			if response.has_error() || !response.has_access_token() {
				return Err(Error::TokenRequest {
					provider: self.provider.clone(),
					error: response.error.clone().unwrap_or_else(|| "missing_access_token".into()),
					description: response.error_description.clone(),
				});
			}

			let authentication = OAuth2Authentication::from_token_response(&response);

			Ok(authentication.map(|auth| auth.authorization()))
		})
	}
}

fn authorization_scheme(token_type: Option<&str>) -> String {
	match token_type.map(str::trim).filter(|t| !t.is_empty()) {
		Some(t) if t.eq_ignore_ascii_case(BearerAuthentication::SCHEME) =>
			BearerAuthentication::SCHEME.into(),
		Some(t) => t.to_owned(),
		None => BearerAuthentication::SCHEME.into(),
	}
}
