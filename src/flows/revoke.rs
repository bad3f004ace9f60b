//! Token revocation (RFC 7009).

// self
use crate::{
	_prelude::*,
	auth::Secret,
	flows::TokenService,
	provider::TokenProviderConfig,
	token::{TokenRequest, TokenResponse, TokenTypeHint},
};

impl TokenService {
	/// Evicts whatever the cache holds for `token`, then always calls the revocation endpoint.
	///
	/// The reverse map named by `hint` is consulted first and the other one second, mirroring
	/// how servers treat the hint as advisory.
	pub(crate) async fn revoke(
		&self,
		config: &TokenProviderConfig,
		request: &TokenRequest,
		token: &Secret,
		hint: TokenTypeHint,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let token = token.expose();
		let evicted = match hint {
			TokenTypeHint::RefreshToken => self
				.cache
				.evict_refresh_token(token)
				.or_else(|| self.cache.evict_access_token(token)),
			TokenTypeHint::AccessToken | TokenTypeHint::IdentityToken => self
				.cache
				.evict_access_token(token)
				.or_else(|| self.cache.evict_refresh_token(token)),
		};

		#[cfg(feature = "tracing")]
		tracing::debug!(hint = hint.as_str(), evicted = evicted.is_some(), "revoking token");
		#[cfg(not(feature = "tracing"))]
		let _ = evicted;

		self.exchange(config, request, cancel).await
	}
}
