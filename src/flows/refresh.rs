//! Refresh grant that keeps the refreshed token under its original cache key.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	flows::TokenService,
	provider::TokenProviderConfig,
	token::{TokenRequest, TokenResponse},
};

impl TokenService {
	/// Redeems `refresh_token`.
	///
	/// The cache entry the refresh token belongs to is evicted before the call, so a failed
	/// refresh never leaves a stale mapping behind. A successful response replaces that entry
	/// under its original key; refreshing a token the cache never tracked caches nothing.
	pub(crate) async fn refresh(
		&self,
		config: &TokenProviderConfig,
		request: &TokenRequest,
		refresh_token: &Secret,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		let tracked = self.cache.key_for_refresh_token(refresh_token.expose());
		let guard = self.flow_guards.acquire(tracked.as_deref().unwrap_or(refresh_token.expose()));
		let _singleflight = guard.lock().await;

		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		self.cache.evict_refresh_token(refresh_token.expose());

		let response = self.exchange(config, request, cancel).await?;

		if let Some(key) = tracked.filter(|_| !response.has_error()) {
			self.cache.insert(key, response.clone());
		}

		Ok(response)
	}
}
