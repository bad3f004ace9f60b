//! Cacheable grants (Client Credentials, Password) with expiry-driven refresh.

// self
use crate::{
	_prelude::*,
	flows::TokenService,
	obs::{self, CacheEvent},
	provider::{ProviderName, TokenProviderConfig},
	token::{TokenRequest, TokenResponse},
};

impl TokenService {
	/// Serves a cacheable grant from the cache, refreshing or re-requesting when expired.
	pub(crate) async fn request_cacheable(
		&self,
		provider: &ProviderName,
		config: &TokenProviderConfig,
		request: &TokenRequest,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		let key = request.cache_key(provider, config);
		let guard = self.flow_guards.acquire(&key);
		let _singleflight = guard.lock().await;
		let mut refreshed = None;

		match self.cache.get(&key) {
			Some(cached) if !cached.has_expired_at(OffsetDateTime::now_utc()) => {
				obs::trace_cache_event(CacheEvent::Hit, &key);
				obs::record_cache_event(CacheEvent::Hit);

				return Ok(cached);
			},
			Some(cached) => {
				obs::trace_cache_event(CacheEvent::Miss, &key);
				obs::record_cache_event(CacheEvent::Miss);
				self.cache.remove(&key);

				let refresh_token = cached.refresh_token.filter(|token| !token.is_empty());

				if let Some(refresh_token) = refresh_token {
					let refresh = TokenRequest::refresh_from(refresh_token, request.options());

					refreshed = Some(self.exchange(config, &refresh, cancel).await?);
				}
			},
			None => {
				obs::trace_cache_event(CacheEvent::Miss, &key);
				obs::record_cache_event(CacheEvent::Miss);
			},
		}

		let response = match refreshed {
			Some(response) if response.has_access_token() && !response.has_invalid_token_error() =>
				response,
			_ => self.exchange(config, request, cancel).await?,
		};

		if response.has_error() {
			self.cache.remove(&key);
		} else {
			self.cache.insert(key, response.clone());
		}

		Ok(response)
	}
}
