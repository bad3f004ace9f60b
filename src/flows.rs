//! OAuth 2.0 token service: provider resolution, cached grants, refresh, and revocation.

mod cached;
mod common;
mod refresh;
mod revoke;

// self
use crate::{
	_prelude::*,
	client::DEFAULT_MAX_RESPONSE_CONTENT_BUFFER_SIZE,
	error::ConfigError,
	flows::common::FlowGuards,
	oauth,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::{DEFAULT_TOKEN_PROVIDER, ProviderName, TokenProviderConfig},
	store::TokenCache,
	token::{TokenRequest, TokenResponse},
	transport::{HttpTransport, ResponseBodyLimit},
};

/// Issues, caches, refreshes, and revokes access tokens for named providers.
///
/// The service owns the transport used for token calls, the immutable provider registry, and
/// the [`TokenCache`]. Cacheable grants (Client Credentials and Password) are served from the
/// cache until the token expires, then refreshed when a refresh token is available and
/// re-requested otherwise. Concurrent requests for one cache key are serialized so only one
/// of them reaches the token endpoint; requests for different keys never wait on each other.
pub struct TokenService {
	transport: Arc<dyn HttpTransport>,
	providers: HashMap<ProviderName, TokenProviderConfig>,
	cache: TokenCache,
	flow_guards: FlowGuards,
	response_limit: ResponseBodyLimit,
}
impl TokenService {
	/// Creates a service without providers.
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			transport,
			providers: HashMap::new(),
			cache: TokenCache::default(),
			flow_guards: FlowGuards::default(),
			response_limit: ResponseBodyLimit(DEFAULT_MAX_RESPONSE_CONTENT_BUFFER_SIZE),
		}
	}

	/// Caps the size of token endpoint response bodies.
	pub fn with_response_limit(mut self, limit: usize) -> Self {
		self.response_limit = ResponseBodyLimit(limit);

		self
	}

	/// Registers a provider; names are unique ignoring case.
	pub fn with_provider(
		mut self,
		name: ProviderName,
		config: TokenProviderConfig,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		if self.providers.contains_key(&name) {
			return Err(ConfigError::DuplicateProvider { provider: name.to_string() });
		}

		self.providers.insert(name, config);

		Ok(self)
	}

	/// Resolves a provider by name, ignoring case.
	pub fn provider(
		&self,
		name: &str,
	) -> Result<(&ProviderName, &TokenProviderConfig), ConfigError> {
		ProviderName::new(name)
			.ok()
			.and_then(|name| self.providers.get_key_value(&name))
			.ok_or_else(|| ConfigError::UnknownProvider { provider: name.to_owned() })
	}

	/// Registered providers in arbitrary order.
	pub fn providers(&self) -> impl Iterator<Item = (&ProviderName, &TokenProviderConfig)> {
		self.providers.iter()
	}

	/// Underlying token cache.
	pub fn cache(&self) -> &TokenCache {
		&self.cache
	}

	/// Returns the response currently cached for `request`, expired or not.
	pub fn cached_token(
		&self,
		provider: &str,
		request: &TokenRequest,
	) -> Result<Option<TokenResponse>> {
		let (name, config) = self.provider(provider)?;

		Ok(self.cache.get(&request.cache_key(name, config)))
	}

	/// Executes `request` against `provider`.
	///
	/// Configuration problems (unknown provider, grant mismatch) and cancellation are errors;
	/// everything the provider or the network does wrong is reported through the returned
	/// [`TokenResponse`].
	pub async fn request_token(
		&self,
		provider: &str,
		request: &TokenRequest,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		let kind = OperationKind::of_token_request(request);
		let span = OperationSpan::new(kind, "request_token");

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				if cancel.is_cancelled() {
					return Err(Error::Cancelled);
				}

				let (name, config) = self.provider(provider)?;

				request.ensure_grant(name, config)?;

				match request {
					TokenRequest::ClientCredentials { .. } | TokenRequest::Password { .. } =>
						self.request_cacheable(name, config, request, cancel).await,
					TokenRequest::Refresh { refresh_token, .. } =>
						self.refresh(config, request, refresh_token, cancel).await,
					TokenRequest::Revoke { token, hint, .. } =>
						self.revoke(config, request, token, *hint, cancel).await,
				}
			})
			.await;

		match &result {
			Ok(response) if !response.has_error() =>
				obs::record_operation_outcome(kind, OperationOutcome::Success),
			_ => obs::record_operation_outcome(kind, OperationOutcome::Failure),
		}

		result
	}

	/// [`request_token`](Self::request_token) against [`DEFAULT_TOKEN_PROVIDER`].
	pub async fn request_default_token(
		&self,
		request: &TokenRequest,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		self.request_token(DEFAULT_TOKEN_PROVIDER, request, cancel).await
	}

	/// Drops every cached token.
	pub fn clear(&self) {
		self.cache.clear();
	}

	async fn exchange(
		&self,
		config: &TokenProviderConfig,
		request: &TokenRequest,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		oauth::exchange(self.transport.as_ref(), config, request, self.response_limit, cancel).await
	}
}
impl Debug for TokenService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenService")
			.field("providers", &self.providers.keys().collect::<Vec<_>>())
			.field("cached", &self.cache.len())
			.field("response_limit", &self.response_limit.0)
			.finish()
	}
}
