//! Fluent construction of [`RestClient`] values.
//!
//! The builder accumulates options, serializers, token providers, validators, and the
//! authentication handler, then checks everything in [`RestClientBuilder::build`] so that
//! configuration mistakes fail at startup instead of on the first request.

// std
use std::collections::HashSet;
// self
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;
use crate::{
	_prelude::*,
	auth::{
		ApiKeyAuthentication, AuthenticationHandler, AuthorizationHeaderHandler,
		BasicAuthentication, BearerAuthentication, NoAuthentication, OAuth2Authentication, Secret,
		TokenServiceAuthentication,
	},
	client::{RestClient, RestClientOptions},
	content::ContentSerializer,
	error::ConfigError,
	flows::TokenService,
	headers::RestHttpHeaders,
	provider::{DEFAULT_TOKEN_PROVIDER, ProviderName, TokenProviderConfig},
	token::TokenRequest,
	transport::HttpTransport,
};

/// Check run against the builder state before a client is created.
pub trait RestClientValidator
where
	Self: Send + Sync,
{
	/// Rejects the configuration with a [`ConfigError`].
	fn validate(&self, builder: &RestClientBuilder) -> Result<(), ConfigError>;
}

/// Validates token provider names and configurations and rejects duplicate names.
///
/// Always runs first during [`RestClientBuilder::build`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenProviderValidator;
impl RestClientValidator for TokenProviderValidator {
	fn validate(&self, builder: &RestClientBuilder) -> Result<(), ConfigError> {
		let mut seen = HashSet::new();

		for (name, config) in builder.token_providers() {
			let name = ProviderName::new(name)?;

			config.validate()?;

			if !seen.insert(name.clone()) {
				return Err(ConfigError::DuplicateProvider { provider: name.to_string() });
			}
		}

		Ok(())
	}
}

/// Declarative client configuration, typically loaded from a config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestClientSettings {
	/// Base address for relative URLs.
	pub base_address: Option<Url>,
	/// Default headers; every value is sent.
	pub default_headers: BTreeMap<String, Vec<String>>,
	/// Request timeout in milliseconds.
	pub timeout_ms: Option<u64>,
	/// Response buffer limit in bytes.
	pub max_response_content_buffer_size: Option<usize>,
	/// Token providers keyed by name.
	pub token_providers: BTreeMap<String, TokenProviderConfig>,
}

enum HandlerSlot {
	Ready(Arc<dyn AuthenticationHandler>),
	TokenService { provider: String, request: TokenRequest },
}

/// Builder for [`RestClient`].
///
/// Starts with [`NoAuthentication`] registered, so a builder that never touches
/// authentication still satisfies the single-handler rule.
pub struct RestClientBuilder {
	options: RestClientOptions,
	handlers: Vec<HandlerSlot>,
	transport: Option<Arc<dyn HttpTransport>>,
	token_providers: Vec<(String, TokenProviderConfig)>,
}
impl RestClientBuilder {
	/// Creates a builder with default options.
	pub fn new() -> Self {
		Self::with_options(RestClientOptions::default())
	}

	/// Creates a builder seeded with `options`.
	pub fn with_options(options: RestClientOptions) -> Self {
		Self {
			options,
			handlers: vec![HandlerSlot::Ready(Arc::new(NoAuthentication))],
			transport: None,
			token_providers: Vec::new(),
		}
	}

	/// Creates a builder from declarative settings.
	pub fn from_settings(settings: RestClientSettings) -> Result<Self, ConfigError> {
		let mut builder = Self::new();

		if let Some(base_address) = settings.base_address {
			builder = builder.base_address(base_address);
		}
		for (name, values) in settings.default_headers {
			for value in values {
				builder = builder.default_header(name.as_str(), value);
			}
		}
		if let Some(timeout_ms) = settings.timeout_ms {
			let millis = i64::try_from(timeout_ms).map_err(|_| ConfigError::InvalidTimeout)?;

			builder = builder.timeout(Duration::milliseconds(millis));
		}
		if let Some(size) = settings.max_response_content_buffer_size {
			builder = builder.max_response_content_buffer_size(size);
		}
		for (name, config) in settings.token_providers {
			builder = builder.token_provider(name, config);
		}

		Ok(builder)
	}

	/// Sets the base address relative URLs resolve against.
	pub fn base_address(mut self, base_address: Url) -> Self {
		self.options.set_base_address(Some(base_address));

		self
	}

	/// Replaces the default headers.
	pub fn default_headers(mut self, headers: RestHttpHeaders) -> Self {
		self.options.default_headers = headers;

		self
	}

	/// Appends one default header value.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.default_headers.add(name, value);

		self
	}

	/// Sets the request timeout used by the default transport.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.options.timeout = timeout;

		self
	}

	/// Sets the largest response body the client accepts.
	pub fn max_response_content_buffer_size(mut self, size: usize) -> Self {
		self.options.max_response_content_buffer_size = size;

		self
	}

	/// Uses `transport` for REST and token calls instead of the default reqwest transport.
	pub fn transport(mut self, transport: impl HttpTransport) -> Self {
		self.transport = Some(Arc::new(transport));

		self
	}

	/// Registers an additional content serializer.
	pub fn serializer(mut self, serializer: impl 'static + ContentSerializer) -> Self {
		self.options.serializers.register(Arc::new(serializer));

		self
	}

	/// Drops every registered serializer, including the defaults.
	pub fn clear_serializers(mut self) -> Self {
		self.options.serializers.clear();

		self
	}

	/// Replaces the authentication handler.
	pub fn authentication_handler(self, handler: impl 'static + AuthenticationHandler) -> Self {
		self.set_handler(HandlerSlot::Ready(Arc::new(handler)))
	}

	/// Registers another authentication handler next to the current one.
	///
	/// A client accepts exactly one handler, so [`build`](Self::build) fails unless the others
	/// are cleared first.
	pub fn add_authentication_handler(
		mut self,
		handler: impl 'static + AuthenticationHandler,
	) -> Self {
		self.handlers.push(HandlerSlot::Ready(Arc::new(handler)));

		self
	}

	/// Removes every authentication handler, including the default no-op one.
	pub fn clear_authentication_handler(mut self) -> Self {
		self.handlers.clear();

		self
	}

	/// HTTP Basic authentication.
	pub fn basic_authentication(
		self,
		username: impl AsRef<str>,
		password: impl AsRef<str>,
	) -> Self {
		self.authentication_handler(AuthorizationHeaderHandler::new(BasicAuthentication::new(
			username, password,
		)))
	}

	/// Static bearer token authentication.
	pub fn bearer_authentication(self, token: impl Into<Secret>) -> Self {
		self.authentication_handler(AuthorizationHeaderHandler::new(BearerAuthentication::new(
			token,
		)))
	}

	/// API key sent as header `key`.
	pub fn api_key_in_header_authentication(
		self,
		key: impl Into<String>,
		value: impl Into<Secret>,
	) -> Self {
		let handler = ApiKeyAuthentication::header(key, value).into_handler();

		self.set_handler(HandlerSlot::Ready(handler))
	}

	/// API key sent as query parameter `key`.
	pub fn api_key_in_query_authentication(
		self,
		key: impl Into<String>,
		value: impl Into<Secret>,
	) -> Self {
		let handler = ApiKeyAuthentication::query(key, value).into_handler();

		self.set_handler(HandlerSlot::Ready(handler))
	}

	/// Pre-issued OAuth 2.0 access token.
	pub fn oauth2_authentication(self, access_token: impl Into<Secret>) -> Self {
		self.authentication_handler(AuthorizationHeaderHandler::new(OAuth2Authentication::new(
			access_token,
		)))
	}

	/// OAuth 2.0 access token obtained from the client's token service for every request.
	pub fn oauth2_token_authentication(
		self,
		provider: impl Into<String>,
		request: TokenRequest,
	) -> Self {
		self.set_handler(HandlerSlot::TokenService { provider: provider.into(), request })
	}

	/// Registers a token provider.
	pub fn token_provider(mut self, name: impl Into<String>, config: TokenProviderConfig) -> Self {
		self.token_providers.push((name.into(), config));

		self
	}

	/// Registers the provider named [`DEFAULT_TOKEN_PROVIDER`].
	pub fn default_token_provider(self, config: TokenProviderConfig) -> Self {
		self.token_provider(DEFAULT_TOKEN_PROVIDER, config)
	}

	/// Registers a validator run by [`build`](Self::build).
	pub fn validator(mut self, validator: impl 'static + RestClientValidator) -> Self {
		self.options.validators.push(Arc::new(validator));

		self
	}

	/// Options accumulated so far.
	pub fn options(&self) -> &RestClientOptions {
		&self.options
	}

	/// Token providers in registration order.
	pub fn token_providers(&self) -> impl Iterator<Item = (&str, &TokenProviderConfig)> {
		self.token_providers.iter().map(|(name, config)| (name.as_str(), config))
	}

	/// Number of registered authentication handlers.
	pub fn authentication_handler_count(&self) -> usize {
		self.handlers.len()
	}

	/// Validates the configuration and creates the client.
	pub fn build(self) -> Result<RestClient, ConfigError> {
		let count = self.handlers.len();

		if count != 1 {
			return Err(ConfigError::AuthenticationHandlerCount { count });
		}

		self.options.validate()?;

		TokenProviderValidator.validate(&self)?;

		for validator in &self.options.validators {
			validator.validate(&self)?;
		}

		let Self { options, mut handlers, transport, token_providers } = self;
		let transport = match transport {
			Some(transport) => transport,
			None => default_transport(&options)?,
		};
		let mut service = TokenService::new(transport.clone())
			.with_response_limit(options.max_response_content_buffer_size);

		for (name, config) in token_providers {
			service = service.with_provider(ProviderName::new(name)?, config)?;
		}

		let service = Arc::new(service);
		let handler = match handlers.pop() {
			Some(HandlerSlot::Ready(handler)) => handler,
			Some(HandlerSlot::TokenService { provider, request }) => {
				let (name, config) = service.provider(&provider)?;

				request.ensure_grant(name, config)?;

				Arc::new(AuthorizationHeaderHandler::new(TokenServiceAuthentication::new(
					service.clone(),
					provider,
					request,
				)))
			},
			None => return Err(ConfigError::AuthenticationHandlerCount { count: 0 }),
		};

		Ok(RestClient::new(options, handler, transport, service))
	}

	fn set_handler(mut self, slot: HandlerSlot) -> Self {
		self.handlers = vec![slot];

		self
	}
}
impl Default for RestClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for RestClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClientBuilder")
			.field("options", &self.options)
			.field("handlers", &self.handlers.len())
			.field("transport", &self.transport.is_some())
			.field(
				"token_providers",
				&self.token_providers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
			)
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn default_transport(options: &RestClientOptions) -> Result<Arc<dyn HttpTransport>, ConfigError> {
	Ok(Arc::new(ReqwestTransport::with_timeout(options.timeout)?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport(_options: &RestClientOptions) -> Result<Arc<dyn HttpTransport>, ConfigError> {
	Err(ConfigError::MissingTransport)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::GrantType;

	fn provider_config() -> TokenProviderConfig {
		TokenProviderConfig::builder(GrantType::ClientCredentials)
			.token_endpoint(Url::parse("https://id.example.com/token").expect("URL should parse."))
			.client_id("client")
			.client_secret("secret")
			.build()
			.expect("Config should build.")
	}

	struct RequireBaseAddress;
	impl RestClientValidator for RequireBaseAddress {
		fn validate(&self, builder: &RestClientBuilder) -> Result<(), ConfigError> {
			match builder.options().base_address() {
				Some(_) => Ok(()),
				None => Err(ConfigError::validation("base address is required")),
			}
		}
	}

	#[test]
	fn duplicate_provider_names_are_rejected_ignoring_case() {
		let builder = RestClientBuilder::new()
			.token_provider("Identity", provider_config())
			.token_provider("identity", provider_config());

		assert!(matches!(
			TokenProviderValidator.validate(&builder),
			Err(ConfigError::DuplicateProvider { .. })
		));
	}

	#[test]
	fn custom_validators_run_before_transport_resolution() {
		let err = RestClientBuilder::new()
			.validator(RequireBaseAddress)
			.build()
			.expect_err("Validator should reject the builder.");

		assert!(matches!(err, ConfigError::Validation { .. }));
	}

	#[test]
	fn token_authentication_requires_a_known_provider() {
		let err = RestClientBuilder::new()
			.oauth2_token_authentication("missing", TokenRequest::client_credentials())
			.build()
			.expect_err("Unknown provider should be rejected.");

		assert!(matches!(err, ConfigError::UnknownProvider { .. }));
	}

	#[test]
	fn settings_deserialize_with_defaults() {
		let settings: RestClientSettings = serde_json::from_str(
			r#"{
				"base_address": "https://api.example.com/v1",
				"default_headers": { "Accept": ["application/json"] },
				"timeout_ms": 2500,
				"token_providers": {
					"identity": {
						"token_endpoint": "https://id.example.com/token",
						"client_id": "client",
						"client_secret": "secret"
					}
				}
			}"#,
		)
		.expect("Settings should deserialize.");
		let builder = RestClientBuilder::from_settings(settings).expect("Settings should apply.");

		assert_eq!(
			builder.options().base_address().map(Url::as_str),
			Some("https://api.example.com/v1/")
		);
		assert_eq!(builder.options().default_headers.get("accept"), Some("application/json"));
		assert_eq!(builder.options().timeout, Duration::milliseconds(2500));
		assert_eq!(builder.token_providers().count(), 1);
		assert!(TokenProviderValidator.validate(&builder).is_ok());
	}
}
