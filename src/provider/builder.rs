// self
use crate::{
	_prelude::*,
	auth::Secret,
	provider::{
		ClientAuthenticationMethod, GrantType, TokenProviderConfig, TokenProviderConfigError,
	},
};

/// Builder for [`TokenProviderConfig`] values.
#[derive(Debug)]
pub struct TokenProviderConfigBuilder {
	/// Grant requested by cacheable token requests.
	pub grant_type: GrantType,
	/// Token endpoint used for grants and refreshes.
	pub token_endpoint: Option<Url>,
	/// Optional revocation endpoint.
	pub revocation_endpoint: Option<Url>,
	/// OAuth 2.0 client identifier.
	pub client_id: Option<String>,
	/// Optional client secret.
	pub client_secret: Option<Secret>,
	/// Default scope.
	pub scope: Option<String>,
	/// Client authentication method.
	pub client_authentication_method: ClientAuthenticationMethod,
}
impl TokenProviderConfigBuilder {
	/// Creates a new builder seeded with the provided grant.
	pub fn new(grant_type: GrantType) -> Self {
		Self {
			grant_type,
			token_endpoint: None,
			revocation_endpoint: None,
			client_id: None,
			client_secret: None,
			scope: None,
			client_authentication_method: ClientAuthenticationMethod::default(),
		}
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the revocation endpoint.
	pub fn revocation_endpoint(mut self, url: Url) -> Self {
		self.revocation_endpoint = Some(url);

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, client_secret: impl Into<Secret>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the default scope (space separated).
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the client authentication method.
	pub fn client_authentication_method(mut self, method: ClientAuthenticationMethod) -> Self {
		self.client_authentication_method = method;

		self
	}

	/// Builds and validates the configuration.
	pub fn build(self) -> Result<TokenProviderConfig, TokenProviderConfigError> {
		let config = TokenProviderConfig {
			grant_type: self.grant_type,
			token_endpoint: self
				.token_endpoint
				.ok_or(TokenProviderConfigError::MissingTokenEndpoint)?,
			revocation_endpoint: self.revocation_endpoint,
			client_id: self.client_id.ok_or(TokenProviderConfigError::MissingClientId)?,
			client_secret: self.client_secret,
			scope: self.scope,
			client_authentication_method: self.client_authentication_method,
		};

		config.validate()?;

		Ok(config)
	}
}
