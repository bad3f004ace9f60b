// self
use crate::{
	_prelude::*,
	auth::Secret,
	provider::{ClientAuthenticationMethod, GrantType, TokenProviderConfigBuilder},
};

/// Errors raised while constructing or validating provider configurations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum TokenProviderConfigError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Client identifier is mandatory.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Endpoints must be HTTP(S) URLs.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Static per-provider token configuration, immutable once registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenProviderConfig {
	/// Grant requested by cacheable token requests.
	#[serde(default)]
	pub grant_type: GrantType,
	/// Token endpoint used for grants and refreshes.
	pub token_endpoint: Url,
	/// Revocation endpoint; the token endpoint is used when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revocation_endpoint: Option<Url>,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<Secret>,
	/// Default scope sent when requests carry no override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Client authentication method for token and revocation calls.
	#[serde(default)]
	pub client_authentication_method: ClientAuthenticationMethod,
}
impl TokenProviderConfig {
	/// Creates a new builder for the provided grant.
	pub fn builder(grant_type: GrantType) -> TokenProviderConfigBuilder {
		TokenProviderConfigBuilder::new(grant_type)
	}

	/// Endpoint receiving revocation requests.
	pub fn revocation_endpoint(&self) -> &Url {
		self.revocation_endpoint.as_ref().unwrap_or(&self.token_endpoint)
	}

	/// Validates invariants that deserialized configurations may violate.
	pub fn validate(&self) -> Result<(), TokenProviderConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(TokenProviderConfigError::MissingClientId);
		}

		validate_endpoint("token", &self.token_endpoint)?;

		if let Some(url) = &self.revocation_endpoint {
			validate_endpoint("revocation", url)?;
		}

		Ok(())
	}
}

fn validate_endpoint(endpoint: &'static str, url: &Url) -> Result<(), TokenProviderConfigError> {
	match url.scheme() {
		"http" | "https" if url.has_host() => Ok(()),
		_ => Err(TokenProviderConfigError::UnsupportedEndpoint { endpoint, url: url.to_string() }),
	}
}
