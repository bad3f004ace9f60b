// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::ConfigError,
	provider::{GrantType, ProviderName, TokenProviderConfig},
};

/// Wire value of the refresh grant.
pub const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Scope override and extra form parameters shared by every token request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenRequestOptions {
	/// Scope override; `None` or a blank value falls back to the provider scope.
	pub scope: Option<String>,
	/// Extra form parameters. They never overwrite parameters set by the grant itself.
	pub extra_parameters: BTreeMap<String, String>,
}

/// Kind of token named in a revocation request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenTypeHint {
	/// `access_token`.
	#[default]
	#[serde(rename = "access_token")]
	AccessToken,
	/// `refresh_token`.
	#[serde(rename = "refresh_token")]
	RefreshToken,
	/// `id_token`.
	#[serde(rename = "id_token")]
	IdentityToken,
}
impl TokenTypeHint {
	/// Returns the wire value used in `token_type_hint`.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenTypeHint::AccessToken => "access_token",
			TokenTypeHint::RefreshToken => "refresh_token",
			TokenTypeHint::IdentityToken => "id_token",
		}
	}
}
impl Display for TokenTypeHint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Closed set of token operations understood by the token service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenRequest {
	/// Client Credentials grant; cached per provider, client, and scope.
	ClientCredentials {
		/// Scope override and extras.
		options: TokenRequestOptions,
	},
	/// Password grant; cached per provider, client, username, and scope.
	Password {
		/// Resource owner username, compared byte for byte in cache keys.
		username: String,
		/// Resource owner password.
		password: Secret,
		/// Scope override and extras.
		options: TokenRequestOptions,
	},
	/// Refresh grant.
	Refresh {
		/// Refresh token to redeem.
		refresh_token: Secret,
		/// Scope override and extras.
		options: TokenRequestOptions,
	},
	/// Token revocation (RFC 7009).
	Revoke {
		/// Token to revoke.
		token: Secret,
		/// Kind of `token`.
		hint: TokenTypeHint,
		/// Extras; the scope override is ignored.
		options: TokenRequestOptions,
	},
}
impl TokenRequest {
	/// Client Credentials request with default options.
	pub fn client_credentials() -> Self {
		Self::ClientCredentials { options: TokenRequestOptions::default() }
	}

	/// Password request with default options.
	pub fn password(username: impl Into<String>, password: impl Into<Secret>) -> Self {
		Self::Password {
			username: username.into(),
			password: password.into(),
			options: TokenRequestOptions::default(),
		}
	}

	/// Refresh request with default options.
	pub fn refresh(refresh_token: impl Into<Secret>) -> Self {
		let options = TokenRequestOptions::default();

		Self::Refresh { refresh_token: refresh_token.into(), options }
	}

	/// Revocation request for `token`.
	pub fn revoke(token: impl Into<Secret>, hint: TokenTypeHint) -> Self {
		Self::Revoke { token: token.into(), hint, options: TokenRequestOptions::default() }
	}

	/// Overrides the provider scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.options_mut().scope = Some(scope.into());

		self
	}

	/// Adds an extra form parameter.
	pub fn with_extra_parameter(
		mut self,
		name: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		self.options_mut().extra_parameters.insert(name.into(), value.into());

		self
	}

	/// Shared options of the request.
	pub fn options(&self) -> &TokenRequestOptions {
		match self {
			Self::ClientCredentials { options }
			| Self::Password { options, .. }
			| Self::Refresh { options, .. }
			| Self::Revoke { options, .. } => options,
		}
	}

	/// Stable label suitable for logs and error messages.
	pub const fn label(&self) -> &'static str {
		match self {
			Self::ClientCredentials { .. } => "client_credentials",
			Self::Password { .. } => "password",
			Self::Refresh { .. } => REFRESH_TOKEN_GRANT,
			Self::Revoke { .. } => "revoke",
		}
	}

	/// Grant a provider must be configured for to serve this request, if any.
	pub const fn required_grant(&self) -> Option<GrantType> {
		match self {
			Self::ClientCredentials { .. } => Some(GrantType::ClientCredentials),
			Self::Password { .. } => Some(GrantType::Password),
			Self::Refresh { .. } | Self::Revoke { .. } => None,
		}
	}

	/// Scope sent to the provider: the override unless it is blank, the provider scope
	/// otherwise.
	pub fn effective_scope<'a>(&'a self, config: &'a TokenProviderConfig) -> Option<&'a str> {
		if let Self::Revoke { .. } = self {
			return None;
		}

		self.options()
			.scope
			.as_deref()
			.filter(|scope| !scope.trim().is_empty())
			.or(config.scope.as_deref())
	}

	/// Key under which the response is cached.
	///
	/// Cacheable grants use `provider-client[-username]-scope` with spaces in the scope folded
	/// to `-`; refresh and revocation requests are keyed by the token itself.
	pub fn cache_key(&self, provider: &ProviderName, config: &TokenProviderConfig) -> String {
		let scope = || self.effective_scope(config).unwrap_or_default().replace(' ', "-");

		match self {
			Self::ClientCredentials { .. } =>
				format!("{provider}-{}-{}", config.client_id, scope()),
			Self::Password { username, .. } =>
				format!("{provider}-{}-{username}-{}", config.client_id, scope()),
			Self::Refresh { refresh_token, .. } => refresh_token.expose().to_owned(),
			Self::Revoke { token, .. } => token.expose().to_owned(),
		}
	}

	/// Grant-specific form parameters.
	pub fn grant_parameters(&self) -> BTreeMap<String, String> {
		let mut params = BTreeMap::new();

		match self {
			Self::ClientCredentials { .. } => {
				params.insert("grant_type".into(), GrantType::ClientCredentials.as_str().into());
			},
			Self::Password { username, password, .. } => {
				params.insert("grant_type".into(), GrantType::Password.as_str().into());
				params.insert("username".into(), username.clone());
				params.insert("password".into(), password.expose().into());
			},
			Self::Refresh { refresh_token, .. } => {
				params.insert("grant_type".into(), REFRESH_TOKEN_GRANT.into());
				params.insert("refresh_token".into(), refresh_token.expose().into());
			},
			Self::Revoke { token, hint, .. } => {
				params.insert("token".into(), token.expose().into());
				params.insert("token_type_hint".into(), hint.as_str().into());
			},
		}

		params
	}

	/// Rejects cacheable requests whose grant differs from the provider's configured grant.
	pub fn ensure_grant(
		&self,
		provider: &ProviderName,
		config: &TokenProviderConfig,
	) -> Result<(), ConfigError> {
		match self.required_grant() {
			Some(grant) if grant != config.grant_type => Err(ConfigError::GrantMismatch {
				provider: provider.to_string(),
				configured: config.grant_type.as_str(),
				requested: grant.as_str(),
			}),
			_ => Ok(()),
		}
	}

	/// Synthetic refresh inheriting the scope and extras of `options`.
	pub(crate) fn refresh_from(refresh_token: Secret, options: &TokenRequestOptions) -> Self {
		Self::Refresh { refresh_token, options: options.clone() }
	}

	fn options_mut(&mut self) -> &mut TokenRequestOptions {
		match self {
			Self::ClientCredentials { options }
			| Self::Password { options, .. }
			| Self::Refresh { options, .. }
			| Self::Revoke { options, .. } => options,
		}
	}
}
