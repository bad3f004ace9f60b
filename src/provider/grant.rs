// self
use crate::_prelude::*;

/// Grant a token provider is configured for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Client Credentials grant.
	#[default]
	ClientCredentials,
	/// Resource Owner Password Credentials grant.
	Password,
}
impl GrantType {
	/// Returns the wire value used in `grant_type`.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
			GrantType::Password => "password",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How client credentials reach the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientAuthenticationMethod {
	/// `Authorization: Basic` over form-urlencoded id and secret (RFC 6749 section 2.3.1).
	#[default]
	#[serde(rename = "header_basic_oauth2_spec")]
	HeaderBasicOAuth2Spec,
	/// `Authorization: Basic` over the raw `id:secret` pair.
	#[serde(rename = "header_basic")]
	HeaderBasic,
	/// `client_id`/`client_secret` form body parameters.
	#[serde(rename = "post")]
	Post,
}
