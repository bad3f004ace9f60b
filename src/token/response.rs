// crates.io
use http::StatusCode;
use serde::Deserializer;
// self
use crate::{_prelude::*, auth::Secret, error::TransportError};

/// Clock-skew allowance subtracted from `expires_in`.
pub const EXPIRY_TOLERANCE: Duration = Duration::seconds(60);
/// Error code recorded when the token endpoint could not be reached.
pub const TRANSPORT_ERROR: &str = "transport_error";
/// Error code recorded when a successful response body is not a token response.
pub const INVALID_RESPONSE: &str = "invalid_response";
/// Error code recorded for non-success statuses that carry no OAuth error.
pub const HTTP_ERROR: &str = "http_error";

const INVALID_TOKEN_ERRORS: [&str; 3] = ["invalid_grant", "expired_token", "access_denied"];

/// Failure captured while exchanging a token.
#[derive(Debug, ThisError)]
pub enum TokenFailure {
	/// The request never produced an HTTP response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The token endpoint answered with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Outcome of a token exchange.
///
/// Exchanges never fail with an error past the token service: transport failures, malformed
/// bodies, and provider errors all land here, so callers branch on
/// [`has_error`](TokenResponse::has_error) instead.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<Secret>,
	/// Issued OpenID Connect identity token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<Secret>,
	/// Token type, usually `Bearer`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Issued refresh token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<Secret>,
	/// OAuth error code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Human readable error description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
	/// Link to error documentation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_uri: Option<String>,
	/// Lifetime in seconds as reported by the provider.
	#[serde(default, deserialize_with = "deserialize_expires_in")]
	pub expires_in: i64,
	/// Local instant the response was received.
	#[serde(skip, default = "OffsetDateTime::now_utc")]
	pub created_at: OffsetDateTime,
	/// Raw response body, when one was received.
	#[serde(skip)]
	pub raw_response: Option<String>,
	/// HTTP status of the response, when one was received.
	#[serde(skip)]
	pub http_status: Option<u16>,
	/// Transport or parse failure behind an error response.
	#[serde(skip)]
	pub failure: Option<Arc<TokenFailure>>,
}
impl TokenResponse {
	/// Successful response carrying `access_token`, created now.
	pub fn new(access_token: impl Into<Secret>, expires_in: i64) -> Self {
		Self {
			access_token: Some(access_token.into()),
			token_type: Some("Bearer".into()),
			expires_in,
			..Self::blank(OffsetDateTime::now_utc())
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<Secret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Overrides the creation instant.
	pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
		self.created_at = created_at;

		self
	}

	/// Instant after which the access token is treated as expired.
	pub fn access_token_expiry(&self) -> OffsetDateTime {
		self.created_at
			.saturating_add(Duration::seconds(self.expires_in))
			.saturating_sub(EXPIRY_TOLERANCE)
	}

	/// Checks expiry against the current clock.
	pub fn has_expired(&self) -> bool {
		self.has_expired_at(OffsetDateTime::now_utc())
	}

	/// Checks expiry against `now`.
	pub fn has_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.access_token_expiry()
	}

	/// Returns `true` when an error code is present.
	pub fn has_error(&self) -> bool {
		self.error.as_deref().is_some_and(|e| !e.is_empty())
	}

	/// Returns `true` when the error means the presented grant or token is no longer usable.
	pub fn has_invalid_token_error(&self) -> bool {
		self.error
			.as_deref()
			.is_some_and(|e| INVALID_TOKEN_ERRORS.iter().any(|known| known.eq_ignore_ascii_case(e)))
	}

	/// Returns `true` when a non-empty access token is present.
	pub fn has_access_token(&self) -> bool {
		self.access_token.as_ref().is_some_and(|t| !t.is_empty())
	}

	/// Captured transport or parse failure.
	pub fn failure(&self) -> Option<&TokenFailure> {
		self.failure.as_deref()
	}

	/// Materializes an HTTP response from the token or revocation endpoint.
	pub(crate) fn from_http(status: StatusCode, body: &[u8], now: OffsetDateTime) -> Self {
		let mut response = if body.iter().all(u8::is_ascii_whitespace) {
			Self::blank(now)
		} else {
			let mut deserializer = serde_json::Deserializer::from_slice(body);

			match serde_path_to_error::deserialize::<_, TokenResponse>(&mut deserializer) {
				Ok(parsed) => parsed,
				Err(source) => {
					let mut failed = Self::blank(now);

					if status.is_success() {
						failed.error = Some(INVALID_RESPONSE.into());
						failed.error_description = Some(source.to_string());
					}

					failed.failure = Some(Arc::new(TokenFailure::Parse { source }));

					failed
				},
			}
		};

		if !status.is_success() && !response.has_error() {
			response.error = Some(HTTP_ERROR.into());
			response.error_description =
				Some(status.canonical_reason().map_or_else(|| status.to_string(), str::to_owned));
		}
		if !body.is_empty() {
			response.raw_response = Some(String::from_utf8_lossy(body).into_owned());
		}

		response.http_status = Some(status.as_u16());
		response.created_at = now;

		response
	}

	/// Wraps a transport failure.
	pub(crate) fn from_transport_error(err: TransportError, now: OffsetDateTime) -> Self {
		let mut response = Self::blank(now);

		response.error = Some(TRANSPORT_ERROR.into());
		response.error_description = Some(err.to_string());
		response.failure = Some(Arc::new(TokenFailure::Transport(err)));

		response
	}

	fn blank(created_at: OffsetDateTime) -> Self {
		Self {
			access_token: None,
			id_token: None,
			token_type: None,
			refresh_token: None,
			error: None,
			error_description: None,
			error_uri: None,
			expires_in: 0,
			created_at,
			raw_response: None,
			http_status: None,
			failure: None,
		}
	}
}
impl PartialEq for TokenResponse {
	fn eq(&self, other: &Self) -> bool {
		let same_failure = match (&self.failure, &other.failure) {
			(None, None) => true,
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			_ => false,
		};

		same_failure
			&& self.access_token == other.access_token
			&& self.id_token == other.id_token
			&& self.token_type == other.token_type
			&& self.refresh_token == other.refresh_token
			&& self.error == other.error
			&& self.error_description == other.error_description
			&& self.error_uri == other.error_uri
			&& self.expires_in == other.expires_in
			&& self.created_at == other.created_at
			&& self.raw_response == other.raw_response
			&& self.http_status == other.http_status
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &self.access_token)
			.field("id_token", &self.id_token)
			.field("token_type", &self.token_type)
			.field("refresh_token", &self.refresh_token)
			.field("error", &self.error)
			.field("error_description", &self.error_description)
			.field("expires_in", &self.expires_in)
			.field("created_at", &self.created_at)
			.field("raw_response_len", &self.raw_response.as_ref().map(String::len))
			.field("http_status", &self.http_status)
			.field("failure", &self.failure)
			.finish()
	}
}

fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Lifetime {
		Integer(i64),
		Float(f64),
		Text(String),
	}

	match Option::<Lifetime>::deserialize(deserializer)? {
		Some(Lifetime::Integer(secs)) => Ok(secs),
		Some(Lifetime::Float(secs)) => Ok(secs as i64),
		Some(Lifetime::Text(text)) if text.trim().is_empty() => Ok(0),
		Some(Lifetime::Text(text)) => text.trim().parse().map_err(serde::de::Error::custom),
		None => Ok(0),
	}
}
