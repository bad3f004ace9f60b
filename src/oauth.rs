//! Wire-level token exchange: form construction, client authentication, dispatch, and
//! response capture.
//!
//! Every exchange is a form-encoded `POST` with `Accept: application/json`. Client credentials
//! travel either in an `Authorization: Basic` header (RFC 6749 form-urlencoded variant or the
//! legacy raw variant) or as `client_id`/`client_secret` body parameters. Failures past request
//! construction never escape as errors; they are folded into the returned [`TokenResponse`].

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::{
	Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	content::JsonSerializer,
	error::ConfigError,
	provider::{ClientAuthenticationMethod, TokenProviderConfig},
	token::{TokenRequest, TokenResponse},
	transport::{HttpRequest, HttpTransport, ResponseBodyLimit},
};

/// Media type of token request bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

const CLIENT_ID: &str = "client_id";
const CLIENT_SECRET: &str = "client_secret";

/// Builds the form body for `request`.
///
/// Order of precedence: grant parameters, then the scope, then extra parameters that do not
/// collide with anything already set. Client credentials smuggled in through extras are always
/// replaced by the configured client authentication method.
pub fn build_form(
	config: &TokenProviderConfig,
	request: &TokenRequest,
) -> BTreeMap<String, String> {
	let mut form = request.grant_parameters();

	if let Some(scope) = request.effective_scope(config).filter(|scope| !scope.trim().is_empty()) {
		form.insert("scope".into(), scope.into());
	}

	for (name, value) in &request.options().extra_parameters {
		form.entry(name.clone()).or_insert_with(|| value.clone());
	}

	form.remove(CLIENT_ID);
	form.remove(CLIENT_SECRET);

	if config.client_authentication_method == ClientAuthenticationMethod::Post {
		form.insert(CLIENT_ID.into(), config.client_id.clone());

		if let Some(secret) = &config.client_secret {
			form.insert(CLIENT_SECRET.into(), secret.expose().into());
		}
	}

	form
}

/// `Authorization` header value for header-based client authentication methods.
pub fn client_authorization(config: &TokenProviderConfig) -> Option<String> {
	let secret = config.client_secret.as_ref().map(Secret::expose).unwrap_or_default();
	let credentials = match config.client_authentication_method {
		ClientAuthenticationMethod::HeaderBasicOAuth2Spec =>
			format!("{}:{}", form_encode(&config.client_id), form_encode(secret)),
		ClientAuthenticationMethod::HeaderBasic => format!("{}:{secret}", config.client_id),
		ClientAuthenticationMethod::Post => return None,
	};

	Some(format!("Basic {}", STANDARD.encode(credentials)))
}

/// Builds the HTTP request for `request` against the provider's token or revocation endpoint.
pub fn token_http_request(
	config: &TokenProviderConfig,
	request: &TokenRequest,
) -> Result<HttpRequest, ConfigError> {
	let endpoint = match request {
		TokenRequest::Revoke { .. } => config.revocation_endpoint(),
		_ => &config.token_endpoint,
	};
	let body = form_urlencoded::Serializer::new(String::new())
		.extend_pairs(build_form(config, request))
		.finish();
	let mut builder = http::Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, FORM_URLENCODED)
		.header(ACCEPT, JsonSerializer::MEDIA_TYPE);

	if let Some(authorization) = client_authorization(config) {
		builder = builder.header(AUTHORIZATION, authorization);
	}

	Ok(builder.body(body.into_bytes())?)
}

/// Performs a single token or revocation exchange.
///
/// Response bodies larger than `limit` are reported as transport failures. Only request
/// construction failures and cancellation are returned as errors.
pub async fn exchange(
	transport: &dyn HttpTransport,
	config: &TokenProviderConfig,
	request: &TokenRequest,
	limit: ResponseBodyLimit,
	cancel: &CancellationToken,
) -> Result<TokenResponse> {
	let mut http_request = token_http_request(config, request)?;

	limit.attach(&mut http_request);

	if cancel.is_cancelled() {
		return Err(Error::Cancelled);
	}

	let now = OffsetDateTime::now_utc();
	let response = match transport.send(http_request).await {
		Ok(response) => match limit.check(response.body().len()) {
			Ok(()) => TokenResponse::from_http(response.status(), response.body(), now),
			Err(e) => TokenResponse::from_transport_error(e, now),
		},
		Err(e) => TokenResponse::from_transport_error(e, now),
	};

	Ok(response)
}

// Unreserved characters (RFC 3986) stay literal and everything else is escaped, with `+` for
// spaces. `byte_serialize` alone differs only on `*` and `~`.
fn form_encode(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes())
		.collect::<String>()
		.replace('*', "%2A")
		.replace("%7E", "~")
}
