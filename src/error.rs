//! Client-level error types shared across the request pipeline, token service, and builder.

// self
use crate::{
	_prelude::*,
	provider::{ProviderNameError, TokenProviderConfigError},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Body could not be serialized or deserialized.
	#[error(transparent)]
	Content(#[from] ContentError),
	/// Transport failure (DNS, TCP, TLS, body limits).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered a token request backing an authentication handler with an error.
	#[error("Token request for provider `{provider}` failed: {error}.")]
	TokenRequest {
		/// Provider name the token was requested from.
		provider: String,
		/// OAuth error code reported by the provider (or synthesized locally).
		error: String,
		/// Optional human readable description.
		description: Option<String>,
	},
	/// Caller cancelled the operation before a network side effect took place.
	#[error("Operation was cancelled.")]
	Cancelled,
}

/// Configuration and validation failures surfaced at build time or before dispatch.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// No transport was configured and no default transport is compiled in.
	#[error("No HTTP transport is configured.")]
	MissingTransport,
	/// Header name or value cannot be sent over the wire.
	#[error("Header `{name}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},

	/// A relative URL was supplied but the client has no base address.
	#[error("A base address is required to resolve the relative URL `{url}`.")]
	MissingBaseAddress {
		/// Relative URL supplied by the caller.
		url: String,
	},
	/// URL cannot be parsed or joined onto the base address.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL supplied by the caller.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Timeout must be strictly positive.
	#[error("Timeout must be greater than zero.")]
	InvalidTimeout,
	/// Response buffer limit must be strictly positive.
	#[error("Maximum response content buffer size must be greater than zero.")]
	InvalidBufferSize,

	/// Builder ended up with zero or several authentication handlers.
	#[error("Exactly one authentication handler must be configured, found {count}.")]
	AuthenticationHandlerCount {
		/// Number of registered handlers.
		count: usize,
	},
	/// No serializer is registered for the media type.
	#[error("No content serializer is registered for `{media_type}`.")]
	NoSerializer {
		/// Requested media type.
		media_type: String,
	},
	/// Several serializers claim the same media type.
	#[error("{count} content serializers are registered for `{media_type}`.")]
	AmbiguousSerializer {
		/// Requested media type.
		media_type: String,
		/// Number of matching serializers.
		count: usize,
	},
	/// Media type was empty.
	#[error("Content media type must not be empty.")]
	MissingMediaType,

	/// Provider name is not registered with the token service.
	#[error("Token provider `{provider}` is not configured.")]
	UnknownProvider {
		/// Provider name supplied by the caller.
		provider: String,
	},
	/// Provider name was registered more than once.
	#[error("Token provider `{provider}` is configured more than once.")]
	DuplicateProvider {
		/// Duplicated provider name.
		provider: String,
	},
	/// Provider name failed validation.
	#[error(transparent)]
	InvalidProviderName(#[from] ProviderNameError),
	/// Provider configuration failed validation.
	#[error(transparent)]
	ProviderConfig(#[from] TokenProviderConfigError),
	/// Request grant does not match the grant configured for the provider.
	#[error("Provider `{provider}` is configured for the {configured} grant, not {requested}.")]
	GrantMismatch {
		/// Provider name.
		provider: String,
		/// Grant configured for the provider.
		configured: &'static str,
		/// Grant implied by the request.
		requested: &'static str,
	},
	/// Custom validator rejected the builder state.
	#[error("Client validation failed: {reason}.")]
	Validation {
		/// Validator-supplied reason string.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Creates a [`ConfigError::Validation`] from any displayable reason.
	pub fn validation(reason: impl Display) -> Self {
		Self::Validation { reason: reason.to_string() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Serialization failures raised by content serializers.
#[derive(Debug, ThisError)]
pub enum ContentError {
	/// Value could not be encoded for the media type.
	#[error("Failed to serialize `{media_type}` content.")]
	Serialize {
		/// Media type of the serializer.
		media_type: String,
		/// Underlying encoder failure.
		#[source]
		source: BoxError,
	},
	/// Body could not be decoded for the media type.
	#[error("Failed to deserialize `{media_type}` content.")]
	Deserialize {
		/// Media type of the serializer.
		media_type: String,
		/// Underlying decoder failure.
		#[source]
		source: BoxError,
	},
	/// Decoded body does not match the requested type.
	#[error("Content does not match the requested type.")]
	Mapping(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Non-empty response body without a `Content-Type` header.
	#[error("Response with status {status} carries a body without a content type.")]
	MissingContentType {
		/// HTTP status code of the response.
		status: u16,
	},
}
impl ContentError {
	/// Wraps an encoder failure.
	pub fn serialize(
		media_type: impl Into<String>,
		src: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::Serialize { media_type: media_type.into(), source: Box::new(src) }
	}

	/// Wraps a decoder failure.
	pub fn deserialize(
		media_type: impl Into<String>,
		src: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::Deserialize { media_type: media_type.into(), source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO, limits).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
	/// Response body exceeded the configured buffer limit.
	#[error("Response body of {actual} bytes exceeds the {limit} byte limit.")]
	BodyTooLarge {
		/// Configured limit in bytes.
		limit: usize,
		/// Body size in bytes, or the bytes received when reading stopped.
		actual: usize,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
