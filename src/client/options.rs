// self
use crate::{
	_prelude::*,
	builder::RestClientValidator,
	content::ContentSerializers,
	error::ConfigError,
	headers::RestHttpHeaders,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(100);
/// Default response buffer limit in bytes.
pub const DEFAULT_MAX_RESPONSE_CONTENT_BUFFER_SIZE: usize = i32::MAX as usize;

/// Immutable settings owned by a [`RestClient`](crate::client::RestClient).
#[derive(Clone)]
pub struct RestClientOptions {
	base_address: Option<Url>,
	/// Headers attached to every request unless the request overrides them.
	pub default_headers: RestHttpHeaders,
	/// Largest response body the client buffers.
	pub max_response_content_buffer_size: usize,
	/// Per-request timeout handed to the default transport.
	pub timeout: Duration,
	/// Serializer registry used for request and response bodies.
	pub serializers: ContentSerializers,
	/// Validators run by the builder before a client is created.
	pub validators: Vec<Arc<dyn RestClientValidator>>,
}
impl RestClientOptions {
	/// Base address every relative URL is resolved against; always ends with `/`.
	pub fn base_address(&self) -> Option<&Url> {
		self.base_address.as_ref()
	}

	/// Sets the base address, appending a trailing `/` to its path when missing.
	pub fn set_base_address(&mut self, base_address: Option<Url>) {
		self.base_address = base_address.map(normalize_base_address);
	}

	/// Checks the numeric limits.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.timeout.is_positive() {
			return Err(ConfigError::InvalidTimeout);
		}
		if self.max_response_content_buffer_size == 0 {
			return Err(ConfigError::InvalidBufferSize);
		}

		Ok(())
	}
}
impl Default for RestClientOptions {
	fn default() -> Self {
		Self {
			base_address: None,
			default_headers: RestHttpHeaders::new(),
			max_response_content_buffer_size: DEFAULT_MAX_RESPONSE_CONTENT_BUFFER_SIZE,
			timeout: DEFAULT_TIMEOUT,
			serializers: ContentSerializers::with_defaults(),
			validators: Vec::new(),
		}
	}
}
impl Debug for RestClientOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClientOptions")
			.field("base_address", &self.base_address.as_ref().map(Url::as_str))
			.field("default_headers", &self.default_headers)
			.field("max_response_content_buffer_size", &self.max_response_content_buffer_size)
			.field("timeout", &self.timeout)
			.field("serializers", &self.serializers)
			.field("validators", &self.validators.len())
			.finish()
	}
}

fn normalize_base_address(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn base_address_gains_trailing_slash() {
		let mut options = RestClientOptions::default();

		options.set_base_address(Some(
			Url::parse("https://api.example.com/v1").expect("URL should parse."),
		));

		assert_eq!(options.base_address().map(Url::as_str), Some("https://api.example.com/v1/"));

		options.set_base_address(Some(
			Url::parse("https://api.example.com").expect("URL should parse."),
		));

		assert_eq!(options.base_address().map(Url::as_str), Some("https://api.example.com/"));
	}

	#[test]
	fn limits_must_be_positive() {
		let mut options = RestClientOptions::default();

		assert!(options.validate().is_ok());

		options.timeout = Duration::ZERO;

		assert!(matches!(options.validate(), Err(ConfigError::InvalidTimeout)));

		options.timeout = DEFAULT_TIMEOUT;
		options.max_response_content_buffer_size = 0;

		assert!(matches!(options.validate(), Err(ConfigError::InvalidBufferSize)));
	}
}
