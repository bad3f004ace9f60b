// crates.io
use http::{Method, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	content::JsonSerializer,
	error::ConfigError,
	headers::RestHttpHeaders,
	transport::HttpRequest,
};

/// Outgoing request as seen by authentication handlers.
///
/// The URL and headers are final by the time a handler runs; the body is attached afterwards.
#[derive(Clone, Debug)]
pub struct RestRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Request headers, defaults already merged in.
	pub headers: RestHttpHeaders,
	/// Serialized body.
	pub body: Option<RequestBody>,
}
impl RestRequest {
	/// Creates a request without body.
	pub fn new(method: Method, url: Url, headers: RestHttpHeaders) -> Self {
		Self { method, url, headers, body: None }
	}

	/// Converts into a transport request; the body's media type becomes `Content-Type`.
	pub fn into_http(self) -> Result<HttpRequest, ConfigError> {
		let mut headers = self.headers.to_header_map()?;
		let body = match self.body {
			Some(body) => {
				let value = http::HeaderValue::from_str(&body.media_type)
					.map_err(|_| ConfigError::InvalidHeader { name: CONTENT_TYPE.to_string() })?;

				headers.insert(CONTENT_TYPE, value);

				body.bytes
			},
			None => Vec::new(),
		};
		let mut request =
			http::Request::builder().method(self.method).uri(self.url.as_str()).body(body)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}

/// Serialized request body with its media type.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestBody {
	/// Media type used to serialize the body.
	pub media_type: String,
	/// Encoded bytes.
	pub bytes: Vec<u8>,
}
impl Debug for RequestBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestBody")
			.field("media_type", &self.media_type)
			.field("bytes", &self.bytes.len())
			.finish()
	}
}

/// Typed payload paired with the media type that selects its serializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestRequestContent<T> {
	/// Payload.
	pub content: T,
	/// Media type, e.g. `application/json`.
	pub media_type: String,
}
impl<T> RestRequestContent<T> {
	/// Pairs `content` with `media_type`.
	pub fn new(content: T, media_type: impl Into<String>) -> Self {
		Self { content, media_type: media_type.into() }
	}

	/// JSON payload.
	pub fn json(content: T) -> Self {
		Self::new(content, JsonSerializer::MEDIA_TYPE)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn body_media_type_wins_over_header() {
		let url = Url::parse("https://api.example.com/orders").expect("URL should parse.");
		let mut request = RestRequest::new(
			Method::POST,
			url,
			RestHttpHeaders::new().with("Content-Type", "text/plain").with("X-Trace", "1"),
		);

		request.body =
			Some(RequestBody { media_type: "application/json".into(), bytes: b"{}".to_vec() });

		let http_request = request.into_http().expect("Request should convert.");

		assert_eq!(http_request.method(), Method::POST);
		assert_eq!(http_request.uri(), "https://api.example.com/orders");
		assert_eq!(http_request.headers().get_all(CONTENT_TYPE).iter().count(), 1);
		assert_eq!(http_request.headers()[CONTENT_TYPE], "application/json");
		assert_eq!(http_request.headers()["x-trace"], "1");
		assert_eq!(http_request.body(), b"{}");
	}
}
