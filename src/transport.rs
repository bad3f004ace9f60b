//! Transport seam between the client pipeline and an HTTP stack.
//!
//! [`HttpTransport`] is the client's only dependency on a network implementation. It receives
//! fully materialized [`http::Request`] values and returns buffered [`http::Response`] values;
//! connection pooling, TLS, retries, and redirects are the implementation's business. The
//! crate ships [`ReqwestTransport`] behind the default `reqwest` feature, and tests substitute
//! in-process fakes.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Buffered request handed to a transport.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Buffered response returned by a transport.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Response body limit attached to a request's extensions.
///
/// Transports that honor it stop reading once the body grows past the limit and fail with
/// [`TransportError::BodyTooLarge`]; callers still check the buffered length afterwards, so a
/// transport that ignores it only costs memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseBodyLimit(pub usize);
impl ResponseBodyLimit {
	/// Limit carried by `request`, if any.
	pub fn of(request: &HttpRequest) -> Option<usize> {
		request.extensions().get::<Self>().map(|limit| limit.0)
	}

	/// Attaches the limit to `request`, replacing any previous one.
	pub fn attach(self, request: &mut HttpRequest) {
		request.extensions_mut().insert(self);
	}

	/// Fails when `actual` bytes exceed the limit.
	pub fn check(self, actual: usize) -> Result<(), TransportError> {
		if actual > self.0 {
			Err(TransportError::BodyTooLarge { limit: self.0, actual })
		} else {
			Ok(())
		}
	}
}

/// Future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Capability that performs a single HTTP exchange.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the REST
/// pipeline and the token service across arbitrarily many concurrent callers.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the response body, honoring a [`ResponseBodyLimit`] when
	/// the request carries one.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests time out after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let timeout =
			std::time::Duration::try_from(timeout).map_err(|_| ConfigError::InvalidTimeout)?;
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();
		let limit = ResponseBodyLimit::of(&request).map(ResponseBodyLimit);

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let version = response.version();
			let headers = response.headers().to_owned();
			let body = read_body(response, limit).await?;
			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.version_mut() = version;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

// `Content-Length` is checked up front; chunked bodies are counted as they arrive.
#[cfg(feature = "reqwest")]
async fn read_body(
	mut response: reqwest::Response,
	limit: Option<ResponseBodyLimit>,
) -> Result<Vec<u8>, TransportError> {
	let Some(limit) = limit else {
		return Ok(response.bytes().await?.to_vec());
	};

	if let Some(length) = response.content_length() {
		limit.check(usize::try_from(length).unwrap_or(usize::MAX))?;
	}

	let mut body = Vec::new();

	while let Some(chunk) = response.chunk().await? {
		limit.check(body.len().saturating_add(chunk.len()))?;
		body.extend_from_slice(&chunk);
	}

	Ok(body)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn body_limit_travels_in_extensions() {
		let mut request = HttpRequest::new(Vec::new());

		assert_eq!(ResponseBodyLimit::of(&request), None);

		ResponseBodyLimit(16).attach(&mut request);

		assert_eq!(ResponseBodyLimit::of(&request), Some(16));
		assert!(ResponseBodyLimit(16).check(16).is_ok());
		assert!(matches!(
			ResponseBodyLimit(16).check(17),
			Err(TransportError::BodyTooLarge { limit: 16, actual: 17 })
		));
	}
}
