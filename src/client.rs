//! The REST request pipeline.
//!
//! Every verb helper funnels into [`RestClient::send`], which shares its pipeline with
//! [`RestClient::send_untyped`]: resolve the URL against the base address, merge default
//! headers, let the authentication handler mutate the request, serialize the body, dispatch
//! through the transport, and materialize a [`RestResponse`]. Only the typed path decodes
//! successful bodies.

mod options;
mod request;
mod response;

pub use options::*;
pub use request::*;
pub use response::*;

// crates.io
use http::{Method, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::AuthenticationHandler,
	error::{ConfigError, ContentError},
	flows::TokenService,
	headers::{self, RestHttpHeaders},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	token::{TokenRequest, TokenResponse},
	transport::{HttpResponse, HttpTransport, ResponseBodyLimit},
};

/// Immutable REST client produced by [`RestClientBuilder`](crate::builder::RestClientBuilder).
///
/// Cloning is cheap; clones share the options, authentication handler, transport, and token
/// service.
#[derive(Clone)]
pub struct RestClient {
	options: Arc<RestClientOptions>,
	authentication: Arc<dyn AuthenticationHandler>,
	transport: Arc<dyn HttpTransport>,
	token_service: Arc<TokenService>,
}
impl RestClient {
	pub(crate) fn new(
		options: RestClientOptions,
		authentication: Arc<dyn AuthenticationHandler>,
		transport: Arc<dyn HttpTransport>,
		token_service: Arc<TokenService>,
	) -> Self {
		Self { options: Arc::new(options), authentication, transport, token_service }
	}

	/// Options the client was built with.
	pub fn options(&self) -> &RestClientOptions {
		&self.options
	}

	/// Token service holding the providers registered on the builder.
	pub fn token_service(&self) -> &Arc<TokenService> {
		&self.token_service
	}

	/// Requests a token from one of the configured providers.
	pub async fn request_token(
		&self,
		provider: &str,
		request: &TokenRequest,
		cancel: &CancellationToken,
	) -> Result<TokenResponse> {
		self.token_service.request_token(provider, request, cancel).await
	}

	/// Sends a `GET` request.
	pub async fn get<Res>(
		&self,
		url: &str,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse<Res>>
	where
		Res: DeserializeOwned,
	{
		self.send::<Res, ()>(Method::GET, url, None, headers, cancel).await
	}

	/// Sends a `POST` request with `content` as body.
	pub async fn post<Res, Req>(
		&self,
		url: &str,
		content: RestRequestContent<Req>,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse<Res>>
	where
		Res: DeserializeOwned,
		Req: Serialize,
	{
		self.send(Method::POST, url, Some(content), headers, cancel).await
	}

	/// Sends a `PUT` request with `content` as body.
	pub async fn put<Res, Req>(
		&self,
		url: &str,
		content: RestRequestContent<Req>,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse<Res>>
	where
		Res: DeserializeOwned,
		Req: Serialize,
	{
		self.send(Method::PUT, url, Some(content), headers, cancel).await
	}

	/// Sends a `DELETE` request.
	pub async fn delete<Res>(
		&self,
		url: &str,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse<Res>>
	where
		Res: DeserializeOwned,
	{
		self.send::<Res, ()>(Method::DELETE, url, None, headers, cancel).await
	}

	/// Sends a request with an arbitrary method and decodes a successful body into `Res`.
	///
	/// Non-success statuses are returned as data with [`RestResponse::problem_details`]
	/// populated when the server sent them; transport failures, unparseable success bodies, and
	/// configuration problems are errors.
	pub async fn send<Res, Req>(
		&self,
		method: Method,
		url: &str,
		content: Option<RestRequestContent<Req>>,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse<Res>>
	where
		Res: DeserializeOwned,
		Req: Serialize,
	{
		observe("send", async move {
			let response = self.execute(method, url, content, headers, cancel).await?;
			let mut materialized = self.materialize::<Res>(&response);
			let status = response.status();

			if status.is_success() && !response.body().is_empty() {
				let media_type = materialized
					.content_headers
					.get(CONTENT_TYPE.as_str())
					.ok_or(ContentError::MissingContentType { status: status.as_u16() })?;

				materialized.content =
					Some(self.options.serializers.deserialize(media_type, response.body())?);
			}

			Ok(materialized)
		})
		.await
	}

	/// Sends a request without decoding a successful body.
	///
	/// Status, headers, and problem details are materialized as in [`send`](Self::send); the
	/// success body is never inspected, so any media type is accepted.
	pub async fn send_untyped<Req>(
		&self,
		method: Method,
		url: &str,
		content: Option<RestRequestContent<Req>>,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<RestResponse>
	where
		Req: Serialize,
	{
		observe("send_untyped", async move {
			let response = self.execute(method, url, content, headers, cancel).await?;

			Ok(self.materialize(&response))
		})
		.await
	}

	/// Resolves `url` against the base address; absolute URLs pass through untouched.
	pub fn resolve_url(&self, url: &str) -> Result<Url, ConfigError> {
		match Url::parse(url) {
			Ok(absolute) => Ok(absolute),
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let base = self
					.options
					.base_address()
					.ok_or_else(|| ConfigError::MissingBaseAddress { url: url.to_owned() })?;

				base.join(url.trim_start_matches('/'))
					.map_err(|source| ConfigError::InvalidUrl { url: url.to_owned(), source })
			},
			Err(source) => Err(ConfigError::InvalidUrl { url: url.to_owned(), source }),
		}
	}

	async fn execute<Req>(
		&self,
		method: Method,
		url: &str,
		content: Option<RestRequestContent<Req>>,
		headers: Option<RestHttpHeaders>,
		cancel: &CancellationToken,
	) -> Result<HttpResponse>
	where
		Req: Serialize,
	{
		let url = self.resolve_url(url)?;
		let mut headers = headers.unwrap_or_default();

		headers.merge_defaults(&self.options.default_headers);

		let mut request = RestRequest::new(method, url, headers);

		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		self.authentication.authenticate(&mut request, cancel).await?;

		if let Some(content) = content {
			let bytes = self.options.serializers.serialize(&content.media_type, &content.content)?;

			request.body = Some(RequestBody { media_type: content.media_type, bytes });
		}

		self.dispatch(request, cancel).await
	}

	async fn dispatch(
		&self,
		request: RestRequest,
		cancel: &CancellationToken,
	) -> Result<HttpResponse> {
		let limit = ResponseBodyLimit(self.options.max_response_content_buffer_size);
		let mut request = request.into_http()?;

		limit.attach(&mut request);

		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let response = self.transport.send(request).await?;

		limit.check(response.body().len())?;

		Ok(response)
	}

	// Problem details are best effort: a failed response whose body cannot be decoded simply
	// carries none.
	fn materialize<Res>(&self, response: &HttpResponse) -> RestResponse<Res> {
		let status = response.status();
		let (headers, content_headers) = split_headers(response.headers());
		let problem_details = match content_headers.get(CONTENT_TYPE.as_str()) {
			Some(media_type) if !status.is_success() && !response.body().is_empty() =>
				self.options.serializers.deserialize(media_type, response.body()).ok(),
			_ => None,
		};

		RestResponse {
			status,
			reason_phrase: status.canonical_reason().unwrap_or_default().to_owned(),
			version: response.version(),
			headers,
			content_headers,
			content: None,
			problem_details,
		}
	}
}
impl Debug for RestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("options", &self.options)
			.field("token_service", &self.token_service)
			.finish()
	}
}

async fn observe<Res, Fut>(stage: &'static str, operation: Fut) -> Result<RestResponse<Res>>
where
	Fut: Future<Output = Result<RestResponse<Res>>>,
{
	const KIND: OperationKind = OperationKind::Request;

	obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

	let result = OperationSpan::new(KIND, stage).instrument(operation).await;

	match &result {
		Ok(response) if response.is_success() =>
			obs::record_operation_outcome(KIND, OperationOutcome::Success),
		_ => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
	}

	result
}

fn split_headers(map: &http::HeaderMap) -> (RestHttpHeaders, RestHttpHeaders) {
	let mut general = RestHttpHeaders::new();
	let mut content = RestHttpHeaders::new();

	for (name, value) in map {
		let target =
			if headers::is_content_header(name.as_str()) { &mut content } else { &mut general };

		target.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
	}

	(general, content)
}
