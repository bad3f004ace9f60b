//! API key authentication sent as a header or query parameter.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthenticationHandler, AuthenticationProvider, HeaderAuthenticationHandler, ProvideFuture,
		QueryAuthenticationHandler, QueryParameters, Secret,
	},
	headers::RestHttpHeaders,
};

/// Where an API key travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyPlacement {
	/// Request header named after the key.
	#[default]
	Header,
	/// Query parameter named after the key.
	Query,
}

/// API key sent as a header or query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeyAuthentication {
	/// Header or parameter name.
	pub key: String,
	/// Key value.
	pub value: Secret,
	/// Where the key is attached.
	pub placement: ApiKeyPlacement,
}
impl ApiKeyAuthentication {
	/// API key sent as header `key`.
	pub fn header(key: impl Into<String>, value: impl Into<Secret>) -> Self {
		Self { key: key.into(), value: value.into(), placement: ApiKeyPlacement::Header }
	}

	/// API key sent as query parameter `key`.
	pub fn query(key: impl Into<String>, value: impl Into<Secret>) -> Self {
		Self { key: key.into(), value: value.into(), placement: ApiKeyPlacement::Query }
	}

	/// Handler matching [`placement`](Self::placement).
	pub fn into_handler(self) -> Arc<dyn AuthenticationHandler> {
		match self.placement {
			ApiKeyPlacement::Header => Arc::new(HeaderAuthenticationHandler::new(self)),
			ApiKeyPlacement::Query => Arc::new(QueryAuthenticationHandler::new(self)),
		}
	}
}
impl AuthenticationProvider<RestHttpHeaders> for ApiKeyAuthentication {
	fn provide<'a>(&'a self, _cancel: &'a CancellationToken) -> ProvideFuture<'a, RestHttpHeaders> {
		let headers = RestHttpHeaders::new().with(self.key.as_str(), self.value.expose());

		Box::pin(std::future::ready(Ok(headers)))
	}
}
impl AuthenticationProvider<QueryParameters> for ApiKeyAuthentication {
	fn provide<'a>(&'a self, _cancel: &'a CancellationToken) -> ProvideFuture<'a, QueryParameters> {
		let parameters = vec![(self.key.clone(), self.value.expose().to_owned())];

		Box::pin(std::future::ready(Ok(parameters)))
	}
}
