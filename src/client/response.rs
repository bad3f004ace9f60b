// crates.io
use http::{StatusCode, Version};
use serde_json::Value;
// self
use crate::{_prelude::*, headers::RestHttpHeaders};

/// Materialized response.
///
/// `RestResponse` without a type argument is the untyped form returned by
/// [`RestClient::send_untyped`](crate::client::RestClient::send_untyped); its
/// [`content`](Self::content) is always `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct RestResponse<T = ()> {
	/// Status code.
	pub status: StatusCode,
	/// Canonical reason phrase; empty for unknown codes.
	pub reason_phrase: String,
	/// Protocol version.
	pub version: Version,
	/// Message headers.
	pub headers: RestHttpHeaders,
	/// Headers describing the body (`Content-*`, `Expires`, `Last-Modified`, `Allow`).
	pub content_headers: RestHttpHeaders,
	/// Deserialized body; only populated for successful responses with a body.
	pub content: Option<T>,
	/// Problem details; only populated for unsuccessful responses that carry them.
	pub problem_details: Option<ProblemDetails>,
}
impl<T> RestResponse<T> {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

/// RFC 7807 problem details, including the `errors` map used by validation failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetails {
	/// URI reference identifying the problem type.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Short summary.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Status code repeated by the server.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
	/// Occurrence-specific explanation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	/// URI reference identifying the occurrence.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instance: Option<String>,
	/// Validation errors keyed by field.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub errors: BTreeMap<String, Vec<String>>,
	/// Members not covered above.
	#[serde(flatten)]
	pub extensions: BTreeMap<String, Value>,
}
