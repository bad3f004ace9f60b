// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, content::ContentSerializer, error::ContentError};

/// JSON serializer; defaults to `application/json`.
#[derive(Clone, Debug)]
pub struct JsonSerializer {
	media_type: String,
}
impl JsonSerializer {
	/// Media type registered by default.
	pub const MEDIA_TYPE: &'static str = "application/json";

	/// Binds the JSON codec to a custom media type such as `application/vnd.api+json`.
	pub fn with_media_type(media_type: impl Into<String>) -> Self {
		Self { media_type: media_type.into() }
	}
}
impl Default for JsonSerializer {
	fn default() -> Self {
		Self::with_media_type(Self::MEDIA_TYPE)
	}
}
impl ContentSerializer for JsonSerializer {
	fn media_type(&self) -> &str {
		&self.media_type
	}

	fn serialize(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
		serde_json::to_vec(value).map_err(|e| ContentError::serialize(&self.media_type, e))
	}

	fn deserialize(&self, body: &[u8]) -> Result<Value, ContentError> {
		serde_json::from_slice(body).map_err(|e| ContentError::deserialize(&self.media_type, e))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn malformed_payload_is_a_deserialize_error() {
		let err = JsonSerializer::default()
			.deserialize(b"{\"open\":")
			.expect_err("Truncated JSON should fail to decode.");

		assert!(matches!(
			err,
			ContentError::Deserialize { ref media_type, .. } if media_type == "application/json"
		));
	}
}
