// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, content::ContentSerializer, error::ContentError};

/// `text/plain` pass-through codec.
///
/// Strings are written verbatim; any other value is written as its JSON rendering. Bodies are
/// always decoded into a JSON string.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextSerializer;
impl PlainTextSerializer {
	/// Media type handled by the serializer.
	pub const MEDIA_TYPE: &'static str = "text/plain";
}
impl ContentSerializer for PlainTextSerializer {
	fn media_type(&self) -> &str {
		Self::MEDIA_TYPE
	}

	fn serialize(&self, value: &Value) -> Result<Vec<u8>, ContentError> {
		match value {
			Value::String(text) => Ok(text.as_bytes().to_vec()),
			Value::Null => Ok(Vec::new()),
			other => Ok(other.to_string().into_bytes()),
		}
	}

	fn deserialize(&self, body: &[u8]) -> Result<Value, ContentError> {
		let text = String::from_utf8(body.to_vec())
			.map_err(|e| ContentError::deserialize(Self::MEDIA_TYPE, e))?;

		Ok(Value::String(text))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn strings_pass_through_unquoted() {
		let body = PlainTextSerializer
			.serialize(&Value::String("hello".into()))
			.expect("Text should serialize.");

		assert_eq!(body, b"hello");

		let number =
			PlainTextSerializer.serialize(&Value::from(42)).expect("Number should serialize.");

		assert_eq!(number, b"42");
		assert!(PlainTextSerializer.deserialize(&[0xff, 0xfe]).is_err());
	}
}
