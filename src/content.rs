//! Media-type keyed content serializers and the registry that dispatches between them.
//!
//! Serializers operate on [`serde_json::Value`] so they stay object safe; the registry converts
//! typed values on the way in and maps decoded values back onto the caller's type with
//! `serde_path_to_error`, keeping the failing field path in [`ContentError::Mapping`].

mod json;
mod plain_text;

pub use json::*;
pub use plain_text::*;

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ContentError},
};

/// Codec bound to a single media type.
pub trait ContentSerializer
where
	Self: Send + Sync,
{
	/// Media type handled by this serializer, e.g. `application/json`.
	fn media_type(&self) -> &str;

	/// Encodes a value into a request body.
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, ContentError>;

	/// Decodes a response body.
	fn deserialize(&self, body: &[u8]) -> Result<Value, ContentError>;
}

/// Ordered registry of content serializers.
///
/// Registering a serializer never replaces an existing one, even when both claim the same
/// media type; such duplicates make resolution fail until [`ContentSerializers::clear`] is
/// used to drop the defaults.
#[derive(Clone, Default)]
pub struct ContentSerializers(Vec<Arc<dyn ContentSerializer>>);
impl ContentSerializers {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the plain-text and JSON serializers.
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();

		registry.register(Arc::new(PlainTextSerializer));
		registry.register(Arc::new(JsonSerializer::default()));

		registry
	}

	/// Appends a serializer.
	pub fn register(&mut self, serializer: Arc<dyn ContentSerializer>) {
		self.0.push(serializer);
	}

	/// Drops every registered serializer.
	pub fn clear(&mut self) {
		self.0.clear();
	}

	/// Number of registered serializers.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Media types of the registered serializers in registration order.
	pub fn media_types(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.media_type())
	}

	/// Finds the unique serializer matching `media_type` (parameters such as `charset` ignored).
	pub fn resolve(&self, media_type: &str) -> Result<&dyn ContentSerializer, ConfigError> {
		let essence = essence(media_type);

		if essence.is_empty() {
			return Err(ConfigError::MissingMediaType);
		}

		let mut matches =
			self.0.iter().filter(|s| essence.eq_ignore_ascii_case(s.media_type().trim()));
		let first = matches.next();
		let extra = matches.count();

		match first {
			Some(serializer) if extra == 0 => Ok(serializer.as_ref()),
			Some(_) => Err(ConfigError::AmbiguousSerializer {
				media_type: essence.to_owned(),
				count: extra + 1,
			}),
			None => Err(ConfigError::NoSerializer { media_type: essence.to_owned() }),
		}
	}

	/// Serializes `value` with the serializer registered for `media_type`.
	pub fn serialize<T>(&self, media_type: &str, value: &T) -> Result<Vec<u8>>
	where
		T: ?Sized + Serialize,
	{
		let serializer = self.resolve(media_type)?;
		let value = serde_json::to_value(value)
			.map_err(|e| ContentError::serialize(serializer.media_type(), e))?;

		Ok(serializer.serialize(&value)?)
	}

	/// Deserializes `body` with the serializer registered for `media_type`.
	///
	/// Structured suffixes such as `application/problem+json` fall back to the serializer for
	/// the base format when no exact registration exists.
	pub fn deserialize<T>(&self, media_type: &str, body: &[u8]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let serializer = match self.resolve(media_type) {
			Ok(serializer) => serializer,
			Err(ConfigError::NoSerializer { media_type: essence }) =>
				match structured_suffix_fallback(&essence) {
					Some(base) => self.resolve(base)?,
					None => return Err(ConfigError::NoSerializer { media_type: essence }.into()),
				},
			Err(e) => return Err(e.into()),
		};
		let value = serializer.deserialize(body)?;

		serde_path_to_error::deserialize(value).map_err(|e| ContentError::from(e).into())
	}
}
impl Debug for ContentSerializers {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.media_types()).finish()
	}
}

/// Strips parameters and surrounding whitespace from a media type.
pub fn essence(media_type: &str) -> &str {
	media_type.split(';').next().unwrap_or_default().trim()
}

fn structured_suffix_fallback(essence: &str) -> Option<&'static str> {
	let (_, suffix) = essence.rsplit_once('+')?;

	if suffix.eq_ignore_ascii_case("json") { Some(JsonSerializer::MEDIA_TYPE) } else { None }
}
