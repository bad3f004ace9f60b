//! Ordered, case-insensitive header multimap used by requests, defaults, and responses.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue};
// self
use crate::{_prelude::*, error::ConfigError};

/// Standard `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";

const REDACTED_HEADERS: [&str; 2] = ["authorization", "proxy-authorization"];

/// Ordered multimap from header name (case-insensitive) to one or more values.
///
/// Insertion order of names is preserved so the headers reach the wire in the order callers
/// declared them. Names compare with ASCII case folding, while the spelling of the first
/// insertion is kept for output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RestHttpHeaders(Vec<(String, Vec<String>)>);
impl RestHttpHeaders {
	/// Creates an empty header set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style variant of [`RestHttpHeaders::add`].
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.add(name, value);

		self
	}

	/// Appends a value, creating the header when absent.
	pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
		let name = name.into();
		let value = value.into();

		match self.position(&name) {
			Some(idx) => self.0[idx].1.push(value),
			None => self.0.push((name, vec![value])),
		}

		self
	}

	/// Removes every value stored under `name` and stores `value` instead.
	pub fn replace(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
		let name = name.into();

		self.remove(&name);
		self.add(name, value)
	}

	/// Removes the header, returning its values.
	pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
		let idx = self.position(name)?;

		Some(self.0.remove(idx).1)
	}

	/// Returns the first value stored under `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.get_all(name).first().map(String::as_str)
	}

	/// Returns all values stored under `name`.
	pub fn get_all(&self, name: &str) -> &[String] {
		match self.position(name) {
			Some(idx) => &self.0[idx].1,
			None => &[],
		}
	}

	/// Checks whether the header is present.
	pub fn contains(&self, name: &str) -> bool {
		self.position(name).is_some()
	}

	/// Number of distinct header names.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no header is stored.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(name, values)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
	}

	/// Copies every header from `defaults` whose name is not already present.
	///
	/// Headers already stored in `self` always win, so request-specific values override client
	/// defaults of the same name while new names stay additive.
	pub fn merge_defaults(&mut self, defaults: &RestHttpHeaders) {
		for (name, values) in defaults.iter() {
			if !self.contains(name) {
				self.0.push((name.to_owned(), values.to_vec()));
			}
		}
	}

	/// Converts into an [`http::HeaderMap`], validating names and values.
	pub fn to_header_map(&self) -> Result<HeaderMap, ConfigError> {
		let mut map = HeaderMap::with_capacity(self.len());

		for (name, values) in self.iter() {
			let header = HeaderName::from_bytes(name.as_bytes())
				.map_err(|_| ConfigError::InvalidHeader { name: name.to_owned() })?;

			for value in values {
				let value = HeaderValue::from_str(value)
					.map_err(|_| ConfigError::InvalidHeader { name: name.to_owned() })?;

				map.append(header.clone(), value);
			}
		}

		Ok(map)
	}

	/// Builds a header set from an [`http::HeaderMap`], decoding values lossily.
	pub fn from_header_map(map: &HeaderMap) -> Self {
		let mut headers = Self::new();

		for (name, value) in map {
			headers.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
		}

		headers
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.0.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
	}
}
impl<K, V> FromIterator<(K, V)> for RestHttpHeaders
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut headers = Self::new();

		for (name, value) in iter {
			headers.add(name, value);
		}

		headers
	}
}
impl Debug for RestHttpHeaders {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut map = f.debug_map();

		for (name, values) in self.iter() {
			if REDACTED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
				map.entry(&name, &"<redacted>");
			} else {
				map.entry(&name, &values);
			}
		}

		map.finish()
	}
}

/// Returns `true` for headers that describe the body rather than the message.
pub fn is_content_header(name: &str) -> bool {
	const ENTITY_HEADERS: [&str; 3] = ["allow", "expires", "last-modified"];

	name.get(..8).is_some_and(|prefix| prefix.eq_ignore_ascii_case("content-"))
		|| ENTITY_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_are_case_insensitive_and_ordered() {
		let mut headers = RestHttpHeaders::new();

		headers.add("X-Trace", "a").add("accept", "application/json").add("x-trace", "b");

		assert_eq!(headers.len(), 2);
		assert_eq!(headers.get_all("X-TRACE"), ["a".to_owned(), "b".to_owned()]);
		assert_eq!(headers.iter().map(|(name, _)| name).collect::<Vec<_>>(), ["X-Trace", "accept"]);

		headers.replace("X-TRACE", "c");

		assert_eq!(headers.get_all("x-trace"), ["c".to_owned()]);
		assert_eq!(headers.remove("ACCEPT"), Some(vec!["application/json".to_owned()]));
		assert!(!headers.contains("accept"));
	}

	#[test]
	fn request_headers_override_defaults() {
		let defaults = RestHttpHeaders::new()
			.with("Accept", "application/json")
			.with("User-Agent", "rest-api-client");
		let mut request = RestHttpHeaders::new()
			.with("accept", "application/xml")
			.with("X-Request-Id", "42");

		request.merge_defaults(&defaults);

		assert_eq!(request.get_all("Accept"), ["application/xml".to_owned()]);
		assert_eq!(request.get("X-Request-Id"), Some("42"));
		assert_eq!(request.get("user-agent"), Some("rest-api-client"));
		assert_eq!(request.len(), 3);
	}

	#[test]
	fn header_map_conversion_validates() {
		let headers = RestHttpHeaders::new().with("Set-Cookie", "a=1").with("Set-Cookie", "b=2");
		let map = headers.to_header_map().expect("Valid headers should convert.");

		assert_eq!(map.get_all("set-cookie").iter().count(), 2);
		assert_eq!(RestHttpHeaders::from_header_map(&map).get_all("set-cookie").len(), 2);
		assert!(RestHttpHeaders::new().with("bad header", "x").to_header_map().is_err());
		assert!(RestHttpHeaders::new().with("X-Bad", "line\nbreak").to_header_map().is_err());
	}

	#[test]
	fn debug_redacts_credentials() {
		let headers = RestHttpHeaders::new().with(AUTHORIZATION, "Bearer secret");
		let rendered = format!("{headers:?}");

		assert!(!rendered.contains("secret"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn content_headers_are_detected() {
		assert!(is_content_header("Content-Type"));
		assert!(is_content_header("content-length"));
		assert!(is_content_header("Expires"));
		assert!(!is_content_header("Cache-Control"));
		assert!(!is_content_header("Server"));
	}
}
