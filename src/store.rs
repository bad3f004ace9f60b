//! Thread-safe in-memory token cache with reverse lookups by token value.
//!
//! The cache keeps three maps: cache key to response, access token to cache key, and refresh
//! token to cache key. Each map sits behind its own [`RwLock`]; no operation holds two locks at
//! once, so concurrent callers working on different keys never contend on a shared critical
//! section. Same-key races resolve as last writer wins.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	obs::{self, CacheEvent},
	token::TokenResponse,
};

type EntryMap = RwLock<HashMap<String, TokenResponse>>;
type IndexMap = RwLock<HashMap<String, String>>;

/// Token responses cached by request fingerprint.
#[derive(Debug, Default)]
pub struct TokenCache {
	entries: EntryMap,
	access_index: IndexMap,
	refresh_index: IndexMap,
}
impl TokenCache {
	/// Returns the response cached under `key`.
	pub fn get(&self, key: &str) -> Option<TokenResponse> {
		self.entries.read().get(key).cloned()
	}

	/// Stores `response` under `key` and indexes its token values.
	///
	/// Responses without an access token are ignored. Returns whether the entry was stored.
	pub fn insert(&self, key: impl Into<String>, response: TokenResponse) -> bool {
		if !response.has_access_token() {
			return false;
		}

		let key = key.into();
		let access = non_empty(response.access_token.as_ref()).map(str::to_owned);
		let refresh = non_empty(response.refresh_token.as_ref()).map(str::to_owned);
		let previous = self.entries.write().insert(key.clone(), response);

		if let Some(previous) = previous {
			self.unindex(&key, &previous);
		}
		if let Some(token) = access {
			self.access_index.write().insert(token, key.clone());
		}
		if let Some(token) = refresh {
			self.refresh_index.write().insert(token, key.clone());
		}

		obs::trace_cache_event(CacheEvent::Store, &key);
		obs::record_cache_event(CacheEvent::Store);

		true
	}

	/// Removes the entry stored under `key` together with its reverse lookups.
	pub fn remove(&self, key: &str) -> Option<TokenResponse> {
		let removed = self.entries.write().remove(key)?;

		self.unindex(key, &removed);

		obs::trace_cache_event(CacheEvent::Evict, key);
		obs::record_cache_event(CacheEvent::Evict);

		Some(removed)
	}

	/// Cache key indexed for an access token.
	pub fn key_for_access_token(&self, token: &str) -> Option<String> {
		self.access_index.read().get(token).cloned()
	}

	/// Cache key indexed for a refresh token.
	pub fn key_for_refresh_token(&self, token: &str) -> Option<String> {
		self.refresh_index.read().get(token).cloned()
	}

	/// Drops the access-token mapping and its entry, returning the cache key it pointed at.
	pub fn evict_access_token(&self, token: &str) -> Option<String> {
		let key = self.access_index.write().remove(token)?;

		self.remove(&key);

		Some(key)
	}

	/// Drops the refresh-token mapping and its entry, returning the cache key it pointed at.
	pub fn evict_refresh_token(&self, token: &str) -> Option<String> {
		let key = self.refresh_index.write().remove(token)?;

		self.remove(&key);

		Some(key)
	}

	/// Number of cached responses.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns `true` when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Drops every entry and index.
	pub fn clear(&self) {
		self.entries.write().clear();
		self.access_index.write().clear();
		self.refresh_index.write().clear();
	}

	// Index entries are only dropped while they still point at `key`, so a token re-issued
	// under another key keeps its newer mapping.
	fn unindex(&self, key: &str, response: &TokenResponse) {
		if let Some(token) = non_empty(response.access_token.as_ref()) {
			remove_if_points_at(&self.access_index, token, key);
		}
		if let Some(token) = non_empty(response.refresh_token.as_ref()) {
			remove_if_points_at(&self.refresh_index, token, key);
		}
	}
}

fn non_empty(secret: Option<&Secret>) -> Option<&str> {
	secret.map(Secret::expose).filter(|token| !token.is_empty())
}

fn remove_if_points_at(index: &IndexMap, token: &str, key: &str) {
	let mut guard = index.write();

	if guard.get(token).is_some_and(|current| current == key) {
		guard.remove(token);
	}
}
