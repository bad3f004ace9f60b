//! Shared helpers for token service operations (per-key singleflight guards).

// self
use crate::_prelude::*;

/// Registry of per-cache-key async mutexes.
///
/// Entries live only while at least one caller holds a [`FlowGuard`] for the key, so keys
/// derived from one-off token values do not accumulate.
#[derive(Debug, Default)]
pub(crate) struct FlowGuards(Mutex<HashMap<String, Arc<AsyncMutex<()>>>>);
impl FlowGuards {
	/// Returns (and creates on demand) the singleflight guard for `key`.
	pub(crate) fn acquire(&self, key: &str) -> FlowGuard<'_> {
		let mut guards = self.0.lock();
		let mutex = guards.entry(key.to_owned()).or_insert_with(Default::default).clone();

		FlowGuard { owner: self, key: key.to_owned(), mutex }
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.0.lock().len()
	}
}

/// Handle on a key's singleflight mutex; releases the registry entry when last dropped.
pub(crate) struct FlowGuard<'a> {
	owner: &'a FlowGuards,
	key: String,
	mutex: Arc<AsyncMutex<()>>,
}
impl FlowGuard<'_> {
	/// Waits for exclusive access to the key.
	pub(crate) async fn lock(&self) -> async_lock::MutexGuard<'_, ()> {
		self.mutex.lock().await
	}
}
impl Drop for FlowGuard<'_> {
	fn drop(&mut self) {
		let mut guards = self.owner.0.lock();

		// One reference in the registry plus ours.
		if Arc::strong_count(&self.mutex) == 2 {
			guards.remove(&self.key);
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn guards_serialize_and_release() {
		let guards = FlowGuards::default();

		{
			let first = guards.acquire("k");
			let second = guards.acquire("k");
			let held = first.lock().await;

			assert!(second.mutex.try_lock().is_none());
			assert_eq!(guards.len(), 1);

			drop(held);

			assert!(second.mutex.try_lock().is_some());
		}

		assert_eq!(guards.len(), 0);
	}
}
