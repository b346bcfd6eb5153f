use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

/// Store container: one source of truth behind a mutex, with a version
/// channel so independent consumers learn about every transition.
///
/// The lock is held only for the duration of one transition closure and
/// never across an await point, which keeps transitions atomic with respect
/// to observation.
pub struct Shared<S> {
    state: Arc<Mutex<S>>,
    version: Arc<watch::Sender<u64>>,
}

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            version: self.version.clone(),
        }
    }
}

impl<S: Default> Default for Shared<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Shared<S> {
    pub fn new(state: S) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(state)),
            version: Arc::new(version),
        }
    }

    /// Reads a snapshot of the state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Applies one transition and publishes the new version to subscribers.
    pub fn write<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut guard);
        drop(guard);
        self.version.send_modify(|version| *version += 1);
        result
    }

    /// Subscribes to transition notifications; the receiver yields a new
    /// version after every `write`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_publishes_a_new_version() {
        let shared = Shared::new(0u32);
        let mut rx = shared.subscribe();
        let before = *rx.borrow_and_update();

        shared.write(|value| *value += 1);

        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update() > before);
        assert_eq!(shared.read(|value| *value), 1);
    }
}
