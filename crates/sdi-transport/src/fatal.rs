//! Single-shot fatal fault notification.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::TransportError;

type Callback = Box<dyn FnOnce(TransportError) + Send + 'static>;

/// Delivers at most one fatal error to the session owner.
///
/// The connect attempt and the connection task share one handler, so
/// however many faults race each other only the first is reported. The
/// callback runs on whichever network thread detected the fault; it should
/// hand the error off rather than touch simulation state directly.
#[derive(Clone)]
pub struct FatalHandler {
    callback: Arc<Mutex<Option<Callback>>>,
}

impl FatalHandler {
    pub fn new(on_fatal: impl FnOnce(TransportError) + Send + 'static) -> Self {
        Self {
            callback: Arc::new(Mutex::new(Some(Box::new(on_fatal)))),
        }
    }

    /// Reports a fault. Returns `true` if this call delivered it, `false` if
    /// an earlier fault already had.
    pub fn fire(&self, error: TransportError) -> bool {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match callback {
            Some(callback) => {
                callback(error);
                true
            }
            None => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl fmt::Debug for FatalHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FatalHandler")
            .field("fired", &self.has_fired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_fires_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(String::new()));

        let handler = {
            let calls = Arc::clone(&calls);
            let seen = Arc::clone(&seen);
            FatalHandler::new(move |err: TransportError| {
                calls.fetch_add(1, Ordering::SeqCst);
                *seen.lock().unwrap() = err.to_string();
            })
        };

        assert!(!handler.has_fired());
        assert!(handler.fire(TransportError::ConnectionClosed));
        assert!(!handler.fire(TransportError::Unresolved("second".into())));
        assert!(!handler.clone().fire(TransportError::Unresolved("third".into())));

        assert!(handler.has_fired());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), "connection closed by server");
    }

    #[test]
    fn test_racing_threads_deliver_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = {
            let calls = Arc::clone(&calls);
            FatalHandler::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        let threads: Vec<_> = (0..8)
            .map(|i| {
                let handler = handler.clone();
                std::thread::spawn(move || handler.fire(TransportError::Unresolved(format!("host{i}"))))
            })
            .collect();
        let delivered = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|fired| *fired)
            .count();

        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
