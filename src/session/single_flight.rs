//! Single-flight execution
//!
//! Collapses concurrent calls into one in-flight future whose output every
//! caller receives. Used for credential refresh and for the who-am-I check.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};

type Flight<T> = (u64, Shared<BoxFuture<'static, T>>);

pub struct SingleFlight<T: Clone> {
    slot: Mutex<Option<Flight<T>>>,
    next_id: AtomicU64,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Join the in-flight call, or start one with `start`.
    ///
    /// `start` runs synchronously, and only for the caller that opens a new
    /// flight. The slot is cleared once the flight completes, so a later call
    /// starts fresh.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (id, flight) = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some((id, flight)) => (*id, flight.clone()),
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let flight = start().boxed().shared();
                    *slot = Some((id, flight.clone()));
                    (id, flight)
                }
            }
        };

        let output = flight.await;

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(slot.as_ref(), Some((current, _)) if *current == id) {
            *slot = None;
        }
        output
    }

    /// Whether a call is currently in flight
    pub fn in_flight(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
