//! Session State Store
//!
//! Single source of truth for login status and identity. Cheap to clone: every
//! clone is a handle onto the same state. Observers are called synchronously,
//! in mutation order, after each write. No lock is held while they run, so an
//! observer may write to the store; that write is delivered once the current
//! delivery round finishes.
//!
//! Each write bumps an epoch. A session check takes a [`CheckTicket`] when it
//! starts and its result is only committed if nothing else has written since,
//! so a slow check can never resurrect a session that was logged out meanwhile.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::shared::error::SessionError;
use crate::shared::user::{Session, SessionStatus, User};

/// Callback invoked with the new session after every write
pub type Observer = Arc<dyn Fn(&Session) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Proof that a session check started at a given epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTicket {
    epoch: u64,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    session: RwLock<Session>,
    epoch: AtomicU64,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
    // Serializes writes; held only while a write is applied and queued
    write_lock: Mutex<()>,
    // Sessions waiting for delivery, in epoch order
    pending: Mutex<VecDeque<Session>>,
    // Set while some caller drains `pending`
    delivering: AtomicBool,
}

// Clears the delivery flag even if an observer panics
struct DeliveryRound<'a>(&'a AtomicBool);

impl Drop for DeliveryRound<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .field("epoch", &self.epoch())
            .finish()
    }
}

impl SessionStore {
    /// A fresh store in the `Unknown` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Session {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }

    pub fn is_admin(&self) -> bool {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_admin()
    }

    /// Number of writes so far
    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::SeqCst)
    }

    /// Overwrite the session and notify observers
    pub fn set_session(&self, session: Session) {
        self.write(session, None);
    }

    /// Overwrite from a status and optional user, rejecting inconsistent pairs
    pub fn set(&self, status: SessionStatus, user: Option<User>) -> Result<(), SessionError> {
        let session = Session::new(status, user)?;
        self.set_session(session);
        Ok(())
    }

    /// Drop to `Unauthenticated` after logout or a failed refresh
    pub fn invalidate(&self) {
        self.set_session(Session::Unauthenticated);
    }

    /// Drop to `Unauthenticated` unless something wrote to the store after
    /// `epoch`. Returns whether the write happened.
    pub fn invalidate_if_unchanged(&self, epoch: u64) -> bool {
        self.write(Session::Unauthenticated, Some(CheckTicket { epoch }))
            .is_some()
    }

    /// Enter `Unknown` for a session check and return its ticket
    pub fn begin_check(&self) -> CheckTicket {
        let epoch = {
            let _write = self.lock_writes();
            self.apply(Session::Unknown)
        };
        self.deliver();
        CheckTicket { epoch }
    }

    /// Commit the result of a check unless the store was written meanwhile.
    ///
    /// Returns whether the result was applied.
    pub fn complete_check(&self, ticket: CheckTicket, session: Session) -> bool {
        self.write(session, Some(ticket)).is_some()
    }

    /// Register an observer; it is not called for the current state
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&Session) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // The one mutation path
    fn write(&self, session: Session, ticket: Option<CheckTicket>) -> Option<u64> {
        let epoch = {
            let _write = self.lock_writes();
            if let Some(ticket) = ticket {
                let current = self.epoch();
                if current != ticket.epoch {
                    tracing::debug!(
                        ticket = ticket.epoch,
                        current,
                        "discarding stale session write"
                    );
                    return None;
                }
            }
            self.apply(session)
        };
        self.deliver();
        Some(epoch)
    }

    // Caller holds the write lock
    fn apply(&self, session: Session) -> u64 {
        {
            let mut current = self
                .inner
                .session
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if current.status() != session.status() {
                tracing::info!(
                    from = ?current.status(),
                    to = ?session.status(),
                    "session status changed"
                );
            }
            *current = session.clone();
        }
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(session);
        self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_pending(&self) -> Option<Session> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn has_pending(&self) -> bool {
        !self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    // Only one caller drains the queue at a time. A write made while a round
    // is running (from an observer or another thread) is left for that round.
    fn deliver(&self) {
        loop {
            if self.inner.delivering.swap(true, Ordering::AcqRel) {
                return;
            }
            {
                let _round = DeliveryRound(&self.inner.delivering);
                while let Some(session) = self.next_pending() {
                    let observers: Vec<Observer> = self
                        .inner
                        .observers
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .iter()
                        .map(|(_, observer)| observer.clone())
                        .collect();
                    for observer in observers {
                        observer(&session);
                    }
                }
            }
            // A write may have been queued after the last pop but before the
            // flag was cleared
            if !self.has_pending() {
                return;
            }
        }
    }
}
