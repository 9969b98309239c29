//! A [`Session`] that can be reached from more than one execution context.
//!
//! On targets where the UART interrupt, a timer and the main loop may all
//! want the session, every access goes through a critical section. Updates
//! are collected inside the critical section and delivered after it ends,
//! so user handlers never run with interrupts masked and may use the
//! session themselves.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use super::session::{Platform, Session};
use crate::network::Serial;
use crate::network::error::Error;

/// A session guarded by a critical-section mutex.
///
/// ```rust,ignore
/// static SESSION: SharedSession<Uart, Board> = SharedSession::new(session);
///
/// #[interrupt]
/// fn UART0() {
///     let _ = SESSION.lock(|session| session.ingest());
/// }
///
/// loop {
///     SESSION.poll().ok();
/// }
/// ```
pub struct SharedSession<S, P> {
    inner: Mutex<RefCell<Session<S, P>>>,
}

impl<S, P> fmt::Debug for SharedSession<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSession").finish_non_exhaustive()
    }
}

impl<S: Serial, P: Platform> SharedSession<S, P> {
    /// Wrap `session`.
    pub const fn new(session: Session<S, P>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    ///
    /// Returns [`Error::Busy`] if called from inside another `lock` on the
    /// same session.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Session<S, P>) -> R) -> Result<R, Error> {
        critical_section::with(|cs| {
            let mut session = self.inner.borrow(cs).try_borrow_mut().map_err(|_| Error::Busy)?;
            Ok(f(&mut *session))
        })
    }

    /// Service the session under the lock, then deliver due updates with
    /// the lock released.
    pub fn poll(&self) -> Result<(), Error> {
        let updates = self.lock(|session| session.service())?;
        updates.deliver();
        Ok(())
    }

    /// Unwrap the session.
    pub fn into_inner(self) -> Session<S, P> {
        self.inner.into_inner().into_inner()
    }
}
