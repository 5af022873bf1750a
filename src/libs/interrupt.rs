// Polling-based interrupt handling.
//
// The signal handler only records the signal number. The pipeline polls it
// between stages and between download chunks and turns it into
// `InstallerError::Interrupted`, which unwinds through `?` so the staging
// directory is dropped (and removed) like on any other error.
//
// Handlers are one-shot: the first SIGINT/SIGTERM is recorded and the
// default action is restored, so a second one terminates the process even
// while a network call is blocked.

use crate::libs::errors::{InstallerError, Result};
use std::sync::atomic::{AtomicI32, Ordering};

static RECEIVED_SIGNAL: AtomicI32 = AtomicI32::new(0);

/// Installs the SIGINT/SIGTERM handlers. No-op on non-Unix hosts.
#[cfg(unix)]
pub fn install_handlers() -> anyhow::Result<()> {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    extern "C" fn handler(sig: i32) {
        RECEIVED_SIGNAL.store(sig, Ordering::SeqCst);
    }

    let action = SigAction::new(
        SigHandler::Handler(handler),
        SaFlags::SA_RESETHAND,
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only performs an atomic store.
        unsafe { signal::sigaction(sig, &action) }
            .map_err(|e| anyhow::anyhow!("failed to register {sig:?} handler: {e}"))?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install_handlers() -> anyhow::Result<()> {
    Ok(())
}

/// A view on where a received signal is recorded.
///
/// `process()` reads the flag the signal handlers write; tests use
/// `detached()` flags so they never observe each other.
#[derive(Debug, Clone, Copy)]
pub struct Interrupt {
    received: &'static AtomicI32,
}

impl Interrupt {
    pub fn process() -> Self {
        Self {
            received: &RECEIVED_SIGNAL,
        }
    }

    /// Fails with `Interrupted` once a signal has been received.
    pub fn check(&self) -> Result<()> {
        match self.received.load(Ordering::SeqCst) {
            0 => Ok(()),
            sig => Err(InstallerError::Interrupted(sig)),
        }
    }

    /// A stage failure observed after a signal is reported as the interruption.
    ///
    /// A blocked read that gives up (timeout, EINTR) because the user pressed
    /// Ctrl-C must exit with 130, not as a download or resolution error.
    pub fn or_interrupted(&self, error: InstallerError) -> InstallerError {
        match self.check() {
            Err(interrupted) => interrupted,
            Ok(()) => error,
        }
    }

    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            received: Box::leak(Box::new(AtomicI32::new(0))),
        }
    }

    #[cfg(test)]
    pub(crate) fn trip(&self, sig: i32) {
        self.received.store(sig, Ordering::SeqCst);
    }
}
