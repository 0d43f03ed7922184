//! Scoped arming window for termination signals.
//!
//! The driver must notice SIGINT/SIGHUP/SIGTERM that land while a receive
//! is blocked in the kernel, without permanently replacing the process-wide
//! disposition: outside a receive call the application's own handling (or
//! the default) must stay in effect. So the window is armed immediately
//! before the blocking read and disarmed immediately after, on every exit
//! path, and an observed signal is re-raised after disarming so the
//! surrounding disposition still fires.

#[cfg(unix)]
pub(crate) use unix::SignalWindow;

#[cfg(unix)]
mod unix {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::low_level;
    use signal_hook::SigId;
    use tracing::debug;

    const WATCHED: [i32; 3] = [SIGINT, SIGHUP, SIGTERM];

    /// While alive, records the last watched signal delivered to the
    /// process. Dropping it unregisters the actions.
    pub(crate) struct SignalWindow {
        caught: Arc<AtomicUsize>,
        ids: Vec<SigId>,
    }

    impl SignalWindow {
        pub(crate) fn arm() -> io::Result<Self> {
            let caught = Arc::new(AtomicUsize::new(0));
            let mut ids = Vec::with_capacity(WATCHED.len());
            for &sig in &WATCHED {
                let slot = Arc::clone(&caught);
                // SAFETY: the action only performs an atomic store, which is
                // async-signal-safe.
                let id = unsafe {
                    low_level::register(sig, move || slot.store(sig as usize, Ordering::SeqCst))?
                };
                ids.push(id);
            }
            Ok(Self { caught, ids })
        }

        /// Unregister the actions and, if a watched signal was delivered
        /// while armed, re-raise it for the process-wide disposition.
        /// Returns the signal number that was observed, if any.
        pub(crate) fn disarm(mut self) -> Option<i32> {
            self.unregister();
            match self.caught.load(Ordering::SeqCst) {
                0 => None,
                sig => {
                    let sig = sig as i32;
                    debug!(signal = sig, "termination signal observed during receive");
                    let _ = low_level::raise(sig);
                    Some(sig)
                }
            }
        }

        fn unregister(&mut self) {
            for id in self.ids.drain(..) {
                low_level::unregister(id);
            }
        }
    }

    impl Drop for SignalWindow {
        fn drop(&mut self) {
            // Covers early returns and panics between arm and disarm.
            self.unregister();
        }
    }
}

#[cfg(not(unix))]
pub(crate) use fallback::SignalWindow;

#[cfg(not(unix))]
mod fallback {
    use std::io;

    /// Signal interruption is POSIX-only; elsewhere receives are bounded by
    /// the socket timeout alone.
    pub(crate) struct SignalWindow;

    impl SignalWindow {
        pub(crate) fn arm() -> io::Result<Self> {
            Ok(Self)
        }

        pub(crate) fn disarm(self) -> Option<i32> {
            None
        }
    }
}
