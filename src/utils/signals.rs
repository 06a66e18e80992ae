use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::thread::JoinHandle;

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::utils::errors::{Result, SolnLibError};

// One live registration per process.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Live teardown-signal registration.
///
/// Dropping the handle leaves the dispatch thread running for the rest of
/// the process; call [`TeardownHandle::cancel`] to tear the registration
/// down and allow a new one.
pub struct TeardownHandle {
    close: Option<Box<dyn FnOnce() + Send>>,
    thread: Option<JoinHandle<()>>,
}

impl TeardownHandle {
    /// Stop signal dispatch and release the process-wide registration.
    pub fn cancel(mut self) {
        if let Some(close) = self.close.take() {
            close();
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        REGISTERED.store(false, Ordering::SeqCst);
    }
}

/// Register `callback` for SIGTERM/SIGINT tear-down signals.
///
/// The callback runs on a dedicated dispatch thread with the received
/// signal number. Only one registration may be live at a time; a second
/// call fails until the first handle is cancelled.
pub fn register_teardown_handler<F>(mut callback: F) -> Result<TeardownHandle>
where
    F: FnMut(i32) + Send + 'static,
{
    if REGISTERED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(SolnLibError::InvalidInput(
            "teardown handler already registered".to_string(),
        ));
    }

    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            REGISTERED.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
    };
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            tracing::debug!("Dispatching tear-down signal: {signal}");
            callback(signal);
        }
    });

    Ok(TeardownHandle {
        close: Some(Box::new(move || handle.close())),
        thread: Some(thread),
    })
}
