//! Application state for the time clock API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ClockError, ClockResult};
use crate::store::TimeClockStore;
use crate::terminal::Terminal;

/// Shared application state.
///
/// Holds the terminal served by this process and the store it writes to.
/// The terminal is a single logical actor, so it sits behind one mutex.
#[derive(Clone)]
pub struct AppState {
    terminal: Arc<Mutex<Terminal>>,
    store: Arc<dyn TimeClockStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(terminal: Terminal, store: Arc<dyn TimeClockStore>) -> Self {
        Self {
            terminal: Arc::new(Mutex::new(terminal)),
            store,
        }
    }

    /// Locks the terminal.
    pub fn terminal(&self) -> ClockResult<MutexGuard<'_, Terminal>> {
        self.terminal
            .lock()
            .map_err(|_| ClockError::system("terminal state lock poisoned"))
    }

    /// Returns the store.
    pub fn store(&self) -> &dyn TimeClockStore {
        self.store.as_ref()
    }

    /// Spawns the background task that revalidates the station grant every
    /// `interval`, starting immediately.
    pub fn spawn_revalidation(&self, interval: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                state.revalidate_once();
            }
        })
    }

    fn revalidate_once(&self) {
        match self.terminal() {
            Ok(mut terminal) => {
                let authorized = terminal.revalidate().is_authorized();
                debug!(authorized, "Station authorization revalidated");
            }
            Err(err) => warn!(error = %err, "Station revalidation skipped"),
        }
    }
}
