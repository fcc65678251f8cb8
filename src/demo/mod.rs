use std::sync::{Arc, Mutex};

use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cache::KeyValueStore;

pub mod fixtures;

pub use fixtures::{fixture_movers, fixture_quote, fixture_trending};

const DEMO_STATE_KEY: &str = "demo_mode";

/// Statuses that trip demo mode on a single occurrence.
fn is_quota_status(status: Option<u16>) -> bool {
    matches!(status, Some(429) | Some(403))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    pub active: bool,
    pub consecutive_failures: u32,
    pub date_stamp: String,
}

impl DemoState {
    fn fresh(today: &str) -> Self {
        Self {
            active: false,
            consecutive_failures: 0,
            date_stamp: today.to_string(),
        }
    }

    /// The date stamp pins the state to a calendar day: yesterday's quota
    /// exhaustion does not carry over, so a stale stamp resets everything.
    fn normalized(self, today: &str) -> Self {
        if self.date_stamp == today {
            self
        } else {
            Self::fresh(today)
        }
    }
}

fn today_stamp() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Process-wide live/demo switch, persisted across restarts within the
/// same calendar day.
///
/// Trips on any 429/403, or on three consecutive failures of any other
/// kind. Only an explicit `exit_demo` (or the daily rollover) goes back
/// to live; a successful call while active does not, to avoid flapping
/// against a still-rate-limited upstream.
pub struct DemoMode {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<DemoState>,
    failure_threshold: u32,
}

impl DemoMode {
    pub fn new(store: Arc<dyn KeyValueStore>, failure_threshold: u32) -> Self {
        let today = today_stamp();
        let state = match store.get(DEMO_STATE_KEY) {
            Some(raw) => match serde_json::from_str::<DemoState>(&raw) {
                Ok(state) => state.normalized(&today),
                Err(err) => {
                    warn!("discarding undecodable demo state: {}", err);
                    DemoState::fresh(&today)
                }
            },
            None => DemoState::fresh(&today),
        };

        Self {
            store,
            state: Mutex::new(state),
            failure_threshold,
        }
    }

    /// Lock, apply the daily rollover, run the mutation, persist.
    fn with_state<R>(&self, apply: impl FnOnce(&mut DemoState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        *state = state.clone().normalized(&today_stamp());
        let result = apply(&mut state);
        self.persist(&state);
        result
    }

    fn persist(&self, state: &DemoState) {
        match serde_json::to_string(state) {
            Ok(raw) => self.store.put(DEMO_STATE_KEY, &raw),
            Err(err) => warn!("failed to serialize demo state: {}", err),
        }
    }

    pub fn is_active(&self) -> bool {
        self.with_state(|state| state.active)
    }

    pub fn state(&self) -> DemoState {
        self.with_state(|state| state.clone())
    }

    pub fn record_success(&self) {
        self.with_state(|state| {
            state.consecutive_failures = 0;
        });
    }

    pub fn record_failure(&self, status: Option<u16>) {
        self.with_state(|state| {
            state.consecutive_failures += 1;
            if is_quota_status(status) || state.consecutive_failures >= self.failure_threshold {
                if !state.active {
                    info!(
                        "entering demo mode (status {:?}, {} consecutive failures)",
                        status, state.consecutive_failures
                    );
                }
                state.active = true;
            }
        });
    }

    pub fn exit_demo(&self) {
        self.with_state(|state| {
            state.active = false;
            state.consecutive_failures = 0;
        });
    }
}
