// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fire-and-forget error reporting used when a bridged render falls back.

use std::sync::Mutex;

use serde_json::Value;

/// Sink for structured error events.
///
/// Implementations must not block or fail: reporting happens on the fallback
/// path and must never stand between the caller and the original render.
pub trait ErrorReporter: Send + Sync {
    fn error(&self, event: &str, payload: Value);
}

/// Default reporter: emits the event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn error(&self, event: &str, payload: Value) {
        tracing::error!(event, payload = %payload, "checkout event");
    }
}

/// A reported event, as captured by [`MemoryReporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedEvent {
    pub event: String,
    pub payload: Value,
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportedEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, oldest first.
    pub fn events(&self) -> Vec<ReportedEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorReporter for MemoryReporter {
    fn error(&self, event: &str, payload: Value) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ReportedEvent {
                event: event.to_owned(),
                payload,
            });
    }
}
