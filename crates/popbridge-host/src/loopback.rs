// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process host bridge for desktop/CI builds where no native web view is
// available.
//
// Opened URLs are recorded instead of presented. The pending completion
// handler is fired either by a scripted reply inside `open`, or later by
// calling `complete`.

use std::sync::Mutex;

use tracing::{debug, warn};

use popbridge_core::types::QueryPayload;

use crate::traits::{CompletionHandler, HostBridge};

/// Arguments a host passes to its completion handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub error: Option<String>,
    pub payload: Option<QueryPayload>,
}

impl Completion {
    pub fn payload(payload: QueryPayload) -> Self {
        Self {
            error: None,
            payload: Some(payload),
        }
    }

    pub fn error(message: impl Into<String>, payload: Option<QueryPayload>) -> Self {
        Self {
            error: Some(message.into()),
            payload,
        }
    }

    /// Completion with neither an error nor a payload.
    pub fn empty() -> Self {
        Self::default()
    }
}

type Reply = Box<dyn Fn(&str) -> Completion + Send + Sync>;

/// Host bridge that never leaves the process.
pub struct LoopbackHost {
    return_prefix: String,
    handler: Mutex<Option<CompletionHandler>>,
    opened: Mutex<Vec<String>>,
    reply: Option<Reply>,
}

impl LoopbackHost {
    /// A host whose handler stays pending until [`complete`](Self::complete).
    pub fn new(return_prefix: impl Into<String>) -> Self {
        Self {
            return_prefix: return_prefix.into(),
            handler: Mutex::new(None),
            opened: Mutex::new(Vec::new()),
            reply: None,
        }
    }

    /// A host that completes every `open` immediately with `reply(url)`.
    pub fn replying<F>(return_prefix: impl Into<String>, reply: F) -> Self
    where
        F: Fn(&str) -> Completion + Send + Sync + 'static,
    {
        Self {
            reply: Some(Box::new(reply)),
            ..Self::new(return_prefix)
        }
    }

    /// Every URL passed to `open`, oldest first.
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether a completion handler is waiting to be fired.
    pub fn has_pending(&self) -> bool {
        self.handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Fire the pending completion handler. Returns `false` if none was set.
    pub fn complete(&self, error: Option<String>, payload: Option<QueryPayload>) -> bool {
        // Take the handler before calling it so the lock is not held while
        // the handler runs.
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match handler {
            Some(handler) => {
                debug!(has_error = error.is_some(), has_payload = payload.is_some(), "loopback completion");
                handler(error, payload);
                true
            }
            None => {
                warn!("loopback completion fired with no handler registered");
                false
            }
        }
    }
}

impl HostBridge for LoopbackHost {
    fn open(&self, url: &str) {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_owned());

        if let Some(reply) = &self.reply {
            let Completion { error, payload } = reply(url);
            self.complete(error, payload);
        }
    }

    fn return_url_prefix(&self) -> String {
        self.return_prefix.clone()
    }

    fn set_on_complete(&self, handler: CompletionHandler) {
        *self
            .handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn records_urls_and_fires_handler_once() {
        let host = LoopbackHost::new("app://return");
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        host.set_on_complete(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        host.open("https://a.test/");
        assert!(host.has_pending());
        assert!(host.complete(None, None));
        assert!(!host.complete(None, None));

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(host.opened_urls(), vec!["https://a.test/".to_string()]);
        assert_eq!(host.return_url_prefix(), "app://return");
    }

    #[test]
    fn replying_host_completes_inside_open() {
        let host = LoopbackHost::replying("app://return", |url| {
            Completion::error(format!("refused {url}"), None)
        });
        let seen = Arc::new(Mutex::new(None));
        let slot = seen.clone();
        host.set_on_complete(Box::new(move |err, _| {
            *slot.lock().unwrap() = err;
        }));

        host.open("https://a.test/");
        assert!(!host.has_pending());
        assert_eq!(
            seen.lock().unwrap().as_deref(),
            Some("refused https://a.test/")
        );
    }
}
