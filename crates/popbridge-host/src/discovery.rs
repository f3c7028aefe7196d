// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Locating a popup bridge.
//
// An injected accessor wins if one was supplied. Otherwise we wait, with no
// timeout, until the native host publishes its bridge on the well-known
// binding, and wrap it in a `BridgeAdapter`.

use std::future::pending;
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;
use tracing::{debug, info};

use popbridge_core::error::Result;

use crate::adapter::BridgeAdapter;
use crate::traits::{AwaitPopupBridge, HostBridge, PopupBridge};

/// Publish/await cell where a native host announces its bridge.
///
/// Clones share the same cell.
#[derive(Clone)]
pub struct HostBinding {
    slot: Arc<watch::Sender<Option<Arc<dyn HostBridge>>>>,
}

impl HostBinding {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// The process-wide well-known binding native hosts publish to.
    pub fn global() -> &'static HostBinding {
        static GLOBAL: OnceLock<HostBinding> = OnceLock::new();
        GLOBAL.get_or_init(HostBinding::new)
    }

    /// Make `host` available. Replaces any previously published bridge.
    pub fn publish(&self, host: Arc<dyn HostBridge>) {
        info!("host bridge published");
        self.slot.send_replace(Some(host));
    }

    /// The currently published bridge, if any.
    pub fn current(&self) -> Option<Arc<dyn HostBridge>> {
        self.slot.borrow().clone()
    }

    /// Wait until a bridge is published. Never resolves if none ever is.
    pub async fn wait(&self) -> Arc<dyn HostBridge> {
        let mut rx = self.slot.subscribe();
        let published = match rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };

        match published {
            Some(host) => host,
            // The sender lives as long as `self`, so the channel cannot
            // close while we are waiting on it.
            None => pending().await,
        }
    }
}

impl Default for HostBinding {
    fn default() -> Self {
        Self::new()
    }
}

/// Where to look for a popup bridge.
#[derive(Clone)]
pub struct Discovery {
    injected: Option<Arc<dyn AwaitPopupBridge>>,
    binding: HostBinding,
}

impl Discovery {
    /// Discover through `binding` only.
    pub fn new(binding: HostBinding) -> Self {
        Self {
            injected: None,
            binding,
        }
    }

    /// Discover through the process-wide binding.
    pub fn global() -> Self {
        Self::new(HostBinding::global().clone())
    }

    /// Prefer `accessor` over the host binding.
    pub fn with_injected(mut self, accessor: Arc<dyn AwaitPopupBridge>) -> Self {
        self.injected = Some(accessor);
        self
    }

    pub fn binding(&self) -> &HostBinding {
        &self.binding
    }

    /// Resolve a popup bridge, suspending until one is available.
    pub async fn await_bridge(&self) -> Result<Arc<dyn PopupBridge>> {
        if let Some(accessor) = &self.injected {
            debug!("delegating bridge discovery to injected accessor");
            return accessor.await_popup_bridge().await;
        }

        let host = self.binding.wait().await;
        debug!("wrapping published host bridge");
        Ok(Arc::new(BridgeAdapter::new(host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use popbridge_core::types::QueryPayload;

    use crate::loopback::{Completion, LoopbackHost};

    struct FixedPayloadBridge;

    impl PopupBridge for FixedPayloadBridge {
        fn open(&self, _url: &str) -> BoxFuture<'static, Result<QueryPayload>> {
            async { Ok([("opType", "payment")].into_iter().collect()) }.boxed()
        }
    }

    struct Injected;

    impl AwaitPopupBridge for Injected {
        fn await_popup_bridge(&self) -> BoxFuture<'static, Result<Arc<dyn PopupBridge>>> {
            async { Ok(Arc::new(FixedPayloadBridge) as Arc<dyn PopupBridge>) }.boxed()
        }
    }

    #[tokio::test]
    async fn injected_accessor_bypasses_binding() {
        // Nothing is ever published here; the injected accessor must win.
        let discovery = Discovery::new(HostBinding::new()).with_injected(Arc::new(Injected));
        let bridge = tokio::time::timeout(Duration::from_secs(1), discovery.await_bridge())
            .await
            .expect("injected discovery should not wait")
            .unwrap();

        let payload = bridge.open("https://a.test/").await.unwrap();
        assert_eq!(payload.get("opType"), Some("payment"));
    }

    #[tokio::test]
    async fn waits_for_late_publication() {
        let binding = HostBinding::new();
        let discovery = Discovery::new(binding.clone());
        let waiting = tokio::spawn(async move { discovery.await_bridge().await });

        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        let host = Arc::new(LoopbackHost::replying("app://return", |_| {
            Completion::payload([("opType", "cancel")].into_iter().collect())
        }));
        binding.publish(host.clone());

        let bridge = waiting.await.unwrap().unwrap();
        let payload = bridge.open("https://a.test/").await.unwrap();
        assert_eq!(payload.get("opType"), Some("cancel"));
        assert_eq!(
            host.opened_urls(),
            vec!["https://a.test/?redirect_uri=app%3A%2F%2Freturn".to_string()]
        );
    }

    #[tokio::test]
    async fn already_published_resolves_immediately() {
        let binding = HostBinding::new();
        binding.publish(Arc::new(LoopbackHost::new("app://return")));
        assert!(binding.current().is_some());

        let discovery = Discovery::new(binding);
        tokio::time::timeout(Duration::from_secs(1), discovery.await_bridge())
            .await
            .expect("published bridge should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn never_published_keeps_waiting() {
        let discovery = Discovery::new(HostBinding::new());
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), discovery.await_bridge()).await;
        assert!(outcome.is_err());
    }
}
