// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render proxy: puts the bridged flow in front of a checkout SDK's render
// entry points.
//
// Discovery starts at install time and runs in the background. Until a bridge
// is found, every call goes straight to the wrapped renderer. Once one is
// found, each call tries the bridged flow first and falls back to the wrapped
// renderer, with the same arguments, if that attempt fails for any reason.

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use popbridge_core::error::{PopBridgeError, Result};
use popbridge_core::report::ErrorReporter;
use popbridge_core::types::WindowRef;
use popbridge_host::discovery::Discovery;
use popbridge_host::traits::PopupBridge;

use crate::flow::{BridgeAttempt, FlowContext, render_through_bridge};
use crate::props::CheckoutProps;

/// Event tag reported whenever a bridged attempt falls back.
pub const POPUP_BRIDGE_ERROR_EVENT: &str = "popup_bridge_error";

pub type RenderFuture<'a> = BoxFuture<'a, Result<Value>>;

/// The three render entry points of a checkout SDK.
pub trait CheckoutRenderer: Send + Sync {
    fn render(&self, props: CheckoutProps) -> RenderFuture<'_>;

    fn render_to(&self, window: WindowRef, props: CheckoutProps) -> RenderFuture<'_>;

    fn render_popup_to(&self, window: WindowRef, props: CheckoutProps) -> RenderFuture<'_>;
}

/// Install-time result cell holding the discovered bridge, if any.
///
/// Written at most once. Clones share the same cell.
#[derive(Clone, Default)]
pub struct BridgeCell {
    inner: Arc<OnceLock<Arc<dyn PopupBridge>>>,
}

impl BridgeCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell that already holds `bridge`.
    pub fn ready(bridge: Arc<dyn PopupBridge>) -> Self {
        let cell = Self::new();
        cell.set(bridge);
        cell
    }

    /// Store `bridge`. Returns `false` if a bridge was already stored.
    pub fn set(&self, bridge: Arc<dyn PopupBridge>) -> bool {
        self.inner.set(bridge).is_ok()
    }

    pub fn get(&self) -> Option<Arc<dyn PopupBridge>> {
        self.inner.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// A [`CheckoutRenderer`] that routes through the popup bridge when one is
/// available.
pub struct PopupBridgeProxy<R> {
    inner: R,
    cell: BridgeCell,
    ctx: FlowContext,
    reporter: Arc<dyn ErrorReporter>,
    discovery: Option<JoinHandle<()>>,
}

impl<R: CheckoutRenderer> PopupBridgeProxy<R> {
    /// Wrap `checkout` and start looking for a bridge in the background.
    ///
    /// Must be called from within a Tokio runtime. Installation does not
    /// wait for discovery.
    pub fn install(
        checkout: R,
        discovery: Discovery,
        ctx: FlowContext,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let cell = BridgeCell::new();
        let slot = cell.clone();

        let handle = tokio::spawn(async move {
            match discovery.await_bridge().await {
                Ok(bridge) => {
                    slot.set(bridge);
                    info!("popup bridge available, render calls will route through it");
                }
                Err(e) => warn!(error = %e, "popup bridge discovery failed"),
            }
        });

        Self {
            inner: checkout,
            cell,
            ctx,
            reporter,
            discovery: Some(handle),
        }
    }

    /// Wrap `checkout` using a caller-managed cell; no discovery is started.
    pub fn with_cell(
        checkout: R,
        cell: BridgeCell,
        ctx: FlowContext,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            inner: checkout,
            cell,
            ctx,
            reporter,
            discovery: None,
        }
    }

    /// The wrapped renderer.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cell(&self) -> &BridgeCell {
        &self.cell
    }

    async fn do_render<'a, F>(&'a self, props: CheckoutProps, original: F) -> Result<Value>
    where
        F: FnOnce(CheckoutProps) -> RenderFuture<'a> + Send + 'a,
    {
        let Some(bridge) = self.cell.get() else {
            debug!("no popup bridge yet, using original render");
            return original(props).await;
        };

        let attempt_id = Uuid::new_v4();
        debug!(attempt = %attempt_id, "rendering through popup bridge");

        match render_through_bridge(&props, bridge.as_ref(), &self.ctx).await {
            BridgeAttempt::Completed(value) => Ok(value),
            BridgeAttempt::Fallback(err) => {
                warn!(attempt = %attempt_id, kind = %err.kind(), error = %err, "popup bridge render failed, falling back");
                self.report(attempt_id, &err);
                original(props).await
            }
        }
    }

    fn report(&self, attempt_id: Uuid, err: &PopBridgeError) {
        self.reporter.error(
            POPUP_BRIDGE_ERROR_EVENT,
            json!({
                "err": err.to_string(),
                "kind": err.kind(),
                "attempt": attempt_id.to_string(),
                "at": Utc::now().to_rfc3339(),
            }),
        );
    }
}

impl<R: CheckoutRenderer> CheckoutRenderer for PopupBridgeProxy<R> {
    fn render(&self, props: CheckoutProps) -> RenderFuture<'_> {
        self.do_render(props, move |props| self.inner.render(props))
            .boxed()
    }

    fn render_to(&self, window: WindowRef, props: CheckoutProps) -> RenderFuture<'_> {
        self.do_render(props, move |props| self.inner.render_to(window, props))
            .boxed()
    }

    fn render_popup_to(&self, window: WindowRef, props: CheckoutProps) -> RenderFuture<'_> {
        self.do_render(props, move |props| self.inner.render_popup_to(window, props))
            .boxed()
    }
}

impl<R> Drop for PopupBridgeProxy<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.discovery.take() {
            handle.abort();
        }
    }
}
