// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adapter from the host's open/complete callback pair to an awaitable open.
//
// The completion handler forwards the host's `(error, result)` pair through a
// oneshot channel, so the caller can await it like any other future.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use popbridge_core::error::{PopBridgeError, Result};
use popbridge_core::query::extend_url;
use popbridge_core::types::QueryPayload;

use crate::traits::{HostBridge, PopupBridge};

/// Query parameter carrying the host's return-url prefix.
pub const REDIRECT_URI_PARAM: &str = "redirect_uri";

/// Wraps a [`HostBridge`] into a [`PopupBridge`].
#[derive(Clone)]
pub struct BridgeAdapter {
    host: Arc<dyn HostBridge>,
}

impl BridgeAdapter {
    pub fn new(host: Arc<dyn HostBridge>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<dyn HostBridge> {
        &self.host
    }
}

impl PopupBridge for BridgeAdapter {
    fn open(&self, url: &str) -> BoxFuture<'static, Result<QueryPayload>> {
        let prefix = self.host.return_url_prefix();
        let target = match extend_url(url, &[(REDIRECT_URI_PARAM, prefix.as_str())]) {
            Ok(target) => target,
            Err(e) => return futures::future::ready(Err(e)).boxed(),
        };

        let (tx, rx) = oneshot::channel();
        self.host.set_on_complete(Box::new(move |err, result| {
            // The receiver is gone only if the awaiting caller was dropped.
            let _ = tx.send(settle(err, result));
        }));

        debug!(url = %target, "opening popup bridge");
        self.host.open(&target);

        async move {
            rx.await.unwrap_or_else(|_| {
                warn!("popup bridge completion handler dropped");
                Err(PopBridgeError::HandlerDropped)
            })
        }
        .boxed()
    }
}

/// Map the host's completion arguments to a result.
///
/// A missing payload is checked first: a host that completes with neither an
/// error nor a payload is violating the protocol, and that takes precedence
/// over whatever error it reported.
fn settle(err: Option<String>, result: Option<QueryPayload>) -> Result<QueryPayload> {
    let Some(payload) = result else {
        return Err(PopBridgeError::NoPayload);
    };

    match err {
        Some(message) => Err(PopBridgeError::Host(message)),
        None => Ok(payload),
    }
}
