// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Actions handed to `onAuthorize` / `onCancel` alongside the result data.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, info};

use popbridge_core::error::{PopBridgeError, Result};
use popbridge_core::types::WindowRef;

/// Executes a (possibly cross-frame) redirect.
pub trait Redirector: Send + Sync {
    fn redirect(&self, window: &WindowRef, url: &str) -> BoxFuture<'static, Result<()>>;
}

/// Redirector that only records the request in the log.
///
/// Suitable where the embedding page performs navigation itself and only
/// needs the decision surfaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRedirector;

impl Redirector for LoggingRedirector {
    fn redirect(&self, window: &WindowRef, url: &str) -> BoxFuture<'static, Result<()>> {
        info!(window = %window, url, "redirect requested");
        futures::future::ready(Ok(())).boxed()
    }
}

/// Actions available to checkout callbacks.
///
/// The native host owns the lifetime of its view, so `close` and
/// `close_component` do nothing here.
#[derive(Clone)]
pub struct Actions {
    default_url: Option<String>,
    redirector: Arc<dyn Redirector>,
}

impl Actions {
    pub fn new(default_url: Option<String>, redirector: Arc<dyn Redirector>) -> Self {
        Self {
            default_url,
            redirector,
        }
    }

    /// URL `redirect` uses when the caller gives none.
    pub fn default_url(&self) -> Option<&str> {
        self.default_url.as_deref()
    }

    pub fn close(&self) {
        debug!("close ignored: native host owns the view");
    }

    pub fn close_component(&self) {
        debug!("close_component ignored: native host owns the view");
    }

    /// Redirect `window` (default: the current window) to `url` (default:
    /// the return or cancel URL the host reported).
    pub async fn redirect(&self, window: Option<WindowRef>, url: Option<&str>) -> Result<()> {
        let window = window.unwrap_or_default();
        let url = url
            .or(self.default_url.as_deref())
            .ok_or(PopBridgeError::NoRedirectUrl)?;
        self.redirector.redirect(&window, url).await
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("default_url", &self.default_url)
            .finish_non_exhaustive()
    }
}
