// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions at the native-host boundary.

use std::sync::Arc;

use futures::future::BoxFuture;
use popbridge_core::error::Result;
use popbridge_core::types::QueryPayload;

/// Handler the host invokes once its native view completes.
///
/// Arguments follow the host's `(error, result)` convention: an error message
/// if the view failed, and the decoded query payload of the return URL.
pub type CompletionHandler = Box<dyn FnOnce(Option<String>, Option<QueryPayload>) + Send>;

/// Raw capability exposed by the native host.
///
/// The host owns a single completion-handler slot. Setting a handler replaces
/// (and drops) whatever was registered before.
pub trait HostBridge: Send + Sync {
    /// Present `url` in a native view.
    fn open(&self, url: &str);

    /// Prefix of the URL the host intercepts to detect completion.
    fn return_url_prefix(&self) -> String;

    /// Store `handler` in the host's completion slot.
    fn set_on_complete(&self, handler: CompletionHandler);
}

/// Awaitable popup capability consumed by the checkout flow.
pub trait PopupBridge: Send + Sync {
    /// Open `url` through the host and resolve with its completion payload.
    ///
    /// At most one call should be in flight per bridge: a second call
    /// replaces the host's completion handler, and the first call then fails
    /// with `HandlerDropped`.
    fn open(&self, url: &str) -> BoxFuture<'static, Result<QueryPayload>>;
}

/// Accessor injected by an outer frame or SDK context that already knows how
/// to obtain a popup bridge. When present it takes precedence over waiting
/// for the host binding.
pub trait AwaitPopupBridge: Send + Sync {
    fn await_popup_bridge(&self) -> BoxFuture<'static, Result<Arc<dyn PopupBridge>>>;
}
