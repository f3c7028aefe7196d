// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Popbridge: native host popup-bridge abstractions.
//
// A native host (an iOS or Android app embedding the checkout web view)
// exposes a `HostBridge`: open a URL in a native view, then fire a single
// completion handler with the query items of the URL the view returned to.
// This crate turns that callback contract into an awaitable `PopupBridge`
// and locates a bridge once the host makes one available.

pub mod adapter;
pub mod discovery;
pub mod loopback;
pub mod traits;

pub use adapter::BridgeAdapter;
pub use discovery::{Discovery, HostBinding};
pub use loopback::LoopbackHost;
pub use traits::{AwaitPopupBridge, CompletionHandler, HostBridge, PopupBridge};
