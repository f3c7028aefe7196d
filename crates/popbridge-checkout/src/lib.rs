// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Popbridge Checkout: runs a checkout through a native popup bridge and
// installs it in front of a checkout SDK's render entry points, falling back
// to the SDK's own rendering whenever the bridged attempt fails.

pub mod actions;
pub mod flow;
pub mod once;
pub mod props;
pub mod proxy;
pub mod resolve;

pub use actions::{Actions, LoggingRedirector, Redirector};
pub use flow::{BridgeAttempt, FlowContext, render_through_bridge};
pub use once::{OnceCallback, OnceState};
pub use props::{CheckoutProps, NormalizedProps};
pub use proxy::{BridgeCell, CheckoutRenderer, POPUP_BRIDGE_ERROR_EVENT, PopupBridgeProxy};
pub use resolve::{CheckoutUrlResolver, ConfiguredResolver};
