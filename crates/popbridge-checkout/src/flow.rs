// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One bridged checkout attempt: validate props, derive the checkout URL,
// open it through the popup bridge, then decode the host's payload and hand
// it to `onAuthorize` or `onCancel`.
//
// Any step failing ends the attempt. Nothing is retried or recovered here;
// the caller decides what to do with a `BridgeAttempt::Fallback`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use popbridge_core::config::EnvConfig;
use popbridge_core::error::{PopBridgeError, Result};
use popbridge_core::query::extend_url;
use popbridge_core::types::{BridgeOutcome, Funding, QueryPayload};
use popbridge_host::traits::PopupBridge;

use crate::actions::{Actions, LoggingRedirector, Redirector};
use crate::props::CheckoutProps;
use crate::resolve::{CheckoutUrlResolver, ConfiguredResolver};

/// Marker telling the checkout page it runs inside a native host.
const NATIVE_XO_PARAM: (&str, &str) = ("native_xo", "1");

/// Collaborators a bridged checkout needs.
#[derive(Clone)]
pub struct FlowContext {
    pub config: Arc<EnvConfig>,
    pub resolver: Arc<dyn CheckoutUrlResolver>,
    pub redirector: Arc<dyn Redirector>,
}

impl FlowContext {
    /// Context with the config-backed resolver and the logging redirector.
    pub fn new(config: EnvConfig) -> Self {
        let config = Arc::new(config);
        Self {
            resolver: Arc::new(ConfiguredResolver::new(config.clone())),
            redirector: Arc::new(LoggingRedirector),
            config,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn CheckoutUrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_redirector(mut self, redirector: Arc<dyn Redirector>) -> Self {
        self.redirector = redirector;
        self
    }
}

impl Default for FlowContext {
    fn default() -> Self {
        Self::new(EnvConfig::default())
    }
}

/// How a bridged attempt ended.
#[derive(Debug)]
pub enum BridgeAttempt {
    /// A callback ran; carries what it returned.
    Completed(Value),
    /// The attempt failed. The original render path should take over.
    Fallback(PopBridgeError),
}

impl BridgeAttempt {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Fallback(err) => Err(err),
        }
    }
}

/// Run one checkout through `bridge`.
pub async fn render_through_bridge(
    props: &CheckoutProps,
    bridge: &dyn PopupBridge,
    ctx: &FlowContext,
) -> BridgeAttempt {
    match attempt(props, bridge, ctx).await {
        Ok(value) => BridgeAttempt::Completed(value),
        Err(err) => BridgeAttempt::Fallback(err),
    }
}

async fn attempt(props: &CheckoutProps, bridge: &dyn PopupBridge, ctx: &FlowContext) -> Result<Value> {
    props.validate(&ctx.config)?;
    let url = checkout_url(props, ctx).await?;
    let payload = bridge.open(&url).await?;
    dispatch(props, &payload, ctx).await
}

/// Build the URL the native view should open.
///
/// Calls the payment function for a token, resolves the base URL for the
/// environment and token shape, and appends the token, `useraction` and
/// `native_xo` parameters.
pub async fn checkout_url(props: &CheckoutProps, ctx: &FlowContext) -> Result<String> {
    let normalized = props.normalize(&ctx.config)?;

    let token = (normalized.payment)()
        .await
        .map_err(|e| PopBridgeError::PaymentFunction(e.to_string()))?
        .filter(|token| !token.is_empty())
        .ok_or(PopBridgeError::EmptyToken)?;

    let base = ctx.resolver.resolve(&normalized.env, Funding::PayPal, &token)?;
    let useraction = if props.commit { "commit" } else { "" };

    let url = extend_url(
        &base,
        &[
            (ctx.resolver.parameter_for(&token), token.as_str()),
            ("useraction", useraction),
            NATIVE_XO_PARAM,
        ],
    )?;

    debug!(env = %normalized.env, url = %url, "derived checkout url");
    Ok(url)
}

/// Decode `payload` and invoke the matching callback.
pub async fn dispatch(props: &CheckoutProps, payload: &QueryPayload, ctx: &FlowContext) -> Result<Value> {
    let normalized = props.normalize(&ctx.config)?;
    let outcome = BridgeOutcome::try_from(payload)?;

    info!(op_type = outcome.op_type().as_str(), "dispatching bridge result");

    let actions = Actions::new(
        outcome.default_redirect().map(str::to_owned),
        ctx.redirector.clone(),
    );

    match outcome {
        BridgeOutcome::Payment(data) => normalized.on_authorize.call(data, actions).await,
        BridgeOutcome::Cancel(data) => normalized.on_cancel.call(data, actions).await,
    }
}
