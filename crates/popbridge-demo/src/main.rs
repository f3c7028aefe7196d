// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Popbridge demo
//
// Entry point. Initialises logging and environment config, publishes an
// in-process host bridge, installs the render proxy in front of a stand-in
// checkout SDK and runs one checkout.
//
// Usage: popbridge-demo [payment|cancel|error]

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::{Value, json};

use popbridge_checkout::proxy::RenderFuture;
use popbridge_checkout::{CheckoutProps, CheckoutRenderer, FlowContext, PopupBridgeProxy};
use popbridge_core::types::{QueryPayload, WindowRef};
use popbridge_core::{EnvConfig, TracingReporter};
use popbridge_host::loopback::{Completion, LoopbackHost};
use popbridge_host::{Discovery, HostBinding};

/// Environment variable naming a JSON file of `EnvConfig` overrides.
const CONFIG_ENV: &str = "POPBRIDGE_CONFIG";

/// Stand-in for the SDK's in-page popup/iframe rendering.
struct InPageCheckout;

impl InPageCheckout {
    fn fallback(&self, entry: &'static str, window: Option<WindowRef>) -> RenderFuture<'_> {
        tracing::info!(entry, window = ?window, "rendering in-page checkout");
        async move { Ok(json!({ "rendered": entry })) }.boxed()
    }
}

impl CheckoutRenderer for InPageCheckout {
    fn render(&self, _props: CheckoutProps) -> RenderFuture<'_> {
        self.fallback("render", None)
    }

    fn render_to(&self, window: WindowRef, _props: CheckoutProps) -> RenderFuture<'_> {
        self.fallback("render_to", Some(window))
    }

    fn render_popup_to(&self, window: WindowRef, _props: CheckoutProps) -> RenderFuture<'_> {
        self.fallback("render_popup_to", Some(window))
    }
}

fn load_config() -> EnvConfig {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => match EnvConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "config load failed, using defaults");
                EnvConfig::default()
            }
        },
        Err(_) => EnvConfig::default(),
    }
}

/// Host reply for the requested scenario.
fn scripted_host(scenario: &str) -> LoopbackHost {
    let scenario = scenario.to_owned();
    LoopbackHost::replying("popupbridge://popupbridgev1", move |url| {
        tracing::info!(url, "native view opened");
        let items: QueryPayload = match scenario.as_str() {
            "cancel" => [
                ("opType", "cancel"),
                ("token", "EC-DEMO"),
                ("cancel_uri", "https://merchant.example/cancel"),
            ]
            .into_iter()
            .collect(),
            "error" => return Completion::error("native view was dismissed", None),
            _ => [
                ("opType", "payment"),
                ("token", "EC-DEMO"),
                ("PayerID", "PAYER-DEMO"),
                ("paymentId", "PAY-DEMO"),
                ("intent", "sale"),
                ("return_uri", "https://merchant.example/return"),
            ]
            .into_iter()
            .collect(),
        };
        Completion::payload(items)
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let scenario = std::env::args().nth(1).unwrap_or_else(|| "payment".into());
    tracing::info!(scenario = %scenario, "Popbridge demo starting");

    let proxy = PopupBridgeProxy::install(
        InPageCheckout,
        Discovery::global(),
        FlowContext::new(load_config()),
        Arc::new(TracingReporter),
    );

    // The native host makes its bridge available some time after the page
    // has set up its checkout integration.
    HostBinding::global().publish(Arc::new(scripted_host(&scenario)));
    while !proxy.cell().is_ready() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let props = CheckoutProps::new()
        .env("sandbox")
        .commit(true)
        .payment(|| async { Ok(Some("EC-DEMO".to_string())) })
        .on_authorize(|data, actions| async move {
            tracing::info!(data = ?data, "payment authorized");
            actions.redirect(None, None).await?;
            Ok(serde_json::to_value(&data)?)
        })
        .on_cancel(|data, actions| async move {
            tracing::info!(data = ?data, "payment cancelled");
            actions.redirect(None, None).await?;
            Ok(Value::from("cancelled"))
        });

    match proxy.render(props).await {
        Ok(outcome) => tracing::info!(outcome = %outcome, "checkout finished"),
        Err(e) => tracing::error!(error = %e, "checkout failed"),
    }
}
