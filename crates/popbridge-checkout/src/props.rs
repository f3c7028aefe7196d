// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-supplied checkout properties, validation and normalization.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use popbridge_core::config::EnvConfig;
use popbridge_core::error::{BoxError, PopBridgeError, Result};
use popbridge_core::types::{AuthorizeData, CancelData};

use crate::actions::Actions;
use crate::once::OnceCallback;

/// Function producing the payment id or token for a checkout.
pub type PaymentFn =
    Arc<dyn Fn() -> BoxFuture<'static, std::result::Result<Option<String>, BoxError>> + Send + Sync>;

/// Properties passed to `render`, `render_to` and `render_popup_to`.
///
/// Cloning is cheap and clones share callback state.
#[derive(Clone, Default)]
pub struct CheckoutProps {
    /// Deployment environment; the configured default when absent.
    pub env: Option<String>,
    /// Required.
    pub payment: Option<PaymentFn>,
    /// Required.
    pub on_authorize: Option<Arc<OnceCallback<AuthorizeData>>>,
    pub on_cancel: Option<Arc<OnceCallback<CancelData>>>,
    /// Ask the checkout page to show "Pay Now" rather than "Continue".
    pub commit: bool,
}

/// Props with defaults applied and required fields present.
#[derive(Clone)]
pub struct NormalizedProps {
    pub env: String,
    pub payment: PaymentFn,
    pub on_authorize: Arc<OnceCallback<AuthorizeData>>,
    pub on_cancel: Arc<OnceCallback<CancelData>>,
}

impl CheckoutProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn payment<F, Fut>(mut self, payment: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Option<String>, BoxError>> + Send + 'static,
    {
        self.payment = Some(Arc::new(move || payment().boxed()));
        self
    }

    pub fn on_authorize<F, Fut>(mut self, callback: F) -> Self
    where
        F: FnOnce(AuthorizeData, Actions) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
    {
        self.on_authorize = Some(Arc::new(OnceCallback::new(callback)));
        self
    }

    pub fn on_cancel<F, Fut>(mut self, callback: F) -> Self
    where
        F: FnOnce(CancelData, Actions) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
    {
        self.on_cancel = Some(Arc::new(OnceCallback::new(callback)));
        self
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    /// Check required fields and the environment name.
    pub fn validate(&self, config: &EnvConfig) -> Result<()> {
        if self.payment.is_none() {
            return Err(PopBridgeError::MissingPayment);
        }

        if self.on_authorize.is_none() {
            return Err(PopBridgeError::MissingOnAuthorize);
        }

        if let Some(env) = &self.env {
            if !config.is_known_env(env) {
                return Err(PopBridgeError::InvalidEnv(env.clone()));
            }
        }

        Ok(())
    }

    /// Apply defaults. Idempotent: the callbacks returned share their
    /// fire-once state with these props and with every other normalization.
    pub fn normalize(&self, config: &EnvConfig) -> Result<NormalizedProps> {
        let env = self
            .env
            .clone()
            .unwrap_or_else(|| config.default_env.clone());

        Ok(NormalizedProps {
            env,
            payment: self.payment.clone().ok_or(PopBridgeError::MissingPayment)?,
            on_authorize: self
                .on_authorize
                .clone()
                .ok_or(PopBridgeError::MissingOnAuthorize)?,
            on_cancel: self
                .on_cancel
                .clone()
                .unwrap_or_else(|| Arc::new(OnceCallback::noop())),
        })
    }
}

impl std::fmt::Debug for CheckoutProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutProps")
            .field("env", &self.env)
            .field("payment", &self.payment.as_ref().map(|_| "<fn>"))
            .field("on_authorize", &self.on_authorize)
            .field("on_cancel", &self.on_cancel)
            .field("commit", &self.commit)
            .finish()
    }
}
