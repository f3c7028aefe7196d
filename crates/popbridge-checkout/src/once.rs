// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fire-once wrappers for checkout callbacks.

use std::future::Future;
use std::sync::Mutex;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use popbridge_core::error::{BoxError, PopBridgeError, Result};

use crate::actions::Actions;

/// Whether a wrapped callback has run yet.
#[derive(Debug)]
pub enum OnceState<F> {
    NotFired(F),
    Fired,
}

impl<F> OnceState<F> {
    /// Move to `Fired`, yielding the callback if it had not fired before.
    pub fn fire(&mut self) -> Option<F> {
        match std::mem::replace(self, Self::Fired) {
            Self::NotFired(f) => Some(f),
            Self::Fired => None,
        }
    }

    pub fn has_fired(&self) -> bool {
        matches!(self, Self::Fired)
    }
}

type Callback<D> = Box<dyn FnOnce(D, Actions) -> BoxFuture<'static, std::result::Result<Value, BoxError>> + Send>;

/// A checkout callback (`onAuthorize` / `onCancel`) that runs at most once.
///
/// Share it behind an `Arc`: every clone of the props sees the same state, so
/// the guarantee holds per callback, however many times the props are
/// normalized or dispatched.
pub struct OnceCallback<D> {
    state: Mutex<OnceState<Callback<D>>>,
}

impl<D: Send + 'static> OnceCallback<D> {
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: FnOnce(D, Actions) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
    {
        let boxed: Callback<D> = Box::new(move |data, actions| callback(data, actions).boxed());
        Self {
            state: Mutex::new(OnceState::NotFired(boxed)),
        }
    }

    /// A callback that does nothing and yields `null`.
    pub fn noop() -> Self {
        Self::new(|_, _| async { Ok(Value::Null) })
    }

    pub fn has_fired(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .has_fired()
    }

    /// Run the callback if it has not run yet.
    ///
    /// Later calls yield `null` without running anything. A callback error
    /// still counts as having fired.
    pub async fn call(&self, data: D, actions: Actions) -> Result<Value> {
        let callback = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .fire();

        match callback {
            Some(callback) => callback(data, actions)
                .await
                .map_err(|e| PopBridgeError::Callback(e.to_string())),
            None => {
                debug!("checkout callback already fired, skipping");
                Ok(Value::Null)
            }
        }
    }
}

impl<D> std::fmt::Debug for OnceCallback<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fired = self
            .state
            .lock()
            .map(|state| state.has_fired())
            .unwrap_or(true);
        f.debug_struct("OnceCallback").field("fired", &fired).finish()
    }
}
