// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deployment-environment configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Deployment environments and the checkout base URLs they map to.
///
/// Read-only once constructed; the flow receives it by reference through its
/// context rather than reaching for process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Environment used when props do not name one.
    pub default_env: String,
    /// Checkout (express) URLs keyed by environment name. The keys of this
    /// map define the set of known environments.
    pub checkout_urls: BTreeMap<String, String>,
    /// Billing-agreement approval URLs keyed by environment name.
    pub billing_urls: BTreeMap<String, String>,
    /// Guest (card) checkout URLs keyed by environment name.
    pub guest_urls: BTreeMap<String, String>,
}

impl EnvConfig {
    /// Whether `env` is a recognised deployment environment.
    pub fn is_known_env(&self, env: &str) -> bool {
        self.checkout_urls.contains_key(env)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration overrides from a JSON file. Missing fields keep
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            default_env = %config.default_env,
            envs = config.checkout_urls.len(),
            "loaded environment config"
        );
        Ok(config)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        let hosts = [
            ("production", "https://www.paypal.com"),
            ("sandbox", "https://www.sandbox.paypal.com"),
            ("stage", "https://www.msmaster.qa.paypal.com"),
            ("local", "http://localhost.paypal.com:8000"),
            ("test", "mock://www.paypal.com"),
        ];

        let table = |path: &str| -> BTreeMap<String, String> {
            hosts
                .iter()
                .map(|(env, host)| (env.to_string(), format!("{host}{path}")))
                .collect()
        };

        Self {
            default_env: "production".into(),
            checkout_urls: table("/checkoutnow"),
            billing_urls: table("/agreements/approve"),
            guest_urls: table("/webapps/xoonboarding"),
        }
    }
}
