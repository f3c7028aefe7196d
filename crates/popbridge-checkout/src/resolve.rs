// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Checkout URL resolution by environment, funding source and token shape.

use std::sync::Arc;

use popbridge_core::config::EnvConfig;
use popbridge_core::error::{PopBridgeError, Result};
use popbridge_core::types::{Funding, TokenShape};

/// Resolves the page a checkout should open for a given token.
pub trait CheckoutUrlResolver: Send + Sync {
    /// Absolute base URL for `token` in `env`, before any query parameters.
    fn resolve(&self, env: &str, funding: Funding, token: &str) -> Result<String>;

    /// Query parameter the token is passed under.
    fn parameter_for(&self, token: &str) -> &'static str {
        TokenShape::of(token).query_param()
    }
}

/// Resolver backed by an [`EnvConfig`].
///
/// Billing-agreement tokens go to the billing approval page; card funding
/// goes to guest checkout; everything else goes to regular checkout.
#[derive(Debug, Clone)]
pub struct ConfiguredResolver {
    config: Arc<EnvConfig>,
}

impl ConfiguredResolver {
    pub fn new(config: Arc<EnvConfig>) -> Self {
        Self { config }
    }
}

impl CheckoutUrlResolver for ConfiguredResolver {
    fn resolve(&self, env: &str, funding: Funding, token: &str) -> Result<String> {
        let table = match (TokenShape::of(token), funding) {
            (TokenShape::BillingAgreement, _) => &self.config.billing_urls,
            (TokenShape::Payment, Funding::Card) => &self.config.guest_urls,
            (TokenShape::Payment, _) => &self.config.checkout_urls,
        };

        table
            .get(env)
            .cloned()
            .ok_or_else(|| PopBridgeError::UnknownCheckoutUrl {
                env: env.to_owned(),
                funding: funding.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ConfiguredResolver {
        ConfiguredResolver::new(Arc::new(EnvConfig::default()))
    }

    #[test]
    fn payment_tokens_resolve_to_checkout() {
        let url = resolver().resolve("sandbox", Funding::PayPal, "EC-123").unwrap();
        assert_eq!(url, "https://www.sandbox.paypal.com/checkoutnow");
        assert_eq!(resolver().parameter_for("EC-123"), "token");
    }

    #[test]
    fn billing_tokens_resolve_to_billing_approval() {
        let url = resolver().resolve("production", Funding::PayPal, "BA-9").unwrap();
        assert_eq!(url, "https://www.paypal.com/agreements/approve");
        assert_eq!(resolver().parameter_for("BA-9"), "ba_token");
    }

    #[test]
    fn card_funding_resolves_to_guest_checkout() {
        let url = resolver().resolve("production", Funding::Card, "EC-1").unwrap();
        assert_eq!(url, "https://www.paypal.com/webapps/xoonboarding");
    }

    #[test]
    fn unknown_env_is_an_error() {
        let err = resolver().resolve("moon", Funding::PayPal, "EC-1").unwrap_err();
        assert!(matches!(err, PopBridgeError::UnknownCheckoutUrl { ref env, .. } if env == "moon"));
    }
}
