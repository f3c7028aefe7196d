// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: the bridge's returned payload and the checkout results
// decoded from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PopBridgeError;

/// Result payload handed back by the native host when the popup completes.
///
/// `queryItems` carries the decoded query parameters of the URL the host
/// intercepted (the one beginning with its return-url prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPayload {
    #[serde(rename = "queryItems", default)]
    pub query_items: HashMap<String, String>,
}

impl QueryPayload {
    pub fn new(query_items: HashMap<String, String>) -> Self {
        Self { query_items }
    }

    /// Look up a query item by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query_items.get(key).map(String::as_str)
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.query_items.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Operation the user completed in the native view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Payment,
    Cancel,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Cancel => "cancel",
        }
    }
}

impl std::str::FromStr for OpType {
    type Err = PopBridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "cancel" => Ok(Self::Cancel),
            other => Err(PopBridgeError::InvalidOpType(other.to_owned())),
        }
    }
}

/// Identifiers common to both completion variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIds {
    #[serde(rename = "paymentToken")]
    pub payment_token: Option<String>,
    #[serde(rename = "billingToken")]
    pub billing_token: Option<String>,
    #[serde(rename = "paymentID")]
    pub payment_id: Option<String>,
    #[serde(rename = "payerID")]
    pub payer_id: Option<String>,
    pub intent: Option<String>,
}

impl TransactionIds {
    fn from_query(payload: &QueryPayload) -> Self {
        Self {
            payment_token: payload.owned("token"),
            billing_token: payload.owned("ba_token"),
            payment_id: payload.owned("paymentId"),
            payer_id: payload.owned("PayerID"),
            intent: payload.owned("intent"),
        }
    }
}

/// Data passed to `onAuthorize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeData {
    #[serde(flatten)]
    pub ids: TransactionIds,
    #[serde(rename = "returnUrl")]
    pub return_url: Option<String>,
}

/// Data passed to `onCancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelData {
    #[serde(flatten)]
    pub ids: TransactionIds,
    #[serde(rename = "cancelUrl")]
    pub cancel_url: Option<String>,
}

/// A bridge payload decoded by its `opType` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Payment(AuthorizeData),
    Cancel(CancelData),
}

impl BridgeOutcome {
    pub fn op_type(&self) -> OpType {
        match self {
            Self::Payment(_) => OpType::Payment,
            Self::Cancel(_) => OpType::Cancel,
        }
    }

    /// URL that `actions.redirect()` targets when called without one.
    pub fn default_redirect(&self) -> Option<&str> {
        match self {
            Self::Payment(data) => data.return_url.as_deref(),
            Self::Cancel(data) => data.cancel_url.as_deref(),
        }
    }
}

impl TryFrom<&QueryPayload> for BridgeOutcome {
    type Error = PopBridgeError;

    fn try_from(payload: &QueryPayload) -> Result<Self, Self::Error> {
        let op_type: OpType = payload
            .get("opType")
            .ok_or(PopBridgeError::MissingOpType)?
            .parse()?;

        let ids = TransactionIds::from_query(payload);

        Ok(match op_type {
            OpType::Payment => Self::Payment(AuthorizeData {
                ids,
                return_url: payload.owned("return_uri"),
            }),
            OpType::Cancel => Self::Cancel(CancelData {
                ids,
                cancel_url: payload.owned("cancel_uri"),
            }),
        })
    }
}

/// Shape of the token returned by the caller's payment function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    /// `BA-` prefixed billing-agreement token.
    BillingAgreement,
    /// Payment id or express-checkout token.
    Payment,
}

impl TokenShape {
    pub fn of(token: &str) -> Self {
        if token.starts_with("BA-") {
            Self::BillingAgreement
        } else {
            Self::Payment
        }
    }

    /// Query parameter the checkout page expects the token under.
    pub fn query_param(&self) -> &'static str {
        match self {
            Self::BillingAgreement => "ba_token",
            Self::Payment => "token",
        }
    }
}

/// Funding source a checkout URL is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Funding {
    PayPal,
    Venmo,
    Credit,
    Card,
}

impl Funding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PayPal => "paypal",
            Self::Venmo => "venmo",
            Self::Credit => "credit",
            Self::Card => "card",
        }
    }
}

impl std::fmt::Display for Funding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a browsing context a redirect can target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRef(pub String);

impl WindowRef {
    /// The window hosting the checkout integration.
    pub fn current() -> Self {
        Self("self".into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Default for WindowRef {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for WindowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_payload_decodes_return_url_and_ids() {
        let payload: QueryPayload = [
            ("opType", "payment"),
            ("return_uri", "https://a"),
            ("token", "T"),
            ("PayerID", "P"),
            ("paymentId", "PAY-1"),
        ]
        .into_iter()
        .collect();

        let outcome = BridgeOutcome::try_from(&payload).unwrap();
        let BridgeOutcome::Payment(data) = &outcome else {
            panic!("expected payment outcome, got {outcome:?}");
        };
        assert_eq!(data.ids.payment_token.as_deref(), Some("T"));
        assert_eq!(data.ids.payer_id.as_deref(), Some("P"));
        assert_eq!(data.ids.payment_id.as_deref(), Some("PAY-1"));
        assert_eq!(data.ids.billing_token, None);
        assert_eq!(data.return_url.as_deref(), Some("https://a"));
        assert_eq!(outcome.default_redirect(), Some("https://a"));
    }

    #[test]
    fn cancel_payload_ignores_return_uri() {
        let payload: QueryPayload = [
            ("opType", "cancel"),
            ("cancel_uri", "https://b"),
            ("return_uri", "https://a"),
        ]
        .into_iter()
        .collect();

        let outcome = BridgeOutcome::try_from(&payload).unwrap();
        assert_eq!(outcome.op_type(), OpType::Cancel);
        assert_eq!(outcome.default_redirect(), Some("https://b"));
    }

    #[test]
    fn unknown_op_type_is_rejected() {
        let payload: QueryPayload = [("opType", "bogus")].into_iter().collect();
        let err = BridgeOutcome::try_from(&payload).unwrap_err();
        assert!(matches!(err, PopBridgeError::InvalidOpType(ref t) if t == "bogus"));
    }

    #[test]
    fn missing_op_type_is_rejected() {
        let err = BridgeOutcome::try_from(&QueryPayload::default()).unwrap_err();
        assert!(matches!(err, PopBridgeError::MissingOpType));
    }

    #[test]
    fn authorize_data_serializes_with_checkout_field_names() {
        let data = AuthorizeData {
            ids: TransactionIds {
                payment_token: Some("T".into()),
                payer_id: Some("P".into()),
                ..Default::default()
            },
            return_url: Some("https://a".into()),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["paymentToken"], "T");
        assert_eq!(json["payerID"], "P");
        assert_eq!(json["returnUrl"], "https://a");
        assert!(json["paymentID"].is_null());
    }

    #[test]
    fn payload_reads_query_items_key() {
        let payload: QueryPayload =
            serde_json::from_str(r#"{ "queryItems": { "opType": "cancel" }, "path": "/x" }"#)
                .unwrap();
        assert_eq!(payload.get("opType"), Some("cancel"));
    }

    #[test]
    fn billing_tokens_use_ba_token_param() {
        assert_eq!(TokenShape::of("BA-123").query_param(), "ba_token");
        assert_eq!(TokenShape::of("EC-123").query_param(), "token");
        assert_eq!(TokenShape::of("PAY-123").query_param(), "token");
    }
}
