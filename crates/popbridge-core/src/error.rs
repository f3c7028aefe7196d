// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Popbridge.

use serde::Serialize;
use thiserror::Error;

/// Top-level error type for all Popbridge operations.
///
/// None of these are fatal to the host page: the render proxy reports them
/// and falls back to the checkout SDK's own render path.
#[derive(Debug, Error)]
pub enum PopBridgeError {
    // -- Validation --
    #[error("Expected props.payment to be passed")]
    MissingPayment,

    #[error("Expected props.onAuthorize to be passed")]
    MissingOnAuthorize,

    #[error("Invalid props.env: {0}")]
    InvalidEnv(String),

    // -- Payment derivation --
    #[error("props.payment failed: {0}")]
    PaymentFunction(String),

    #[error("Expected props.payment to return a payment id or token")]
    EmptyToken,

    // -- Bridge protocol --
    #[error("popup bridge reported an error: {0}")]
    Host(String),

    #[error("No payload passed in popupBridge.onComplete")]
    NoPayload,

    #[error("popup bridge completion handler was dropped before it fired")]
    HandlerDropped,

    // -- Decode --
    #[error("Invalid opType: {0}")]
    InvalidOpType(String),

    #[error("bridge payload carried no opType")]
    MissingOpType,

    // -- URL construction --
    #[error("invalid checkout url: {0}")]
    Url(#[from] url::ParseError),

    #[error("no checkout url configured for env {env} and funding source {funding}")]
    UnknownCheckoutUrl { env: String, funding: String },

    // -- Callbacks / actions --
    #[error("checkout callback failed: {0}")]
    Callback(String),

    #[error("no redirect url available for this result")]
    NoRedirectUrl,

    #[error("redirect failed: {0}")]
    Redirect(String),

    // -- Configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`PopBridgeError`], attached to fallback reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing required prop or unknown environment.
    Validation,
    /// The payment function failed or produced no token.
    PaymentDerivation,
    /// The host signalled an error, or completed without a payload.
    BridgeProtocol,
    /// The returned payload could not be mapped to a checkout result.
    Decode,
    /// A caller callback or action failed.
    Callback,
    /// URL or configuration problems on our side.
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::PaymentDerivation => "payment_derivation",
            Self::BridgeProtocol => "bridge_protocol",
            Self::Decode => "decode",
            Self::Callback => "callback",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PopBridgeError {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingPayment | Self::MissingOnAuthorize | Self::InvalidEnv(_) => {
                ErrorKind::Validation
            }

            Self::PaymentFunction(_) | Self::EmptyToken => ErrorKind::PaymentDerivation,

            Self::Host(_) | Self::NoPayload | Self::HandlerDropped => ErrorKind::BridgeProtocol,

            Self::InvalidOpType(_) | Self::MissingOpType => ErrorKind::Decode,

            Self::Callback(_) | Self::NoRedirectUrl | Self::Redirect(_) => ErrorKind::Callback,

            Self::Url(_) | Self::UnknownCheckoutUrl { .. } | Self::Io(_) | Self::Serialization(_) => {
                ErrorKind::Config
            }
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PopBridgeError>;

/// Error type returned by caller-supplied payment functions and callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_classify_as_validation() {
        assert_eq!(PopBridgeError::MissingPayment.kind(), ErrorKind::Validation);
        assert_eq!(PopBridgeError::MissingOnAuthorize.kind(), ErrorKind::Validation);
        assert_eq!(
            PopBridgeError::InvalidEnv("moon".into()).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn missing_payload_is_a_protocol_error_not_a_cancel() {
        assert_eq!(PopBridgeError::NoPayload.kind(), ErrorKind::BridgeProtocol);
        assert_eq!(
            PopBridgeError::NoPayload.to_string(),
            "No payload passed in popupBridge.onComplete"
        );
    }

    #[test]
    fn invalid_op_type_message_names_the_tag() {
        let err = PopBridgeError::InvalidOpType("bogus".into());
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.to_string(), "Invalid opType: bogus");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::PaymentDerivation).unwrap();
        assert_eq!(json, "\"payment_derivation\"");
        assert_eq!(ErrorKind::BridgeProtocol.to_string(), "bridge_protocol");
    }
}
