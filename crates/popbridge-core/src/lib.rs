// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Popbridge: core types, error definitions and environment configuration
// shared by the host bridge and checkout crates.

pub mod config;
pub mod error;
pub mod query;
pub mod report;
pub mod types;

pub use config::EnvConfig;
pub use error::{BoxError, ErrorKind, PopBridgeError};
pub use report::{ErrorReporter, TracingReporter};
pub use types::*;
