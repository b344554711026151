// SPDX-License-Identifier: MIT
//
// Foliant — core types, errors, and input validation shared across all crates.

pub mod config;
pub mod error;
pub mod naming;
pub mod types;
pub mod validate;

pub use config::AppConfig;
pub use error::{FoliantError, Result};
pub use types::*;
pub use validate::validate;
