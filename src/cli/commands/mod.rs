//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod ping;
pub mod submit;
pub mod validate;
pub mod verify;
