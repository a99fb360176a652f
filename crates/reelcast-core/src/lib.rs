//! Reelcast Core Library
//!
//! This crate provides the canonical job/preset/status models, the provider
//! error taxonomy and provider configuration shared by every reelcast crate.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BitmovinConfig, Config, MediaConvertConfig};
pub use error::{ErrorKind, LogLevel, ProviderError, ProviderResult, RemoteResultExt};
