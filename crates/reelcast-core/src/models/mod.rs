//! Canonical data models
//!
//! Provider-independent shapes that every adapter consumes or produces.

mod job;
mod preset;
mod provider;
mod status;

pub use job::*;
pub use preset::*;
pub use provider::*;
pub use status::*;
