//! Test helpers for provider unit tests
//!
//! In-memory fakes of each backend transport, so adapter logic can be tested
//! without network access.

#[cfg(feature = "provider-bitmovin")]
pub mod fake_bitmovin;
#[cfg(feature = "provider-mediaconvert")]
pub mod fake_mediaconvert;

#[cfg(feature = "provider-bitmovin")]
pub use fake_bitmovin::FakeBitmovin;
#[cfg(feature = "provider-mediaconvert")]
pub use fake_mediaconvert::FakeMediaConvert;
