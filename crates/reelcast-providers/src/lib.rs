//! Transcoding provider implementations
//!
//! Exposes the [`TranscodingProvider`] contract, the name -> factory
//! [`ProviderRegistry`], the concurrent preset resolver shared by adapters,
//! and one adapter per backend behind its own feature flag.

pub mod provider;
pub mod registry;
pub mod resolver;

#[cfg(feature = "provider-bitmovin")]
pub mod bitmovin;
#[cfg(feature = "provider-mediaconvert")]
pub mod mediaconvert;

#[cfg(test)]
mod test_helpers;

pub use provider::{
    job_destination, PresetDetails, ThumbnailPresetDetails, TranscodingProvider,
    VideoPresetDetails,
};
pub use registry::{ProviderFactory, ProviderRegistry};

#[cfg(feature = "provider-bitmovin")]
pub use bitmovin::BitmovinProvider;
#[cfg(feature = "provider-mediaconvert")]
pub use mediaconvert::MediaConvertProvider;
