//! Transcoding provider core abstraction
//!
//! Every backend is reached through [`TranscodingProvider`]; callers never see
//! backend wire types. Adapters translate the canonical models in
//! `reelcast_core::models` into their own request shapes and normalize the
//! responses back.

use async_trait::async_trait;
use reelcast_core::models::{Capabilities, Job, JobStatus, Preset};
use reelcast_core::ProviderResult;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Uniform contract over remote transcoding services.
///
/// Implementations are `Send + Sync` and hold no per-call state, so one
/// instance can serve concurrent callers.
#[async_trait]
pub trait TranscodingProvider: Send + Sync + Debug {
    /// Registry name of the provider (e.g. "mediaconvert")
    fn name(&self) -> &str;

    /// Submit a job. The returned status carries the provider job ID.
    async fn create_job(&self, job: &Job) -> ProviderResult<JobStatus>;

    /// Poll a previously submitted job. `job.provider_job_id` must be set;
    /// without it the call fails with `InvalidField` before any remote call.
    async fn job_status(&self, job: &Job) -> ProviderResult<JobStatus>;

    /// Cancel a job by its provider job ID.
    async fn cancel_job(&self, provider_job_id: &str) -> ProviderResult<()>;

    /// Translate and store a preset, returning the provider preset ID.
    async fn create_preset(&self, preset: &Preset) -> ProviderResult<String>;

    async fn get_preset(&self, preset_id: &str) -> ProviderResult<PresetDetails>;

    async fn delete_preset(&self, preset_id: &str) -> ProviderResult<()>;

    /// Cheap reachability probe against the provider API.
    async fn healthcheck(&self) -> ProviderResult<()>;

    fn capabilities(&self) -> Capabilities;
}

/// Provider preset as reported back by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PresetDetails {
    Video(VideoPresetDetails),
    Thumbnail(ThumbnailPresetDetails),
}

impl PresetDetails {
    pub fn id(&self) -> &str {
        match self {
            PresetDetails::Video(details) => &details.id,
            PresetDetails::Thumbnail(details) => &details.id,
        }
    }

    pub fn container(&self) -> &str {
        match self {
            PresetDetails::Video(details) => &details.container,
            PresetDetails::Thumbnail(details) => &details.container,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoPresetDetails {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub container: String,
    pub video_codec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<i64>,
    #[serde(default)]
    pub two_pass: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThumbnailPresetDetails {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    pub framerate_numerator: i64,
    pub framerate_denominator: i64,
    pub max_captures: i64,
    pub quality: i64,
}

/// Base destination for one job's outputs: `<base>/<job id>/`.
pub fn job_destination(base: &str, job_id: &str) -> String {
    format!("{}/{}/", base.trim_end_matches('/'), job_id)
}
