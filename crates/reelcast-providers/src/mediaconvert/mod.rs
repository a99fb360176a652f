//! AWS Elemental MediaConvert provider
//!
//! Presets are stored on the service and fetched by name; a job is a single
//! request carrying one output group per container type.

mod client;
mod outputs;
mod presets;
mod status;
pub mod types;

pub use client::{HttpMediaConvertClient, MediaConvertApi};

use async_trait::async_trait;
use reelcast_core::models::{Capabilities, Job, JobStatus, Preset, Status};
use reelcast_core::{Config, MediaConvertConfig, ProviderError, ProviderResult, RemoteResultExt};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::provider::{job_destination, PresetDetails, TranscodingProvider};
use crate::resolver::{provider_preset_ids, resolve_presets};
use types::{AudioSelector, CreateJobRequest, CreatePresetRequest, Input, JobSettings};

/// Registry name of this provider
pub const NAME: &str = "mediaconvert";

pub struct MediaConvertProvider {
    client: Arc<dyn MediaConvertApi>,
    config: MediaConvertConfig,
}

impl Debug for MediaConvertProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaConvertProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl MediaConvertProvider {
    /// Build the provider with the HTTP transport.
    pub fn new(config: &MediaConvertConfig, http_timeout: Duration) -> ProviderResult<Self> {
        config.validate()?;
        let client = HttpMediaConvertClient::new(config, http_timeout)
            .map_err(|e| ProviderError::incomplete_config(NAME, format!("{:#}", e)))?;
        Ok(Self {
            client: Arc::new(client),
            config: config.clone(),
        })
    }

    /// Build the provider over an arbitrary transport.
    pub fn with_client(
        config: &MediaConvertConfig,
        client: Arc<dyn MediaConvertApi>,
    ) -> ProviderResult<Self> {
        config.validate()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Registry factory. Makes no network call.
    pub fn factory(config: &Config) -> ProviderResult<Arc<dyn TranscodingProvider>> {
        let section = config
            .mediaconvert
            .as_ref()
            .ok_or_else(|| ProviderError::incomplete_config(NAME, "missing mediaconvert section"))?;
        let provider = Self::new(section, Duration::from_secs(config.http_timeout_secs))?;
        Ok(Arc::new(provider))
    }

    fn create_job_request(&self, job: &Job, groups: Vec<types::OutputGroup>) -> CreateJobRequest {
        let mut audio_selectors = BTreeMap::new();
        audio_selectors.insert(
            "Audio Selector 1".to_string(),
            AudioSelector {
                default_selection: "DEFAULT".to_string(),
            },
        );

        let mut user_metadata = BTreeMap::new();
        user_metadata.insert("jobId".to_string(), job.id.clone());

        CreateJobRequest {
            role: self.config.role.clone(),
            queue: self.config.queue.clone(),
            priority: job.queue_priority,
            settings: JobSettings {
                inputs: vec![Input {
                    file_input: job.source_media.clone(),
                    audio_selectors,
                    timecode_source: Some("ZEROBASED".to_string()),
                }],
                output_groups: groups,
            },
            user_metadata,
        }
    }
}

#[async_trait]
impl TranscodingProvider for MediaConvertProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn create_job(&self, job: &Job) -> ProviderResult<JobStatus> {
        let preset_ids = provider_preset_ids(job, NAME)?;

        let client = self.client.clone();
        let presets = resolve_presets(preset_ids.iter().cloned(), move |id| {
            let client = client.clone();
            async move {
                client
                    .get_preset(&id)
                    .await
                    .with_remote(|| format!("fetching preset {}", id))
            }
        })
        .await?;

        let groups = outputs::output_groups(job, &preset_ids, &presets, &self.config.destination)?;
        let request = self.create_job_request(job, groups);

        tracing::info!(
            provider = NAME,
            job_id = %job.id,
            outputs = job.outputs.len(),
            "Submitting MediaConvert job"
        );

        let created = self.client.create_job(&request).await.remote("creating job")?;
        let provider_job_id = created.id.ok_or_else(|| {
            ProviderError::inconsistent("creating job", "response carries no job id")
        })?;

        tracing::info!(provider = NAME, job_id = %job.id, provider_job_id = %provider_job_id, "MediaConvert job created");

        Ok(JobStatus::new(NAME, provider_job_id, Status::Queued, 0.0).with_output(
            reelcast_core::models::JobOutput {
                destination: job_destination(&self.config.destination, &job.id),
                files: Vec::new(),
            },
        ))
    }

    async fn job_status(&self, job: &Job) -> ProviderResult<JobStatus> {
        let provider_job_id = job.remote_id()?;
        let remote = self
            .client
            .get_job(provider_job_id)
            .await
            .with_remote(|| format!("fetching job {}", provider_job_id))?;

        let result = status::job_status(
            provider_job_id,
            &remote,
            job_destination(&self.config.destination, &job.id),
        )?;

        tracing::debug!(
            provider = NAME,
            provider_job_id = %provider_job_id,
            status = %result.status,
            progress = result.progress,
            "Polled MediaConvert job"
        );
        Ok(result)
    }

    async fn cancel_job(&self, provider_job_id: &str) -> ProviderResult<()> {
        self.client
            .cancel_job(provider_job_id)
            .await
            .with_remote(|| format!("canceling job {}", provider_job_id))?;
        tracing::info!(provider = NAME, provider_job_id = %provider_job_id, "MediaConvert job canceled");
        Ok(())
    }

    async fn create_preset(&self, preset: &Preset) -> ProviderResult<String> {
        let settings = presets::preset_settings(preset)?;
        let request = CreatePresetRequest {
            name: preset.name.clone(),
            description: preset.description.clone(),
            settings,
        };

        let created = self
            .client
            .create_preset(&request)
            .await
            .with_remote(|| format!("creating preset {}", preset.name))?;

        tracing::info!(provider = NAME, preset_id = %created.name, "MediaConvert preset created");
        Ok(created.name)
    }

    async fn get_preset(&self, preset_id: &str) -> ProviderResult<PresetDetails> {
        let preset = self
            .client
            .get_preset(preset_id)
            .await
            .with_remote(|| format!("fetching preset {}", preset_id))?;
        presets::preset_details(&preset)
    }

    async fn delete_preset(&self, preset_id: &str) -> ProviderResult<()> {
        self.client
            .delete_preset(preset_id)
            .await
            .with_remote(|| format!("deleting preset {}", preset_id))
    }

    async fn healthcheck(&self) -> ProviderResult<()> {
        self.client.list_jobs(1).await.remote("healthcheck")?;
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new(
            &["prores", "h264", "h265"],
            &["mp4", "hls", "thumbnail"],
            &["s3"],
        )
    }
}
