//! Bitmovin provider
//!
//! A preset is an H.264 codec configuration, optionally paired with an AAC
//! configuration referenced from its custom data. A job becomes an encoding
//! assembled from inputs, streams, muxings and (for HLS) a manifest, then
//! started in one call.

mod client;
mod codecs;
mod outputs;
mod status;
pub mod types;

pub use client::{BitmovinApi, HttpBitmovinClient};

use async_trait::async_trait;
use reelcast_core::models::{Capabilities, Job, JobOutput, JobStatus, Preset, Status};
use reelcast_core::{BitmovinConfig, Config, ProviderError, ProviderResult, RemoteResultExt};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::provider::{job_destination, PresetDetails, TranscodingProvider};
use crate::resolver::{provider_preset_ids, resolve_presets};
use outputs::{EncodingPlan, HlsVariant, ResolvedPreset};
use types::{
    AclEntry, AudioMediaInfo, Encoding, EncodingMode, EncodingOutput, Fmp4Muxing, HlsManifest,
    ManifestResource, Mp4Muxing, MuxingStream, PresetCustomData, S3Output, StartEncodingRequest,
    Stream, StreamInfo, StreamInput,
};

/// Registry name of this provider
pub const NAME: &str = "bitmovin";

const SEGMENT_NAMING: &str = "seg_%number%.m4s";
const INIT_SEGMENT_NAME: &str = "init.mp4";

pub struct BitmovinProvider {
    client: Arc<dyn BitmovinApi>,
    config: BitmovinConfig,
}

impl Debug for BitmovinProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BitmovinProvider")
            .field("config", &self.config)
            .finish()
    }
}

/// Streams created for one rendition.
struct RenditionStreams {
    video: String,
    audio: Option<String>,
}

impl BitmovinProvider {
    /// Build the provider with the HTTP transport.
    pub fn new(config: &BitmovinConfig, http_timeout: Duration) -> ProviderResult<Self> {
        config.validate()?;
        let client = HttpBitmovinClient::new(&config.endpoint, &config.api_key, http_timeout)
            .map_err(|e| ProviderError::incomplete_config(NAME, format!("{:#}", e)))?;
        Ok(Self {
            client: Arc::new(client),
            config: config.clone(),
        })
    }

    /// Build the provider over an arbitrary transport.
    pub fn with_client(
        config: &BitmovinConfig,
        client: Arc<dyn BitmovinApi>,
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
            .bitmovin
            .as_ref()
            .ok_or_else(|| ProviderError::incomplete_config(NAME, "missing bitmovin section"))?;
        let provider = Self::new(section, Duration::from_secs(config.http_timeout_secs))?;
        Ok(Arc::new(provider))
    }

    fn output(&self, output_id: &str, output_path: String) -> EncodingOutput {
        EncodingOutput {
            output_id: output_id.to_string(),
            output_path,
            acl: vec![AclEntry {
                permission: "PRIVATE".to_string(),
            }],
        }
    }

    async fn create_stream(
        &self,
        encoding_id: &str,
        codec_config_id: &str,
        input_id: &str,
        input_path: &str,
    ) -> ProviderResult<String> {
        let stream = Stream {
            id: None,
            codec_config_id: codec_config_id.to_string(),
            input_streams: vec![StreamInput {
                input_id: input_id.to_string(),
                input_path: input_path.to_string(),
                selection_mode: "AUTO".to_string(),
            }],
        };
        self.client
            .create_stream(encoding_id, &stream)
            .await
            .with_remote(|| format!("creating stream for {}", codec_config_id))
    }

    async fn create_segment_muxing(
        &self,
        encoding_id: &str,
        stream_id: &str,
        output: EncodingOutput,
        segment_length: f64,
    ) -> ProviderResult<String> {
        let muxing = Fmp4Muxing {
            id: None,
            segment_length,
            segment_naming: SEGMENT_NAMING.to_string(),
            init_segment_name: INIT_SEGMENT_NAME.to_string(),
            streams: vec![MuxingStream {
                stream_id: stream_id.to_string(),
            }],
            outputs: vec![output],
        };
        self.client
            .create_fmp4_muxing(encoding_id, &muxing)
            .await
            .with_remote(|| format!("creating segment muxing for stream {}", stream_id))
    }

    /// Create the manifest and one variant per HLS output. Returns the
    /// manifest ID.
    async fn create_hls_manifest(
        &self,
        plan: &EncodingPlan,
        encoding_id: &str,
        output_id: &str,
        streams: &[RenditionStreams],
    ) -> ProviderResult<String> {
        let manifest = HlsManifest {
            id: None,
            name: plan.playlist_name.clone(),
            manifest_name: plan.playlist_name.clone(),
            outputs: vec![self.output(output_id, plan.manifest_path())],
        };
        let manifest_id = self
            .client
            .create_hls_manifest(&manifest)
            .await
            .remote("creating HLS manifest")?;

        for variant in &plan.hls_variants {
            self.create_hls_variant(plan, encoding_id, output_id, &manifest_id, variant, streams)
                .await?;
        }

        Ok(manifest_id)
    }

    async fn create_hls_variant(
        &self,
        plan: &EncodingPlan,
        encoding_id: &str,
        output_id: &str,
        manifest_id: &str,
        variant: &HlsVariant,
        streams: &[RenditionStreams],
    ) -> ProviderResult<()> {
        let rendition = &streams[variant.rendition];

        let video_muxing = self
            .create_segment_muxing(
                encoding_id,
                &rendition.video,
                self.output(output_id, plan.segment_path(variant, "video")),
                plan.segment_length,
            )
            .await?;

        let mut audio_group = None;
        if let Some(audio_stream) = &rendition.audio {
            let audio_muxing = self
                .create_segment_muxing(
                    encoding_id,
                    audio_stream,
                    self.output(output_id, plan.segment_path(variant, "audio")),
                    plan.segment_length,
                )
                .await?;

            let group_id = format!("audio_{}", variant.name);
            let media = AudioMediaInfo {
                id: None,
                name: group_id.clone(),
                group_id: group_id.clone(),
                language: "en".to_string(),
                segment_path: format!("{}/audio/", variant.name),
                uri: format!("{}_audio.m3u8", variant.name),
                encoding_id: encoding_id.to_string(),
                stream_id: audio_stream.clone(),
                muxing_id: audio_muxing,
            };
            self.client
                .create_hls_audio_media(manifest_id, &media)
                .await
                .with_remote(|| format!("creating audio media {}", group_id))?;
            audio_group = Some(group_id);
        }

        let info = StreamInfo {
            id: None,
            audio: audio_group,
            closed_captions: "NONE".to_string(),
            segment_path: format!("{}/video/", variant.name),
            uri: format!("{}.m3u8", variant.name),
            encoding_id: encoding_id.to_string(),
            stream_id: rendition.video.clone(),
            muxing_id: video_muxing,
        };
        self.client
            .create_hls_stream_info(manifest_id, &info)
            .await
            .with_remote(|| format!("creating stream info {}", variant.name))?;
        Ok(())
    }

    /// Create every encoding resource described by `plan` and start it.
    async fn run_plan(&self, job: &Job, plan: &EncodingPlan) -> ProviderResult<String> {
        let input_id = self
            .client
            .create_input(&plan.input)
            .await
            .remote("creating input")?;

        let output = S3Output {
            id: None,
            bucket_name: plan.output_bucket.clone(),
            access_key: self.config.aws_access_key_id.clone(),
            secret_key: self.config.aws_secret_access_key.clone(),
            cloud_region: self.config.aws_storage_region.clone(),
        };
        let output_id = self
            .client
            .create_s3_output(&output)
            .await
            .remote("creating output")?;

        let encoding = Encoding {
            id: None,
            name: job.id.clone(),
            cloud_region: self.config.encoding_region.clone(),
            encoder_version: self.config.encoding_version.clone(),
        };
        let encoding_id = self
            .client
            .create_encoding(&encoding)
            .await
            .remote("creating encoding")?
            .id
            .ok_or_else(|| {
                ProviderError::inconsistent("creating encoding", "response carries no encoding id")
            })?;

        let mut streams = Vec::with_capacity(plan.renditions.len());
        for rendition in &plan.renditions {
            let video = self
                .create_stream(&encoding_id, &rendition.video_config_id, &input_id, &plan.input_path)
                .await?;
            let audio = match &rendition.audio_config_id {
                Some(audio_config_id) => Some(
                    self.create_stream(&encoding_id, audio_config_id, &input_id, &plan.input_path)
                        .await?,
                ),
                None => None,
            };
            streams.push(RenditionStreams { video, audio });
        }

        for mp4 in &plan.mp4_outputs {
            let rendition = &streams[mp4.rendition];
            let mut muxing_streams = vec![MuxingStream {
                stream_id: rendition.video.clone(),
            }];
            if let Some(audio) = &rendition.audio {
                muxing_streams.push(MuxingStream {
                    stream_id: audio.clone(),
                });
            }

            let muxing = Mp4Muxing {
                id: None,
                filename: mp4.filename.clone(),
                streams: muxing_streams,
                outputs: vec![self.output(&output_id, plan.job_path.clone())],
            };
            self.client
                .create_mp4_muxing(&encoding_id, &muxing)
                .await
                .with_remote(|| format!("creating muxing {}", mp4.filename))?;
        }

        let mut vod_hls_manifests = Vec::new();
        if !plan.hls_variants.is_empty() {
            let manifest_id = self
                .create_hls_manifest(plan, &encoding_id, &output_id, &streams)
                .await?;
            vod_hls_manifests.push(ManifestResource { manifest_id });
        }

        let request = StartEncodingRequest {
            encoding_mode: if plan.two_pass {
                EncodingMode::TwoPass
            } else {
                EncodingMode::Standard
            },
            vod_hls_manifests,
        };
        self.client
            .start_encoding(&encoding_id, &request)
            .await
            .with_remote(|| format!("starting encoding {}", encoding_id))?;

        Ok(encoding_id)
    }
}

#[async_trait]
impl TranscodingProvider for BitmovinProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn create_job(&self, job: &Job) -> ProviderResult<JobStatus> {
        let preset_ids = provider_preset_ids(job, NAME)?;

        let client = self.client.clone();
        let presets = resolve_presets(preset_ids.iter().cloned(), move |id| {
            let client = client.clone();
            async move {
                let video = client
                    .get_h264_configuration(&id)
                    .await
                    .with_remote(|| format!("fetching preset {}", id))?;
                let custom_data = client
                    .get_h264_custom_data(&id)
                    .await
                    .with_remote(|| format!("fetching preset {}", id))?;
                Ok::<_, ProviderError>(ResolvedPreset { video, custom_data })
            }
        })
        .await?;

        let plan = outputs::plan(job, &preset_ids, &presets, &self.config)?;

        tracing::info!(
            provider = NAME,
            job_id = %job.id,
            renditions = plan.renditions.len(),
            mp4_outputs = plan.mp4_outputs.len(),
            hls_variants = plan.hls_variants.len(),
            "Submitting Bitmovin encoding"
        );

        let encoding_id = self.run_plan(job, &plan).await?;

        tracing::info!(provider = NAME, job_id = %job.id, encoding_id = %encoding_id, "Bitmovin encoding started");

        Ok(
            JobStatus::new(NAME, encoding_id, Status::Queued, 0.0).with_output(JobOutput {
                destination: job_destination(&self.config.destination, &job.id),
                files: Vec::new(),
            }),
        )
    }

    async fn job_status(&self, job: &Job) -> ProviderResult<JobStatus> {
        let encoding_id = job.remote_id()?;
        let task = self
            .client
            .get_encoding_status(encoding_id)
            .await
            .with_remote(|| format!("fetching encoding status {}", encoding_id))?;

        let result = status::job_status(
            self.client.as_ref(),
            encoding_id,
            &task,
            job_destination(&self.config.destination, &job.id),
        )
        .await?;

        tracing::debug!(
            provider = NAME,
            encoding_id = %encoding_id,
            status = %result.status,
            progress = result.progress,
            "Polled Bitmovin encoding"
        );
        Ok(result)
    }

    async fn cancel_job(&self, provider_job_id: &str) -> ProviderResult<()> {
        self.client
            .stop_encoding(provider_job_id)
            .await
            .with_remote(|| format!("stopping encoding {}", provider_job_id))?;
        tracing::info!(provider = NAME, encoding_id = %provider_job_id, "Bitmovin encoding stopped");
        Ok(())
    }

    async fn create_preset(&self, preset: &Preset) -> ProviderResult<String> {
        let configs = codecs::codec_configurations(preset)?;
        let mut video = configs.video;
        let mut audio_id = None;

        if let Some(audio) = configs.audio {
            let created = self
                .client
                .create_aac_configuration(&audio)
                .await
                .with_remote(|| format!("creating audio configuration {}", audio.name))?;
            let id = created.id.ok_or_else(|| {
                ProviderError::inconsistent(
                    "creating audio configuration",
                    "response carries no id",
                )
            })?;
            if let Some(custom_data) = video.custom_data.as_mut() {
                custom_data.audio = Some(id.clone());
            }
            audio_id = Some(id);
        }

        let created = match self.client.create_h264_configuration(&video).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(audio_id) = &audio_id {
                    tracing::warn!(
                        provider = NAME,
                        audio_config_id = %audio_id,
                        name = %preset.name,
                        "Video configuration failed; audio configuration left orphaned"
                    );
                }
                return Err(ProviderError::remote(
                    format!("creating preset {}", preset.name),
                    e,
                ));
            }
        };
        let id = created.id.ok_or_else(|| {
            ProviderError::inconsistent("creating video configuration", "response carries no id")
        })?;

        tracing::info!(provider = NAME, preset_id = %id, name = %preset.name, "Bitmovin preset created");
        Ok(id)
    }

    async fn get_preset(&self, preset_id: &str) -> ProviderResult<PresetDetails> {
        let (video, custom_data) = self.fetch_video_configuration(preset_id).await?;
        let audio = match &custom_data.audio {
            Some(audio_id) => Some(
                self.client
                    .get_aac_configuration(audio_id)
                    .await
                    .with_remote(|| format!("fetching audio configuration {}", audio_id))?,
            ),
            None => None,
        };

        Ok(PresetDetails::Video(codecs::preset_details(
            preset_id,
            &video,
            &custom_data,
            audio.as_ref(),
        )))
    }

    async fn delete_preset(&self, preset_id: &str) -> ProviderResult<()> {
        let custom_data = self
            .client
            .get_h264_custom_data(preset_id)
            .await
            .with_remote(|| format!("fetching preset {}", preset_id))?;

        self.client
            .delete_h264_configuration(preset_id)
            .await
            .with_remote(|| format!("deleting preset {}", preset_id))?;

        if let Some(audio_id) = &custom_data.audio {
            self.client
                .delete_aac_configuration(audio_id)
                .await
                .with_remote(|| format!("deleting audio configuration {}", audio_id))?;
        }
        Ok(())
    }

    async fn healthcheck(&self) -> ProviderResult<()> {
        self.client.list_encodings(1).await.remote("healthcheck")?;
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::new(&["h264"], &["mp4", "hls"], &["s3"])
    }
}

impl BitmovinProvider {
    async fn fetch_video_configuration(
        &self,
        preset_id: &str,
    ) -> ProviderResult<(types::H264VideoConfiguration, PresetCustomData)> {
        let video = self
            .client
            .get_h264_configuration(preset_id)
            .await
            .with_remote(|| format!("fetching preset {}", preset_id))?;
        let custom_data = self
            .client
            .get_h264_custom_data(preset_id)
            .await
            .with_remote(|| format!("fetching preset {}", preset_id))?;
        Ok((video, custom_data))
    }
}
