//! Job -> Bitmovin encoding plan
//!
//! Everything that can be validated without touching the API happens here, so
//! a job with a bad source, destination or container is rejected before any
//! encoding resources exist.

use reelcast_core::models::Job;
use reelcast_core::{BitmovinConfig, ProviderError, ProviderResult};
use std::collections::HashMap;

use super::codecs::Container;
use super::types::{H264VideoConfiguration, HttpInput, InputSource, PresetCustomData, S3Input};
use crate::provider::job_destination;

/// Provider preset as resolved for a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPreset {
    pub video: H264VideoConfiguration,
    pub custom_data: PresetCustomData,
}

/// One video stream plus its optional audio stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    pub video_config_id: String,
    pub audio_config_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mp4Output {
    pub filename: String,
    pub rendition: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HlsVariant {
    /// Variant name; also the sub-directory of its segments
    pub name: String,
    pub rendition: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodingPlan {
    pub input: InputSource,
    pub input_path: String,
    pub output_bucket: String,
    /// Job directory relative to the bucket, with a trailing slash
    pub job_path: String,
    pub renditions: Vec<Rendition>,
    pub mp4_outputs: Vec<Mp4Output>,
    pub hls_variants: Vec<HlsVariant>,
    /// Directory of the HLS manifest relative to `job_path` (may be empty)
    pub playlist_dir: String,
    pub playlist_name: String,
    pub segment_length: f64,
    pub two_pass: bool,
}

impl EncodingPlan {
    /// Output path of the HLS manifest.
    pub fn manifest_path(&self) -> String {
        join_path(&self.job_path, &self.playlist_dir)
    }

    /// Output path of one variant's video or audio segments.
    pub fn segment_path(&self, variant: &HlsVariant, kind: &str) -> String {
        format!("{}{}/{}/", self.manifest_path(), variant.name, kind)
    }
}

/// Build the encoding plan for `job`.
///
/// `preset_ids` is aligned with `job.outputs`; `presets` holds every resolved
/// preset by ID.
pub fn plan(
    job: &Job,
    preset_ids: &[String],
    presets: &HashMap<String, ResolvedPreset>,
    config: &BitmovinConfig,
) -> ProviderResult<EncodingPlan> {
    let (input, input_path) = input_source(&job.source_media, config)?;
    let (output_bucket, prefix) = parse_s3_url(&config.destination)
        .ok_or_else(|| ProviderError::unsupported("destination", &config.destination))?;
    let job_path = job_destination(prefix, &job.id)
        .trim_start_matches('/')
        .to_string();

    let mut renditions: Vec<Rendition> = Vec::new();
    let mut rendition_index: HashMap<&str, usize> = HashMap::new();
    let mut mp4_outputs = Vec::new();
    let mut hls_variants = Vec::new();
    let mut two_pass = false;

    for (output, preset_id) in job.outputs.iter().zip(preset_ids) {
        let preset = presets.get(preset_id).ok_or_else(|| {
            ProviderError::inconsistent(
                format!("fetching preset {}", preset_id),
                "preset missing from resolved set",
            )
        })?;
        let container = Container::parse(&preset.custom_data.container)?;
        two_pass |= preset.custom_data.two_pass;

        let rendition = match rendition_index.get(preset_id.as_str()) {
            Some(index) => *index,
            None => {
                renditions.push(Rendition {
                    video_config_id: preset_id.clone(),
                    audio_config_id: preset.custom_data.audio.clone(),
                });
                rendition_index.insert(preset_id.as_str(), renditions.len() - 1);
                renditions.len() - 1
            }
        };

        match container {
            Container::Mp4 => mp4_outputs.push(Mp4Output {
                filename: output.file_name.clone(),
                rendition,
            }),
            Container::M3u8 => hls_variants.push(HlsVariant {
                name: variant_name(output.name_modifier()).to_string(),
                rendition,
            }),
        }
    }

    let playlist = job.streaming_params.playlist_file_name.as_str();
    let (playlist_dir, playlist_name) = match playlist.rfind('/') {
        Some(idx) => (&playlist[..idx], &playlist[idx + 1..]),
        None => ("", playlist),
    };

    Ok(EncodingPlan {
        input,
        input_path,
        output_bucket: output_bucket.to_string(),
        job_path,
        renditions,
        mp4_outputs,
        hls_variants,
        playlist_dir: playlist_dir.to_string(),
        playlist_name: playlist_name.to_string(),
        segment_length: f64::from(job.streaming_params.segment_duration),
        two_pass,
    })
}

/// Map a source URL onto a Bitmovin input and the path within it.
pub fn input_source(source: &str, config: &BitmovinConfig) -> ProviderResult<(InputSource, String)> {
    if let Some((bucket, key)) = parse_s3_url(source) {
        if key.is_empty() {
            return Err(ProviderError::unsupported("source media", source));
        }
        let input = InputSource::S3(S3Input {
            id: None,
            bucket_name: bucket.to_string(),
            access_key: config.aws_access_key_id.clone(),
            secret_key: config.aws_secret_access_key.clone(),
            cloud_region: config.aws_storage_region.clone(),
        });
        return Ok((input, key.to_string()));
    }

    let (scheme, rest) = source
        .split_once("://")
        .ok_or_else(|| ProviderError::unsupported("source media", source))?;
    let (host, path) = rest
        .split_once('/')
        .filter(|(host, path)| !host.is_empty() && !path.is_empty())
        .ok_or_else(|| ProviderError::unsupported("source media", source))?;

    let http = HttpInput {
        id: None,
        host: host.to_string(),
    };
    let input = match scheme.to_ascii_lowercase().as_str() {
        "http" => InputSource::Http(http),
        "https" => InputSource::Https(http),
        _ => return Err(ProviderError::unsupported("source media", source)),
    };
    Ok((input, path.to_string()))
}

/// Split `s3://bucket/key` into bucket and key (key may be empty).
pub fn parse_s3_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return None;
    }
    Some((bucket, key))
}

fn variant_name(name_modifier: &str) -> &str {
    name_modifier.rsplit('/').next().unwrap_or(name_modifier)
}

fn join_path(base: &str, dir: &str) -> String {
    if dir.is_empty() {
        base.to_string()
    } else {
        format!("{}{}/", base, dir.trim_matches('/'))
    }
}
