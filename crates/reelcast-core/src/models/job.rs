use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProviderError, ProviderResult};

/// Default HLS playlist path, relative to the job destination.
pub const DEFAULT_PLAYLIST_FILE_NAME: &str = "hls/index.m3u8";
/// Default HLS segment duration in seconds.
pub const DEFAULT_SEGMENT_DURATION: u32 = 6;

/// One transcode request, owned by the caller and read-only for providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    /// Job ID assigned by the provider on submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_job_id: Option<String>,
    pub source_media: String,
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub streaming_params: StreamingParams,
    #[serde(default)]
    pub queue_priority: i32,
}

impl Job {
    /// Provider job ID recorded at submission. Polling without one is an
    /// error rather than a lookup of the canonical ID.
    pub fn remote_id(&self) -> ProviderResult<&str> {
        match self.provider_job_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            other => Err(ProviderError::invalid_field(
                "provider_job_id",
                other.unwrap_or_default(),
                "provider job ID",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamingParams {
    #[serde(default = "default_segment_duration")]
    pub segment_duration: u32,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_playlist_file_name")]
    pub playlist_file_name: String,
}

fn default_segment_duration() -> u32 {
    DEFAULT_SEGMENT_DURATION
}

fn default_protocol() -> String {
    "hls".to_string()
}

fn default_playlist_file_name() -> String {
    DEFAULT_PLAYLIST_FILE_NAME.to_string()
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            segment_duration: DEFAULT_SEGMENT_DURATION,
            protocol: default_protocol(),
            playlist_file_name: default_playlist_file_name(),
        }
    }
}

impl StreamingParams {
    /// Playlist path with its extension removed (e.g. `hls/index`).
    pub fn playlist_base_name(&self) -> &str {
        strip_extension(&self.playlist_file_name)
    }
}

/// One desired rendition of a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Output {
    pub file_name: String,
    pub preset: PresetMap,
}

impl Output {
    pub fn new(file_name: impl Into<String>, preset: PresetMap) -> Self {
        Self {
            file_name: file_name.into(),
            preset,
        }
    }

    /// File name without its extension, used as the output name modifier.
    pub fn name_modifier(&self) -> &str {
        strip_extension(&self.file_name)
    }

    /// File extension without the leading dot, empty when there is none.
    pub fn extension(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(idx) if idx > 0 && !self.file_name[idx..].contains('/') => {
                &self.file_name[idx + 1..]
            }
            _ => "",
        }
    }
}

/// Canonical preset name plus the identifier each provider stores it under.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PresetMap {
    pub name: String,
    #[serde(default)]
    pub provider_mapping: BTreeMap<String, String>,
}

impl PresetMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_mapping: BTreeMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>, id: impl Into<String>) -> Self {
        self.provider_mapping.insert(provider.into(), id.into());
        self
    }

    pub fn provider_preset(&self, provider: &str) -> Option<&str> {
        self.provider_mapping
            .get(provider)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && !name[idx..].contains('/') => &name[..idx],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_parts() {
        let output = Output::new("video_720p.mp4", PresetMap::new("720p"));
        assert_eq!(output.name_modifier(), "video_720p");
        assert_eq!(output.extension(), "mp4");
    }

    #[test]
    fn test_output_name_without_extension() {
        let output = Output::new("thumbnail", PresetMap::new("thumbs"));
        assert_eq!(output.name_modifier(), "thumbnail");
        assert_eq!(output.extension(), "");
    }

    #[test]
    fn test_output_name_with_dotted_directory() {
        let output = Output::new("v1.0/rendition", PresetMap::new("x"));
        assert_eq!(output.name_modifier(), "v1.0/rendition");
        assert_eq!(output.extension(), "");
    }

    #[test]
    fn test_playlist_base_name() {
        let params = StreamingParams::default();
        assert_eq!(params.playlist_base_name(), "hls/index");
        assert_eq!(params.segment_duration, 6);
    }

    #[test]
    fn test_preset_map_lookup_ignores_empty_ids() {
        let map = PresetMap::new("720p")
            .with_provider("mediaconvert", "720p-mc")
            .with_provider("bitmovin", "");
        assert_eq!(map.provider_preset("mediaconvert"), Some("720p-mc"));
        assert_eq!(map.provider_preset("bitmovin"), None);
        assert_eq!(map.provider_preset("other"), None);
    }

    #[test]
    fn test_job_deserializes_with_defaults() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "source_media": "s3://bucket/in.mov",
            "outputs": [
                {"file_name": "a.mp4", "preset": {"name": "720p", "provider_mapping": {"mediaconvert": "p1"}}}
            ]
        }))
        .unwrap();

        assert!(job.remote_id().is_err());
        assert_eq!(job.queue_priority, 0);
        assert_eq!(job.streaming_params, StreamingParams::default());
        assert_eq!(job.outputs[0].preset.provider_preset("mediaconvert"), Some("p1"));
    }

    #[test]
    fn test_remote_id_requires_provider_job_id() {
        let mut job: Job = serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "source_media": "s3://bucket/in.mov",
            "outputs": []
        }))
        .unwrap();

        let err = job.remote_id().unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidField { field: "provider_job_id", .. }
        ));

        job.provider_job_id = Some("  ".to_string());
        assert!(job.remote_id().is_err());

        job.provider_job_id = Some("1600000000000-abc".to_string());
        assert_eq!(job.remote_id().unwrap(), "1600000000000-abc");
    }
}
