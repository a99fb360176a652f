//! Bitmovin encoding API wire types
//!
//! Every successful response wraps its payload as `{"data": {"result": ...}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: ResponseData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData<T> {
    pub result: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse<T> {
    #[serde(default)]
    pub total_count: Option<i64>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Resource reference returned by create calls and used by delete/stop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BitmovinResponse {
    pub id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileH264 {
    Baseline,
    Main,
    High,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct H264VideoConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bitrate: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileH264>,
    /// `"1"`, `"1b"`, `"1.1"` ... `"5.2"`; absent means automatic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bitrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bufsize: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gop: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_keyframe_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<PresetCustomData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AacAudioConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub bitrate: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// Canonical preset fields Bitmovin has no slot for, stored on the video
/// configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetCustomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub container: String,
    #[serde(default)]
    pub two_pass: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomDataEnvelope {
    #[serde(default)]
    pub custom_data: PresetCustomData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bucket_name: String,
    pub access_key: String,
    pub secret_key: String,
    pub cloud_region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub host: String,
}

/// Source media location, by input type.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    S3(S3Input),
    Http(HttpInput),
    Https(HttpInput),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bucket_name: String,
    pub access_key: String,
    pub secret_key: String,
    pub cloud_region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub cloud_region: String,
    #[serde(default)]
    pub encoder_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamInput {
    pub input_id: String,
    pub input_path: String,
    pub selection_mode: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub codec_config_id: String,
    pub input_streams: Vec<StreamInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuxingStream {
    pub stream_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    pub permission: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncodingOutput {
    pub output_id: String,
    pub output_path: String,
    #[serde(default)]
    pub acl: Vec<AclEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mp4Muxing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub streams: Vec<MuxingStream>,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fmp4Muxing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub segment_length: f64,
    pub segment_naming: String,
    pub init_segment_name: String,
    #[serde(default)]
    pub streams: Vec<MuxingStream>,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HlsManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub manifest_name: String,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioMediaInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub group_id: String,
    pub language: String,
    pub segment_path: String,
    pub uri: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub closed_captions: String,
    pub segment_path: String,
    pub uri: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestResource {
    pub manifest_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncodingMode {
    Standard,
    TwoPass,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartEncodingRequest {
    pub encoding_mode: EncodingMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vod_hls_manifests: Vec<ManifestResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: String,
}

/// Status of an encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mp4MuxingInformation {
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub container_format: Option<String>,
    #[serde(default)]
    pub video_tracks: Vec<MuxingVideoTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuxingVideoTrack {
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub frame_width: Option<i64>,
    #[serde(default)]
    pub frame_height: Option<i64>,
}
