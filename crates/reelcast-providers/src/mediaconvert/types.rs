//! MediaConvert REST wire types (API version 2017-08-29)
//!
//! Only the fields this crate reads or writes are modelled. Enumerations the
//! service may extend carry an `Other` catch-all so that reading back a preset
//! or job created elsewhere does not fail on an unknown value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresetRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub settings: PresetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetResponse {
    pub preset: Preset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    pub settings: PresetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetSettings {
    pub container_settings: ContainerSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_description: Option<VideoDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_descriptions: Vec<AudioDescription>,
}

impl PresetSettings {
    pub fn container(&self) -> &ContainerType {
        &self.container_settings.container
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSettings {
    pub container: ContainerType,
}

/// Output container. Kept open since MediaConvert supports more containers
/// than this crate produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerType {
    Mp4,
    M3u8,
    Raw,
    Other(String),
}

impl ContainerType {
    pub fn as_str(&self) -> &str {
        match self {
            ContainerType::Mp4 => "MP4",
            ContainerType::M3u8 => "M3U8",
            ContainerType::Raw => "RAW",
            ContainerType::Other(value) => value,
        }
    }
}

impl From<String> for ContainerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MP4" => ContainerType::Mp4,
            "M3U8" => ContainerType::M3u8,
            "RAW" => ContainerType::Raw,
            _ => ContainerType::Other(value),
        }
    }
}

impl From<ContainerType> for String {
    fn from(value: ContainerType) -> Self {
        value.as_str().to_string()
    }
}

impl Display for ContainerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    pub codec_settings: VideoCodecSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoCodecSettings {
    pub codec: VideoCodec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h264_settings: Option<H264Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h265_settings: Option<H265Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_capture_settings: Option<FrameCaptureSettings>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VideoCodec {
    #[serde(rename = "H_264")]
    H264,
    #[serde(rename = "H_265")]
    H265,
    #[serde(rename = "FRAME_CAPTURE")]
    FrameCapture,
    #[serde(other, rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateControlMode {
    Cbr,
    Vbr,
    Qvbr,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GopSizeUnits {
    Frames,
    Seconds,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterlaceMode {
    Progressive,
    TopField,
    BottomField,
    FollowTopField,
    FollowBottomField,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTuningLevel {
    SinglePass,
    SinglePassHq,
    MultiPassHq,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum H264CodecProfile {
    #[serde(rename = "BASELINE")]
    Baseline,
    #[serde(rename = "MAIN")]
    Main,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "HIGH_10BIT")]
    High10Bit,
    #[serde(rename = "HIGH_422")]
    High422,
    #[serde(other, rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum H265CodecProfile {
    #[serde(rename = "MAIN_MAIN")]
    MainMain,
    #[serde(rename = "MAIN_HIGH")]
    MainHigh,
    #[serde(rename = "MAIN10_MAIN")]
    Main10Main,
    #[serde(rename = "MAIN10_HIGH")]
    Main10High,
    #[serde(other, rename = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct H264Settings {
    pub rate_control_mode: RateControlMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<i64>,
    pub codec_profile: H264CodecProfile,
    /// `AUTO` or `LEVEL_<major>[_<minor>]`
    pub codec_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop_size_units: Option<GopSizeUnits>,
    pub interlace_mode: InterlaceMode,
    pub quality_tuning_level: QualityTuningLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct H265Settings {
    pub rate_control_mode: RateControlMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<i64>,
    pub codec_profile: H265CodecProfile,
    pub codec_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop_size_units: Option<GopSizeUnits>,
    pub interlace_mode: InterlaceMode,
    pub quality_tuning_level: QualityTuningLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameCaptureSettings {
    pub framerate_numerator: i64,
    pub framerate_denominator: i64,
    pub max_captures: i64,
    pub quality: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioDescription {
    pub codec_settings: AudioCodecSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioCodecSettings {
    pub codec: AudioCodec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aac_settings: Option<AacSettings>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioCodec {
    Aac,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AacSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    pub coding_mode: String,
    pub sample_rate: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub role: String,
    pub queue: String,
    pub priority: i32,
    pub settings: JobSettings,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSettings {
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub output_groups: Vec<OutputGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub file_input: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub audio_selectors: BTreeMap<String, AudioSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecode_source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioSelector {
    pub default_selection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub output_group_settings: OutputGroupSettings,
    #[serde(default)]
    pub outputs: Vec<JobOutput>,
}

impl OutputGroup {
    /// Destination prefix of the group, whatever its type.
    pub fn destination(&self) -> Option<&str> {
        let settings = &self.output_group_settings;
        settings
            .hls_group_settings
            .as_ref()
            .map(|hls| hls.destination.as_str())
            .or_else(|| {
                settings
                    .file_group_settings
                    .as_ref()
                    .map(|file| file.destination.as_str())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputGroupSettings {
    #[serde(rename = "type")]
    pub group_type: OutputGroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hls_group_settings: Option<HlsGroupSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_group_settings: Option<FileGroupSettings>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputGroupType {
    HlsGroupSettings,
    FileGroupSettings,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HlsGroupSettings {
    pub destination: String,
    pub segment_length: i64,
    pub min_segment_length: i64,
    pub directory_structure: HlsDirectoryStructure,
    pub manifest_duration_format: HlsManifestDurationFormat,
    pub segment_control: HlsSegmentControl,
    pub output_selection: HlsOutputSelection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsDirectoryStructure {
    SingleDirectory,
    SubdirectoryPerStream,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsManifestDurationFormat {
    Integer,
    FloatingPoint,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsSegmentControl {
    SegmentedFiles,
    SingleFile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HlsOutputSelection {
    ManifestsAndSegments,
    SegmentsOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileGroupSettings {
    pub destination: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_percent_complete: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<JobSettings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_group_details: Vec<OutputGroupDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputGroupDetail {
    #[serde(default)]
    pub output_details: Vec<OutputDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_details: Option<VideoDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    #[serde(default)]
    pub width_in_px: i64,
    #[serde(default)]
    pub height_in_px: i64,
}
