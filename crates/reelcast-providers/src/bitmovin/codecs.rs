//! Canonical preset <-> Bitmovin codec configurations
//!
//! A canonical preset is stored as an H.264 video configuration plus an
//! optional AAC audio configuration. The container, the two-pass flag and the
//! audio configuration ID ride along in the video configuration's custom data.

use reelcast_core::models::{AudioPreset, EncodeTarget, Preset, VideoPreset};
use reelcast_core::{ProviderError, ProviderResult};

use super::types::{AacAudioConfiguration, H264VideoConfiguration, PresetCustomData, ProfileH264};
use crate::provider::VideoPresetDetails;

const AAC_SAMPLE_RATE: f64 = 48_000.0;
const DEFAULT_AAC_BITRATE: i64 = 128_000;

const H264_LEVELS: &[&str] = &[
    "1", "1b", "1.1", "1.2", "1.3", "2", "2.1", "2.2", "3", "3.1", "3.2", "4", "4.1", "4.2", "5",
    "5.1", "5.2",
];

/// Output container, as far as Bitmovin muxing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Mp4,
    M3u8,
}

impl Container {
    pub fn parse(value: &str) -> ProviderResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "m3u8" => Ok(Container::M3u8),
            _ => Err(ProviderError::UnsupportedContainer(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::M3u8 => "m3u8",
        }
    }
}

/// Codec configurations to create for one preset.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfigurations {
    pub video: H264VideoConfiguration,
    pub audio: Option<AacAudioConfiguration>,
}

/// Translate a canonical preset. Pure; nothing is created remotely.
///
/// The returned video configuration carries custom data without an audio ID;
/// the caller fills it in once the audio configuration exists.
pub fn codec_configurations(preset: &Preset) -> ProviderResult<CodecConfigurations> {
    let (video, audio) = match preset.encode_target() {
        Some(EncodeTarget::Video(video, audio)) => (video, audio),
        Some(EncodeTarget::Thumbnail(_)) => {
            return Err(ProviderError::unsupported("preset type", "thumbnail"))
        }
        None => return Err(ProviderError::MissingEncodeSettings),
    };

    let container = Container::parse(&preset.container)?;
    let video = h264_configuration(preset, video, container)?;
    let audio = aac_configuration(&preset.name, audio)?;

    Ok(CodecConfigurations { video, audio })
}

fn h264_configuration(
    preset: &Preset,
    video: &VideoPreset,
    container: Container,
) -> ProviderResult<H264VideoConfiguration> {
    match video.codec.trim().to_ascii_lowercase().as_str() {
        "" | "h264" => {}
        _ => return Err(ProviderError::unsupported("video codec", &video.codec)),
    }

    let bitrate = required_int("video bitrate", &video.bitrate)?;
    let (min_bitrate, max_bitrate, bufsize) = match preset.rate_control.trim().to_ascii_lowercase().as_str() {
        "" | "cbr" => (Some(bitrate), Some(bitrate), Some(bitrate)),
        "vbr" => (None, None, None),
        _ => return Err(ProviderError::unsupported("rate control", &preset.rate_control)),
    };

    let gop = parse_int("gop size", &video.gop_size)?;
    let (max_gop, max_keyframe_interval) = match video.gop_mode.trim().to_ascii_lowercase().as_str() {
        "" | "frames" => (gop, None),
        "seconds" => (None, parse_float("gop size", &video.gop_size)?),
        _ => return Err(ProviderError::unsupported("gop mode", &video.gop_mode)),
    };

    match video.interlace_mode.trim().to_ascii_lowercase().as_str() {
        "" | "progressive" => {}
        _ => return Err(ProviderError::unsupported("interlace mode", &video.interlace_mode)),
    }

    Ok(H264VideoConfiguration {
        id: None,
        name: preset.name.clone(),
        description: Some(preset.description.clone()).filter(|d| !d.is_empty()),
        bitrate,
        width: parse_int("video width", &video.width)?,
        height: parse_int("video height", &video.height)?,
        profile: Some(profile(&video.profile)?),
        level: level(&video.profile_level)?,
        min_bitrate,
        max_bitrate,
        bufsize,
        max_gop,
        max_keyframe_interval,
        custom_data: Some(PresetCustomData {
            audio: None,
            container: container.as_str().to_string(),
            two_pass: preset.two_pass,
        }),
    })
}

fn aac_configuration(
    name: &str,
    audio: &AudioPreset,
) -> ProviderResult<Option<AacAudioConfiguration>> {
    if audio.is_empty() {
        return Ok(None);
    }

    match audio.codec.trim().to_ascii_lowercase().as_str() {
        "aac" => Ok(Some(AacAudioConfiguration {
            id: None,
            name: format!("{}-audio", name),
            bitrate: parse_int("audio bitrate", &audio.bitrate)?.unwrap_or(DEFAULT_AAC_BITRATE),
            rate: Some(AAC_SAMPLE_RATE),
        })),
        _ => Err(ProviderError::unsupported("audio codec", &audio.codec)),
    }
}

fn profile(value: &str) -> ProviderResult<ProfileH264> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "high" => Ok(ProfileH264::High),
        "main" => Ok(ProfileH264::Main),
        "baseline" => Ok(ProfileH264::Baseline),
        _ => Err(ProviderError::unsupported("h264 profile", value)),
    }
}

fn level(value: &str) -> ProviderResult<Option<String>> {
    let level = value.trim();
    if level.is_empty() || level.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    H264_LEVELS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(level))
        .map(|known| Some(known.to_string()))
        .ok_or_else(|| ProviderError::unsupported("profile level", value))
}

fn parse_int(field: &'static str, value: &str) -> ProviderResult<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ProviderError::invalid_field(field, value, "integer"))
}

fn required_int(field: &'static str, value: &str) -> ProviderResult<i64> {
    parse_int(field, value)?.ok_or_else(|| ProviderError::invalid_field(field, value, "integer"))
}

fn parse_float(field: &'static str, value: &str) -> ProviderResult<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ProviderError::invalid_field(field, value, "number"))
}

/// Summarize a stored preset from its configurations.
pub fn preset_details(
    id: &str,
    video: &H264VideoConfiguration,
    custom_data: &PresetCustomData,
    audio: Option<&AacAudioConfiguration>,
) -> VideoPresetDetails {
    VideoPresetDetails {
        id: id.to_string(),
        description: video.description.clone().unwrap_or_default(),
        container: custom_data.container.clone(),
        video_codec: "h264".to_string(),
        width: video.width,
        height: video.height,
        bitrate: Some(video.bitrate),
        audio_codec: audio.map(|_| "aac".to_string()),
        audio_bitrate: audio.map(|a| a.bitrate),
        two_pass: custom_data.two_pass,
    }
}
