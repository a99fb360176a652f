//! Canonical preset -> MediaConvert preset settings, and back

use reelcast_core::models::{AudioPreset, EncodeTarget, Preset, ThumbnailPreset, VideoPreset};
use reelcast_core::{ProviderError, ProviderResult};

use super::types::{
    AacSettings, AudioCodec, AudioCodecSettings, AudioDescription, ContainerSettings,
    ContainerType, FrameCaptureSettings, GopSizeUnits, H264CodecProfile, H264Settings,
    H265CodecProfile, H265Settings, InterlaceMode, PresetSettings, QualityTuningLevel,
    RateControlMode, VideoCodec, VideoCodecSettings, VideoDescription,
};
use crate::provider::{PresetDetails, ThumbnailPresetDetails, VideoPresetDetails};

const AAC_CODING_MODE: &str = "CODING_MODE_2_0";
const AAC_SAMPLE_RATE: i64 = 48_000;
const CODEC_LEVEL_AUTO: &str = "AUTO";

const H264_LEVELS: &[(&str, &str)] = &[
    ("1", "LEVEL_1"),
    ("1.1", "LEVEL_1_1"),
    ("1.2", "LEVEL_1_2"),
    ("1.3", "LEVEL_1_3"),
    ("2", "LEVEL_2"),
    ("2.1", "LEVEL_2_1"),
    ("2.2", "LEVEL_2_2"),
    ("3", "LEVEL_3"),
    ("3.1", "LEVEL_3_1"),
    ("3.2", "LEVEL_3_2"),
    ("4", "LEVEL_4"),
    ("4.1", "LEVEL_4_1"),
    ("4.2", "LEVEL_4_2"),
    ("5", "LEVEL_5"),
    ("5.1", "LEVEL_5_1"),
    ("5.2", "LEVEL_5_2"),
];

const H265_LEVELS: &[(&str, &str)] = &[
    ("1", "LEVEL_1"),
    ("2", "LEVEL_2"),
    ("2.1", "LEVEL_2_1"),
    ("3", "LEVEL_3"),
    ("3.1", "LEVEL_3_1"),
    ("4", "LEVEL_4"),
    ("4.1", "LEVEL_4_1"),
    ("5", "LEVEL_5"),
    ("5.1", "LEVEL_5_1"),
    ("5.2", "LEVEL_5_2"),
    ("6", "LEVEL_6"),
    ("6.1", "LEVEL_6_1"),
    ("6.2", "LEVEL_6_2"),
];

/// Translate a canonical preset into MediaConvert preset settings.
///
/// Pure: no remote call is made, and any failure leaves nothing behind on
/// the service.
pub fn preset_settings(preset: &Preset) -> ProviderResult<PresetSettings> {
    let target = preset
        .encode_target()
        .ok_or(ProviderError::MissingEncodeSettings)?;

    match target {
        EncodeTarget::Video(video, audio) => Ok(PresetSettings {
            container_settings: ContainerSettings {
                container: container_type(&preset.container)?,
            },
            video_description: Some(video_description(preset, video)?),
            audio_descriptions: audio_descriptions(audio)?,
        }),
        EncodeTarget::Thumbnail(thumbnail) => {
            let container = if preset.container.trim().is_empty() {
                ContainerType::Raw
            } else {
                container_type(&preset.container)?
            };
            Ok(PresetSettings {
                container_settings: ContainerSettings { container },
                video_description: Some(thumbnail_description(thumbnail)?),
                audio_descriptions: Vec::new(),
            })
        }
    }
}

/// Map a canonical container name onto the MediaConvert container.
pub fn container_type(container: &str) -> ProviderResult<ContainerType> {
    match container.trim().to_ascii_lowercase().as_str() {
        "mp4" => Ok(ContainerType::Mp4),
        "m3u8" => Ok(ContainerType::M3u8),
        "none" => Ok(ContainerType::Raw),
        _ => Err(ProviderError::UnsupportedContainer(container.to_string())),
    }
}

/// Canonical container name for a MediaConvert container.
pub fn canonical_container(container: &ContainerType) -> &str {
    match container {
        ContainerType::Mp4 => "mp4",
        ContainerType::M3u8 => "m3u8",
        ContainerType::Raw => "none",
        ContainerType::Other(other) => other,
    }
}

fn video_description(preset: &Preset, video: &VideoPreset) -> ProviderResult<VideoDescription> {
    let rate_control = rate_control_mode(&preset.rate_control)?;
    let bitrate = parse_int("video bitrate", &video.bitrate)?;
    // QVBR takes a ceiling instead of a target bitrate.
    let (bitrate, max_bitrate) = match rate_control {
        RateControlMode::Qvbr => (None, bitrate),
        _ => (bitrate, None),
    };
    let gop_size = parse_float("gop size", &video.gop_size)?;
    let gop_size_units = match gop_size {
        Some(_) => Some(gop_units(&video.gop_mode)?),
        None => None,
    };
    let interlace_mode = interlace_mode(&video.interlace_mode)?;
    let quality_tuning_level = if preset.two_pass {
        QualityTuningLevel::MultiPassHq
    } else {
        QualityTuningLevel::SinglePass
    };

    let codec_settings = match video.codec.trim().to_ascii_lowercase().as_str() {
        "" | "h264" => VideoCodecSettings {
            codec: VideoCodec::H264,
            h264_settings: Some(H264Settings {
                rate_control_mode: rate_control,
                bitrate,
                max_bitrate,
                codec_profile: h264_profile(&video.profile)?,
                codec_level: codec_level(H264_LEVELS, &video.profile_level)?,
                gop_size,
                gop_size_units,
                interlace_mode,
                quality_tuning_level,
            }),
            h265_settings: None,
            frame_capture_settings: None,
        },
        "h265" | "hevc" => VideoCodecSettings {
            codec: VideoCodec::H265,
            h264_settings: None,
            h265_settings: Some(H265Settings {
                rate_control_mode: rate_control,
                bitrate,
                max_bitrate,
                codec_profile: h265_profile(&video.profile)?,
                codec_level: codec_level(H265_LEVELS, &video.profile_level)?,
                gop_size,
                gop_size_units,
                interlace_mode,
                quality_tuning_level,
            }),
            frame_capture_settings: None,
        },
        _ => return Err(ProviderError::unsupported("video codec", &video.codec)),
    };

    Ok(VideoDescription {
        width: parse_int("video width", &video.width)?,
        height: parse_int("video height", &video.height)?,
        codec_settings,
    })
}

fn thumbnail_description(thumbnail: &ThumbnailPreset) -> ProviderResult<VideoDescription> {
    Ok(VideoDescription {
        width: parse_int("thumbnail width", &thumbnail.width)?,
        height: parse_int("thumbnail height", &thumbnail.height)?,
        codec_settings: VideoCodecSettings {
            codec: VideoCodec::FrameCapture,
            h264_settings: None,
            h265_settings: None,
            frame_capture_settings: Some(FrameCaptureSettings {
                framerate_numerator: required_int(
                    "thumbnail framerate numerator",
                    &thumbnail.framerate_numerator,
                )?,
                framerate_denominator: required_int(
                    "thumbnail framerate denominator",
                    &thumbnail.framerate_denominator,
                )?,
                max_captures: required_int("thumbnail max captures", &thumbnail.max_captures)?,
                quality: required_int("thumbnail quality", &thumbnail.quality)?,
            }),
        },
    })
}

fn audio_descriptions(audio: &AudioPreset) -> ProviderResult<Vec<AudioDescription>> {
    if audio.is_empty() {
        return Ok(Vec::new());
    }

    match audio.codec.trim().to_ascii_lowercase().as_str() {
        "aac" => Ok(vec![AudioDescription {
            codec_settings: AudioCodecSettings {
                codec: AudioCodec::Aac,
                aac_settings: Some(AacSettings {
                    bitrate: parse_int("audio bitrate", &audio.bitrate)?,
                    coding_mode: AAC_CODING_MODE.to_string(),
                    sample_rate: AAC_SAMPLE_RATE,
                }),
            },
        }]),
        _ => Err(ProviderError::unsupported("audio codec", &audio.codec)),
    }
}

fn rate_control_mode(value: &str) -> ProviderResult<RateControlMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "cbr" => Ok(RateControlMode::Cbr),
        "vbr" => Ok(RateControlMode::Vbr),
        "qvbr" => Ok(RateControlMode::Qvbr),
        _ => Err(ProviderError::unsupported("rate control", value)),
    }
}

fn h264_profile(value: &str) -> ProviderResult<H264CodecProfile> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "high" => Ok(H264CodecProfile::High),
        "main" => Ok(H264CodecProfile::Main),
        "baseline" => Ok(H264CodecProfile::Baseline),
        "high10" => Ok(H264CodecProfile::High10Bit),
        "high422" => Ok(H264CodecProfile::High422),
        _ => Err(ProviderError::unsupported("h264 profile", value)),
    }
}

fn h265_profile(value: &str) -> ProviderResult<H265CodecProfile> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "high" | "main-high" => Ok(H265CodecProfile::MainHigh),
        "main" => Ok(H265CodecProfile::MainMain),
        "main10" => Ok(H265CodecProfile::Main10Main),
        "main10-high" => Ok(H265CodecProfile::Main10High),
        _ => Err(ProviderError::unsupported("h265 profile", value)),
    }
}

fn codec_level(table: &[(&str, &str)], value: &str) -> ProviderResult<String> {
    let level = value.trim();
    if level.is_empty() || level.eq_ignore_ascii_case("auto") {
        return Ok(CODEC_LEVEL_AUTO.to_string());
    }

    table
        .iter()
        .find(|(canonical, _)| *canonical == level)
        .map(|(_, wire)| wire.to_string())
        .ok_or_else(|| ProviderError::unsupported("profile level", value))
}

fn gop_units(value: &str) -> ProviderResult<GopSizeUnits> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "frames" => Ok(GopSizeUnits::Frames),
        "seconds" => Ok(GopSizeUnits::Seconds),
        _ => Err(ProviderError::unsupported("gop mode", value)),
    }
}

fn interlace_mode(value: &str) -> ProviderResult<InterlaceMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "progressive" => Ok(InterlaceMode::Progressive),
        "top-field" | "top" => Ok(InterlaceMode::TopField),
        "bottom-field" | "bottom" => Ok(InterlaceMode::BottomField),
        "follow-top-field" => Ok(InterlaceMode::FollowTopField),
        "follow-bottom-field" => Ok(InterlaceMode::FollowBottomField),
        _ => Err(ProviderError::unsupported("interlace mode", value)),
    }
}

/// Empty means "let the service decide".
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

/// Summarize a stored MediaConvert preset.
pub fn preset_details(preset: &super::types::Preset) -> ProviderResult<PresetDetails> {
    let settings = &preset.settings;
    let description = preset.description.clone().unwrap_or_default();
    let container = canonical_container(settings.container()).to_string();
    let video = settings.video_description.as_ref().ok_or_else(|| {
        ProviderError::inconsistent(
            format!("fetching preset {}", preset.name),
            "preset has no video description",
        )
    })?;
    let codec = &video.codec_settings;

    if let Some(capture) = &codec.frame_capture_settings {
        return Ok(PresetDetails::Thumbnail(ThumbnailPresetDetails {
            id: preset.name.clone(),
            description,
            container,
            width: video.width,
            height: video.height,
            framerate_numerator: capture.framerate_numerator,
            framerate_denominator: capture.framerate_denominator,
            max_captures: capture.max_captures,
            quality: capture.quality,
        }));
    }

    let (video_codec, bitrate, two_pass) = match (&codec.h264_settings, &codec.h265_settings) {
        (Some(h264), _) => (
            "h264",
            h264.bitrate.or(h264.max_bitrate),
            h264.quality_tuning_level == QualityTuningLevel::MultiPassHq,
        ),
        (None, Some(h265)) => (
            "h265",
            h265.bitrate.or(h265.max_bitrate),
            h265.quality_tuning_level == QualityTuningLevel::MultiPassHq,
        ),
        (None, None) => ("unknown", None, false),
    };

    let audio = settings
        .audio_descriptions
        .first()
        .map(|audio| &audio.codec_settings);

    Ok(PresetDetails::Video(VideoPresetDetails {
        id: preset.name.clone(),
        description,
        container,
        video_codec: video_codec.to_string(),
        width: video.width,
        height: video.height,
        bitrate,
        audio_codec: audio.map(|audio| match audio.codec {
            AudioCodec::Aac => "aac".to_string(),
            AudioCodec::Other => "other".to_string(),
        }),
        audio_bitrate: audio
            .and_then(|audio| audio.aac_settings.as_ref())
            .and_then(|aac| aac.bitrate),
        two_pass,
    }))
}
