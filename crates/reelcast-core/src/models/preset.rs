use serde::{Deserialize, Serialize};

/// Canonical encode settings.
///
/// Numeric values are kept as strings and only parsed when a provider
/// translates the preset, so a preset can be stored before any backend has
/// validated it. Exactly one of `video` and `thumbnail` should be set; when
/// both are, the video settings win.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `mp4`, `m3u8` or `none`
    #[serde(default)]
    pub container: String,
    /// `cbr`, `vbr` or `qvbr`; empty means constant bitrate
    #[serde(default)]
    pub rate_control: String,
    #[serde(default)]
    pub two_pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoPreset>,
    #[serde(default)]
    pub audio: AudioPreset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ThumbnailPreset>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoPreset {
    pub codec: String,
    pub profile: String,
    pub profile_level: String,
    pub width: String,
    pub height: String,
    pub bitrate: String,
    pub gop_size: String,
    pub gop_mode: String,
    pub interlace_mode: String,
}

/// Audio settings; an empty codec means the rendition carries no audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioPreset {
    pub codec: String,
    pub bitrate: String,
}

impl AudioPreset {
    pub fn is_empty(&self) -> bool {
        self.codec.trim().is_empty()
    }
}

/// Frame capture settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThumbnailPreset {
    pub width: String,
    pub height: String,
    pub framerate_numerator: String,
    pub framerate_denominator: String,
    pub quality: String,
    pub max_captures: String,
}

/// The single encode target a preset describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodeTarget<'a> {
    Video(&'a VideoPreset, &'a AudioPreset),
    Thumbnail(&'a ThumbnailPreset),
}

impl Preset {
    pub fn encode_target(&self) -> Option<EncodeTarget<'_>> {
        match (&self.video, &self.thumbnail) {
            (Some(video), _) => Some(EncodeTarget::Video(video, &self.audio)),
            (None, Some(thumbnail)) => Some(EncodeTarget::Thumbnail(thumbnail)),
            (None, None) => None,
        }
    }
}
