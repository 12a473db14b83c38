use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;
use crate::models::VisualRequest;

pub const OUTPUT_WIDTH: u32 = 1024;
pub const OUTPUT_HEIGHT: u32 = 1024;
/// Seed value the vendor reads as "pick one at random".
pub const RANDOM_SEED: i64 = -1;
pub const IMAGE_NUM: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Portrait,
    Meme,
    /// Main photo plus a style reference upload.
    Style,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub prompt: &'static str,
    pub strength: f64,
}

/// Ordered by [`Mode::index`].
static PRESETS: [(Mode, Preset); 3] = [
    (
        Mode::Portrait,
        Preset {
            prompt: "Professional human portrait photography, high-end studio quality, \
                     preserve facial features and identity completely, natural skin texture with subtle retouching, \
                     professional studio lighting, cinematic color grading, beautiful bokeh background, \
                     fashion magazine style, 8k resolution, extremely detailed, masterpiece quality",
            strength: 0.45,
        },
    ),
    (
        Mode::Meme,
        Preset {
            prompt: "Funny meme style picture of the same person, exaggerated expressive face, \
                     bold cartoon outlines, vivid saturated colors, comic sticker look, \
                     keep the person recognizable, clean plain background, high quality",
            strength: 0.6,
        },
    ),
    (
        Mode::Style,
        Preset {
            prompt: "Portrait photo of a young woman, \
                     sweet and cute style, soft natural lighting, \
                     gentle smile, big eyes, fresh makeup, \
                     pastel pink or cream white dress, flowing long hair, \
                     cherry blossom trees/cozy cafe/park lawn background, \
                     shallow depth of field, bokeh effect, warm tones, \
                     high quality, professional photography, 85mm lens, f/1.8 aperture, \
                     cinematic color grading",
            strength: 0.45,
        },
    ),
];

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Portrait, Mode::Meme, Mode::Style];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Portrait => "portrait",
            Mode::Meme => "meme",
            Mode::Style => "style",
        }
    }

    fn index(&self) -> usize {
        match self {
            Mode::Portrait => 0,
            Mode::Meme => 1,
            Mode::Style => 2,
        }
    }

    pub fn preset(&self) -> Preset {
        PRESETS[self.index()].1
    }

    pub fn needs_style_image(&self) -> bool {
        matches!(self, Mode::Style)
    }

    /// Picks the mode for a request: an explicit `mode` field wins, otherwise a
    /// style upload implies `style`, otherwise `portrait`.
    pub fn resolve(explicit: Option<&str>, has_style_image: bool) -> Result<Mode, RelayError> {
        match explicit.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => raw.parse(),
            None if has_style_image => Ok(Mode::Style),
            None => Ok(Mode::Portrait),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<&str> = Mode::ALL.iter().map(Mode::as_str).collect();
                RelayError::ValidationError(format!(
                    "Unsupported mode '{}'. Allowed modes: {}",
                    s.trim(),
                    allowed.join(", ")
                ))
            })
    }
}

/// Everything needed to ask the vendor for one image.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub mode: Mode,
    pub prompt: String,
    pub strength: f64,
    pub width: u32,
    pub height: u32,
    pub seed: i64,
    #[serde(skip)]
    pub images: Vec<String>,
}

impl GenerationRequest {
    pub fn new(mode: Mode, main_image_base64: String) -> Self {
        let preset = mode.preset();
        Self {
            mode,
            prompt: preset.prompt.to_string(),
            strength: preset.strength,
            width: OUTPUT_WIDTH,
            height: OUTPUT_HEIGHT,
            seed: RANDOM_SEED,
            images: vec![main_image_base64],
        }
    }

    pub fn into_visual_request(self, req_key: &str) -> VisualRequest {
        VisualRequest {
            req_key: req_key.to_string(),
            prompt: self.prompt,
            binary_data_base64: self.images,
            image_num: IMAGE_NUM,
            strength: self.strength,
            seed: self.seed,
            width: self.width,
            height: self.height,
        }
    }
}
