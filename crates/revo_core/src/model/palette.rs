//! Emotion colors and wave palettes.
//!
//! Colors are `#RRGGBB` strings so render hosts can pass them straight to
//! their drawing layer.

use crate::model::item::Emotion;

const FALLBACK_COLOR: Rgb = Rgb::new(0xFE, 0xD0, 0x46);
const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);
const HAPPY_WAVE_COLORS: [Rgb; 4] = [
    Rgb::new(0xFF, 0xD6, 0x30),
    Rgb::new(0xAF, 0xA6, 0x80),
    Rgb::new(0xC7, 0xB4, 0x68),
    Rgb::new(0xDF, 0xC3, 0x50),
];
const GRAY_BLEND_STEPS: [f32; 5] = [0.0, 0.15, 0.30, 0.45, 0.0];

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear per-channel blend toward `other`; `amount` is clamped to `0..=1`.
    pub fn blend(self, other: Rgb, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| -> u8 {
            let value = f32::from(from) * (1.0 - amount) + f32::from(to) * amount;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

/// Base display color for one emotion.
pub fn emotion_color(emotion: Emotion) -> Rgb {
    match emotion {
        Emotion::Happy => Rgb::new(0xFE, 0xD0, 0x46),
        Emotion::Sadness => Rgb::new(0x47, 0xAF, 0xF4),
        Emotion::Surprise => Rgb::new(0xF9, 0x98, 0x41),
        Emotion::Excitement => Rgb::new(0xEE, 0x47, 0xCA),
        Emotion::Anger => Rgb::new(0xEE, 0x49, 0x47),
        Emotion::Normal => Rgb::new(0x5C, 0xC4, 0x63),
        Emotion::Confusion => FALLBACK_COLOR,
    }
}

/// Wave fill colors an item of `emotion` can be drawn with.
///
/// Happy entries use a dedicated warm palette; every other emotion uses its
/// base color blended with 15/30/45% gray, bracketed by the base color.
pub fn wave_palette(emotion: Emotion) -> Vec<Rgb> {
    if emotion == Emotion::Happy {
        return HAPPY_WAVE_COLORS.to_vec();
    }
    let base = emotion_color(emotion);
    GRAY_BLEND_STEPS
        .iter()
        .map(|amount| base.blend(GRAY, *amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{emotion_color, wave_palette, Rgb};
    use crate::model::item::Emotion;

    #[test]
    fn parse_hex_accepts_hash_prefix_and_rejects_garbage() {
        assert_eq!(Rgb::parse_hex("#47AFF4"), Some(Rgb::new(0x47, 0xAF, 0xF4)));
        assert_eq!(Rgb::parse_hex("5cc463"), Some(Rgb::new(0x5C, 0xC4, 0x63)));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn blend_with_gray_moves_each_channel_linearly() {
        let blended = Rgb::new(0, 0, 255).blend(Rgb::new(128, 128, 128), 0.5);
        assert_eq!(blended, Rgb::new(64, 64, 192));
        assert_eq!(emotion_color(Emotion::Anger).to_hex(), "#ee4947");
    }

    #[test]
    fn happy_palette_has_four_colors() {
        let palette = wave_palette(Emotion::Happy);
        assert_eq!(palette.len(), 4);
        assert_eq!(palette[0].to_hex(), "#ffd630");
    }

    #[test]
    fn other_palettes_bracket_gray_blends_with_base_color() {
        let palette = wave_palette(Emotion::Sadness);
        let base = emotion_color(Emotion::Sadness);
        assert_eq!(palette.len(), 5);
        assert_eq!(palette[0], base);
        assert_eq!(palette[4], base);
        assert_ne!(palette[1], base);
        assert_ne!(palette[3], palette[1]);
    }
}
