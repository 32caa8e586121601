use crate::error::{NinePatchError, NinePatchResult};

/// Straight-alpha RGBA8 color value.
///
/// Channels are stored as `u8`, so the [0,255] range invariant is carried by
/// the type; every lossy constructor rounds half-up and clamps on the way in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

/// A color as it appears in configuration: a packed `0xRRGGBBAA` integer, a
/// textual form (`#RRGGBBAA`, `rgb(...)`, `rgba(...)`), or a channel array.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Packed big-endian `0xRRGGBBAA`.
    Packed(u32),
    /// Hex or `rgb()/rgba()` string.
    Text(String),
    /// 0-4 channel values, backfilled to RGBA.
    Channels(Vec<f64>),
}

/// Round half-up, then clamp into [0,255]. Non-finite input clamps to 0.
pub fn clamp_channel(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}

impl Color {
    /// Construct from already-clamped channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Unpack big-endian `0xRRGGBBAA`.
    pub const fn from_packed(value: u32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Build a color from up to four channel values.
    ///
    /// Missing or non-finite entries default per the backfill rule: 0 for
    /// R/G/B, 255 for alpha. More than four entries is a format error.
    pub fn from_channels(channels: &[f64]) -> NinePatchResult<Self> {
        if channels.len() > 4 {
            return Err(NinePatchError::format(format!(
                "unsupported color format: {} channels (expected at most 4)",
                channels.len()
            )));
        }
        let defaults = [0.0, 0.0, 0.0, 255.0];
        let mut out = [0u8; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            let v = channels.get(i).copied().filter(|v| v.is_finite());
            *slot = clamp_channel(v.unwrap_or(defaults[i]));
        }
        Ok(Self::new(out[0], out[1], out[2], out[3]))
    }

    /// Parse any supported configuration encoding into a color.
    pub fn parse(value: &ColorValue) -> NinePatchResult<Self> {
        match value {
            ColorValue::Packed(v) => Ok(Self::from_packed(*v)),
            ColorValue::Text(s) => Self::parse_str(s),
            ColorValue::Channels(c) => Self::from_channels(c),
        }
    }

    /// Parse a textual color: `#RRGGBBAA` (short forms backfilled), a `0x`
    /// hex literal string, or `rgb(...)`/`rgba(...)`.
    pub fn parse_str(input: &str) -> NinePatchResult<Self> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            parse_hex_pairs(hex, input)
        } else if let Some(hex) = trimmed.strip_prefix("0x") {
            parse_hex_pairs(hex, input)
        } else if trimmed.starts_with("rgb") {
            parse_rgb_args(trimmed, input)
        } else {
            Err(unsupported(input))
        }
    }

    /// Channel-wise saturating add. Additive compositing for stacking
    /// stretch/highlight marks, not alpha blending.
    pub fn merge(self, other: Self) -> Self {
        Self {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
            a: self.a.saturating_add(other.a),
        }
    }

    /// Porter-Duff "over" compositing of an ordered layer sequence,
    /// first = bottom. Returns `None` for an empty sequence.
    ///
    /// A layer with zero alpha leaves the accumulator unchanged; a layer
    /// over a zero-alpha accumulator passes through as-is.
    pub fn blend<I>(layers: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut iter = layers.into_iter();
        let first = iter.next()?;
        let mut rgb = [
            f64::from(first.r),
            f64::from(first.g),
            f64::from(first.b),
        ];
        let mut alpha = f64::from(first.a) / 255.0;

        for src in iter {
            let src_a = f64::from(src.a) / 255.0;
            if src_a == 0.0 {
                continue;
            }
            let src_rgb = [f64::from(src.r), f64::from(src.g), f64::from(src.b)];
            if alpha == 0.0 {
                rgb = src_rgb;
                alpha = src_a;
                continue;
            }
            let out_a = 1.0 - (1.0 - src_a) * (1.0 - alpha);
            for (c, s) in rgb.iter_mut().zip(src_rgb) {
                *c = (s * src_a + *c * alpha * (1.0 - src_a)) / out_a;
            }
            alpha = out_a;
        }

        Some(Self {
            r: clamp_channel(rgb[0]),
            g: clamp_channel(rgb[1]),
            b: clamp_channel(rgb[2]),
            a: clamp_channel(alpha * 255.0),
        })
    }

    /// Copy of this color with the alpha replaced (clamped/rounded).
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: clamp_channel(alpha),
            ..self
        }
    }

    /// Pack big-endian into `0xRRGGBBAA`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Format as `#rrggbbaa`, each channel zero-padded to two digits.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Channels as an `[r, g, b, a]` array.
    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn unsupported(input: &str) -> NinePatchError {
    NinePatchError::format(format!("unsupported color format: '{input}'"))
}

/// Split a hex body into byte pairs and backfill short forms.
fn parse_hex_pairs(hex: &str, input: &str) -> NinePatchResult<Color> {
    if hex.is_empty() || hex.len() % 2 != 0 || hex.len() > 8 {
        return Err(unsupported(input));
    }
    let mut channels = Vec::with_capacity(4);
    for pair in hex.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(pair).map_err(|_| unsupported(input))?;
        let byte = u8::from_str_radix(pair, 16).map_err(|_| unsupported(input))?;
        channels.push(f64::from(byte));
    }
    Color::from_channels(&channels).map_err(|_| unsupported(input))
}

/// Parse `rgb(...)`/`rgba(...)` with 1-4 comma-separated numeric arguments.
fn parse_rgb_args(trimmed: &str, input: &str) -> NinePatchResult<Color> {
    let rest = trimmed
        .strip_prefix("rgba")
        .or_else(|| trimmed.strip_prefix("rgb"))
        .map(str::trim);
    let Some(rest) = rest else {
        return Err(unsupported(input));
    };
    let body = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| unsupported(input))?;

    let mut channels = Vec::with_capacity(4);
    for arg in body.split(',') {
        let value: f64 = arg.trim().parse().map_err(|_| unsupported(input))?;
        channels.push(value);
    }
    Color::from_channels(&channels).map_err(|_| unsupported(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(s: &str) -> Color {
        Color::parse(&ColorValue::Text(s.to_string())).unwrap()
    }

    #[test]
    fn parses_packed_integers() {
        assert_eq!(Color::from_packed(0x01020304).channels(), [1, 2, 3, 4]);
        assert_eq!(Color::from_packed(0xFF020304).channels(), [255, 2, 3, 4]);
        assert_eq!(Color::from_packed(0x00010203).channels(), [0, 1, 2, 3]);
        assert_eq!(Color::from_packed(0x01020300).channels(), [1, 2, 3, 0]);
    }

    #[test]
    fn parses_hex() {
        assert_eq!(parse_text("#01020304").channels(), [1, 2, 3, 4]);
        assert_eq!(parse_text("0x01020304").channels(), [1, 2, 3, 4]);
    }

    #[test]
    fn backfills_short_hex() {
        assert_eq!(parse_text("#01").channels(), [1, 0, 0, 255]);
        assert_eq!(parse_text("#0102").channels(), [1, 2, 0, 255]);
        assert_eq!(parse_text("#010203").channels(), [1, 2, 3, 255]);
    }

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(parse_text("rgb(1,2,3)").channels(), [1, 2, 3, 255]);
        assert_eq!(parse_text("rgb ( 1 , 2 , 3 ) ").channels(), [1, 2, 3, 255]);
        assert_eq!(parse_text("rgba(1,2,3,4)").channels(), [1, 2, 3, 4]);
        assert_eq!(parse_text("rgba ( 1 , 2 , 3 , 4 ) ").channels(), [1, 2, 3, 4]);
    }

    #[test]
    fn backfills_short_rgb() {
        assert_eq!(parse_text("rgb(1)").channels(), [1, 0, 0, 255]);
        assert_eq!(parse_text("rgb(1,2)").channels(), [1, 2, 0, 255]);
        assert_eq!(parse_text("rgba(1,2)").channels(), [1, 2, 0, 255]);
        assert_eq!(parse_text("rgba(1,2,3)").channels(), [1, 2, 3, 255]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Color::parse_str("rgb(1,2").is_err());
        assert!(Color::parse_str("rgb(1,x)").is_err());
        assert!(Color::parse_str("#012").is_err());
        assert!(Color::parse_str("#0102030405").is_err());
        assert!(Color::parse_str("blue").is_err());
        assert!(Color::from_channels(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
    }

    #[test]
    fn error_names_the_input() {
        let err = Color::parse_str("rgb(1,2").unwrap_err();
        assert!(err.to_string().contains("rgb(1,2"));
    }

    #[test]
    fn channel_constructor_clamps_and_rounds() {
        let hot = Color::from_channels(&[500.0, 500.0, 500.0, 500.0]).unwrap();
        assert_eq!(hot.channels(), [255, 255, 255, 255]);
        let cold = Color::from_channels(&[-500.0, -500.0, -500.0, -500.0]).unwrap();
        assert_eq!(cold.channels(), [0, 0, 0, 0]);
        let frac = Color::from_channels(&[0.5, 1.4, 2.6, 3.5]).unwrap();
        assert_eq!(frac.channels(), [1, 1, 3, 4]);
    }

    #[test]
    fn non_finite_channels_backfill() {
        let c = Color::from_channels(&[f64::NAN, 2.0, 3.0, f64::NAN]).unwrap();
        assert_eq!(c.channels(), [0, 2, 3, 255]);
    }

    #[test]
    fn merge_is_additive_then_clamped() {
        let a = Color::new(1, 2, 3, 4);
        let b = Color::new(10, 20, 30, 40);
        assert_eq!(a.merge(b).channels(), [11, 22, 33, 44]);

        let hot = Color::new(200, 200, 200, 200);
        assert_eq!(hot.merge(hot).channels(), [255, 255, 255, 255]);
    }

    #[test]
    fn blend_single_opaque_layer_is_identity() {
        let c = Color::new(12, 34, 56, 255);
        assert_eq!(Color::blend([c]), Some(c));
    }

    #[test]
    fn blend_opaque_top_layer_wins() {
        let bottom = Color::new(200, 0, 0, 255);
        let top = Color::new(0, 200, 0, 255);
        assert_eq!(Color::blend([bottom, top]), Some(top));
    }

    #[test]
    fn blend_transparent_layer_is_noop() {
        let bottom = Color::new(10, 20, 30, 128);
        let clear = Color::transparent();
        assert_eq!(Color::blend([bottom, clear]), Some(bottom));
        assert_eq!(Color::blend([clear, bottom]), Some(bottom));
    }

    #[test]
    fn blend_half_over_opaque_mixes() {
        let bottom = Color::new(0, 0, 0, 255);
        let top = Color::new(255, 255, 255, 128);
        let out = Color::blend([bottom, top]).unwrap();
        assert_eq!(out.a, 255);
        // 255 * (128/255) ~= 128 against a black base
        assert_eq!(out.r, 128);
        assert_eq!(out.g, 128);
        assert_eq!(out.b, 128);
    }

    #[test]
    fn blend_empty_is_none() {
        assert_eq!(Color::blend(std::iter::empty()), None);
    }

    #[test]
    fn hex_roundtrip() {
        for packed in [0x01020304u32, 0xFF00FF80, 0x00000000, 0xFFFFFFFF] {
            let c = Color::from_packed(packed);
            assert_eq!(parse_text(&c.to_hex()).to_u32(), packed);
        }
    }
}
