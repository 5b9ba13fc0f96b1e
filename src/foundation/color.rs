use serde::{Deserialize, Serialize};

/// Opaque 8-bit RGB color used for caption fill and stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Fully opaque RGBA8 (identical in straight and premultiplied form).
    pub fn to_opaque_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(serde::de::Error::custom(
                    "rgb array must have exactly 3 components ([r,g,b])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb8, String> {
    let hex = s.trim().trim_start_matches('#');
    let expand = |c: u8| -> Result<u8, String> {
        let v = (c as char)
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit in color '{s}'"))?;
        Ok((v * 17) as u8)
    };
    match hex.len() {
        3 => {
            let b = hex.as_bytes();
            Ok(Rgb8::new(expand(b[0])?, expand(b[1])?, expand(b[2])?))
        }
        6 => {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| format!("invalid hex color '{s}'"))
            };
            Ok(Rgb8::new(channel(0)?, channel(2)?, channel(4)?))
        }
        _ => Err(format!(
            "hex color '{s}' must look like #rgb or #rrggbb"
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
