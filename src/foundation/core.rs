use crate::foundation::error::{TickdownError, TickdownResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// One of the five overlay elements.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementId {
    /// Progress ring.
    Ring,
    /// Numeric countdown digits.
    Countdown,
    /// Status line (start / motivational / end message).
    Status,
    /// Custom caption.
    Custom,
    /// Step and percentage readout.
    Percentage,
}

impl ElementId {
    /// All elements in paint order (back to front).
    pub const ALL: [ElementId; 5] = [
        ElementId::Ring,
        ElementId::Countdown,
        ElementId::Percentage,
        ElementId::Status,
        ElementId::Custom,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Countdown => "countdown",
            Self::Status => "status",
            Self::Custom => "custom",
            Self::Percentage => "percentage",
        }
    }

    /// Layout size estimate in canvas pixels at scale 1.
    ///
    /// Hosts do not report measured bounds back, so alignment and cropping work against these.
    pub fn size_estimate(self) -> Vec2 {
        match self {
            Self::Ring => Vec2::new(300.0, 300.0),
            Self::Countdown => Vec2::new(200.0, 120.0),
            Self::Status | Self::Custom => Vec2::new(240.0, 80.0),
            Self::Percentage => Vec2::new(180.0, 60.0),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementId {
    type Err = TickdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ring" => Ok(Self::Ring),
            "countdown" => Ok(Self::Countdown),
            "status" => Ok(Self::Status),
            "custom" => Ok(Self::Custom),
            "percentage" => Ok(Self::Percentage),
            other => Err(TickdownError::validation(format!(
                "unknown element id '{other}'"
            ))),
        }
    }
}

/// Straight-alpha RGBA8 color. Serialized as a `#rrggbb` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> TickdownResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let digit = |c: u8| -> TickdownResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| TickdownError::validation(format!("invalid hex color '{s}'")))
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = digit(bytes[0])?;
                let g = digit(bytes[1])?;
                let b = digit(bytes[2])?;
                Ok(Self::opaque(r * 17, g * 17, b * 17))
            }
            6 => {
                let pair = |i: usize| -> TickdownResult<u8> {
                    Ok(digit(bytes[i])? * 16 + digit(bytes[i + 1])?)
                };
                Ok(Self::opaque(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(TickdownError::validation(format!(
                "invalid hex color '{s}'"
            ))),
        }
    }

    /// `#rrggbb` form (alpha dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear mix toward `other`; `t = 0` keeps `self`, `t = 1` yields `other`.
    pub fn mix(self, other: Rgba8, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        };
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba8::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
