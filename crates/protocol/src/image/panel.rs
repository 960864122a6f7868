//! Display panel geometry.
//!
//! Images are stored one bit per pixel, line by line, so a full frame occupies
//! `width / 8 * height` bytes.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// E-paper panels the controller firmware can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Panel {
    /// 1.44" panel, 128 x 96.
    #[serde(rename = "1.44")]
    Epd144,
    /// 2.0" panel, 200 x 96.
    #[serde(rename = "2.0", alias = "2")]
    Epd200,
    /// 2.7" panel, 264 x 176.
    #[serde(rename = "2.7")]
    Epd270,
}

impl Panel {
    /// Every supported panel.
    pub const ALL: [Self; 3] = [Self::Epd144, Self::Epd200, Self::Epd270];

    /// Dots per line.
    pub const fn width(self) -> usize {
        match self {
            Self::Epd144 => 128,
            Self::Epd200 => 200,
            Self::Epd270 => 264,
        }
    }

    /// Lines per frame.
    pub const fn height(self) -> usize {
        match self {
            Self::Epd144 | Self::Epd200 => 96,
            Self::Epd270 => 176,
        }
    }

    /// Bytes in one packed line.
    pub const fn bytes_per_line(self) -> usize {
        self.width() / 8
    }

    /// Bytes in one full frame.
    pub const fn image_bytes(self) -> usize {
        self.bytes_per_line() * self.height()
    }

    /// Diagonal label as written on the panel (`"2.7"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Epd144 => "1.44",
            Self::Epd200 => "2.0",
            Self::Epd270 => "2.7",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\" ({}x{})", self.label(), self.width(), self.height())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('"') {
            "1.44" => Ok(Self::Epd144),
            "2" | "2.0" => Ok(Self::Epd200),
            "2.7" => Ok(Self::Epd270),
            other => Err(format!(
                "unknown panel '{other}' (expected one of 1.44, 2.0, 2.7)"
            )),
        }
    }
}
