//! Construction options shared by balls, groups and pools.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_NUM_BALLS: usize = 7;
pub const DEFAULT_MIN_SIZE: f32 = 150.0;
pub const DEFAULT_MAX_SIZE: f32 = 300.0;
pub const DEFAULT_BLUR: &str = "30px";
pub const DEFAULT_TRANSFER_INTERVAL_MS: u64 = 5000;

/// Root font size used to resolve `em`/`rem` blur lengths.
const ROOT_FONT_PX: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
}

impl LengthUnit {
    fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Percent => "%",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
        }
    }
}

/// A CSS length such as `30px`, passed through to the renderer as a blur radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// Absolute pixel value, when the unit does not depend on the viewport.
    pub fn as_px(&self) -> Option<f32> {
        match self.unit {
            LengthUnit::Px => Some(self.value),
            LengthUnit::Em | LengthUnit::Rem => Some(self.value * ROOT_FONT_PX),
            LengthUnit::Percent | LengthUnit::Vw | LengthUnit::Vh => None,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::px(30.0)
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(trimmed.len());
        let (number, suffix) = trimmed.split_at(split);
        let value: f32 = number
            .parse()
            .map_err(|_| Error::InvalidLength(s.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidLength(s.to_string()));
        }
        let unit = match suffix.trim() {
            "px" => LengthUnit::Px,
            // Unitless zero is valid CSS.
            "" if value == 0.0 => LengthUnit::Px,
            "em" => LengthUnit::Em,
            "rem" => LengthUnit::Rem,
            "%" => LengthUnit::Percent,
            "vw" => LengthUnit::Vw,
            "vh" => LengthUnit::Vh,
            _ => return Err(Error::InvalidLength(s.to_string())),
        };
        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Length {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Options consumed by a single [`Ball`](crate::Ball).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallOptions {
    pub min_size: f32,
    pub max_size: f32,
    pub blur: Length,
}

impl Default for BallOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            blur: Length::default(),
        }
    }
}

impl BallOptions {
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_size, self.max_size);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(Error::InvalidSizeRange { min, max });
        }
        Ok(())
    }
}

/// Options shared by every group of a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundOptions {
    pub num_balls: usize,
    #[serde(flatten)]
    pub ball: BallOptions,
    /// Milliseconds between transfer ticks.
    #[serde(rename = "transferInterval")]
    pub transfer_interval_ms: u64,
    /// Fixed RNG seed for reproducible layouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            num_balls: DEFAULT_NUM_BALLS,
            ball: BallOptions::default(),
            transfer_interval_ms: DEFAULT_TRANSFER_INTERVAL_MS,
            seed: None,
        }
    }
}

impl BackgroundOptions {
    pub fn transfer_interval(&self) -> Duration {
        Duration::from_millis(self.transfer_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.ball.validate()?;
        if self.transfer_interval_ms == 0 {
            return Err(Error::ZeroInterval);
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: Self = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!("loading background options from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }
}
