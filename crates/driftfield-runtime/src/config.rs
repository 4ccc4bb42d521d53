use std::path::Path;
use std::time::Duration;

use driftfield_core::{BackgroundOptions, BallOptions, Length};
use driftfield_platform::Result;
use driftfield_ui::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl ContainerConfig {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Static layout of the page widgets the host drives alongside the balls.
///
/// Spans are in document coordinates; the host shifts them by the scroll
/// offset before each timeline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// One category per project card, in page order.
    pub card_categories: Vec<String>,
    pub productions: usize,
    pub carousel_items: usize,
    pub viewport_height: f32,
    pub timeline: Span,
    pub timeline_items: Vec<Span>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            card_categories: Vec::new(),
            productions: 0,
            carousel_items: 0,
            viewport_height: 900.0,
            timeline: Span::default(),
            timeline_items: Vec::new(),
        }
    }
}

/// Host settings plus the options handed to the ball pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub containers: Vec<ContainerConfig>,
    pub frame_rate_hz: u32,
    /// Stop after this many milliseconds; run until killed when absent.
    pub run_for_ms: Option<u64>,
    /// Keep balls hidden until the pointer enters their container.
    pub hover_reveal: bool,
    pub background: BackgroundOptions,
    pub page: PageConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            containers: vec![
                ContainerConfig::new("hero", 1920.0, 1080.0),
                ContainerConfig::new("skills", 1920.0, 900.0),
            ],
            frame_rate_hz: 60,
            run_for_ms: None,
            hover_reveal: false,
            background: BackgroundOptions {
                num_balls: 20,
                ball: BallOptions {
                    min_size: 100.0,
                    max_size: 250.0,
                    blur: Length::px(30.0),
                },
                transfer_interval_ms: 7000,
                seed: None,
            },
            page: PageConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.background.validate()?;
        if config.frame_rate_hz == 0 {
            return Err("frame_rate_hz must be greater than zero".into());
        }
        let viewport = config.page.viewport_height;
        if !viewport.is_finite() || viewport <= 0.0 {
            return Err("page.viewport_height must be positive".into());
        }
        Ok(config)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate_hz.max(1)
    }

    pub fn run_for(&self) -> Option<Duration> {
        self.run_for_ms.map(Duration::from_millis)
    }
}
