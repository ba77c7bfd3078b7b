//! Viewer configuration.
//!
//! The configuration is plain serde data so a page can embed it as JSON. Every
//! field has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, ViewerError};
use crate::keybindings::KeyBindings;

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Same as [`Self::to_level_filter`] but as a `log::Level`.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Inclusive scale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl ScaleLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Widen the lower bound so `baseline` is reachable.
    ///
    /// A very large image can fit the screen only below the configured
    /// minimum; in that case the fit scale becomes the effective minimum.
    pub fn admitting(&self, baseline: f64) -> ScaleLimits {
        ScaleLimits::new(self.min.min(baseline), self.max)
    }
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self::new(constants::FIT_MIN_SCALE, constants::MAX_SCALE)
    }
}

/// What "unzoomed" means for reset and double-activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// Reset always returns to this scale
    Fixed { scale: f64 },
    /// Reset recomputes the scale that fits the loaded image on screen
    #[default]
    FitToScreen,
}

/// Multiplicative zoom steps per input source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSteps {
    pub wheel_in: f64,
    pub wheel_out: f64,
    pub button_in: f64,
    pub button_out: f64,
    pub double_activate: f64,
}

impl Default for ZoomSteps {
    fn default() -> Self {
        Self {
            wheel_in: constants::WHEEL_ZOOM_IN,
            wheel_out: constants::WHEEL_ZOOM_OUT,
            button_in: constants::BUTTON_ZOOM_IN,
            button_out: constants::BUTTON_ZOOM_OUT,
            double_activate: constants::DOUBLE_ACTIVATE_ZOOM,
        }
    }
}

/// Gesture timing and distance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub double_tap_window_ms: u64,
    pub tap_move_threshold: f64,
    pub tap_max_duration_ms: u64,
    pub key_pan_step: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: constants::DOUBLE_TAP_WINDOW_MS,
            tap_move_threshold: constants::TAP_MOVE_THRESHOLD,
            tap_max_duration_ms: constants::TAP_MAX_DURATION_MS,
            key_pan_step: constants::KEY_PAN_STEP,
        }
    }
}

/// Complete viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Version of the configuration format
    pub version: u32,
    pub limits: ScaleLimits,
    pub baseline: BaselinePolicy,
    pub steps: ZoomSteps,
    pub gestures: GestureConfig,
    /// Viewports at or below this width fit the image width
    pub narrow_breakpoint: f64,
    pub keybindings: KeyBindings,
    /// CSS selector for images that open the viewer
    pub activation_selector: String,
    /// Teardown fallback when the fade-out never reports completion
    pub close_fallback_ms: u32,
    pub log_level: LogLevel,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            limits: ScaleLimits::default(),
            baseline: BaselinePolicy::FitToScreen,
            steps: ZoomSteps::default(),
            gestures: GestureConfig::default(),
            narrow_breakpoint: constants::NARROW_BREAKPOINT,
            keybindings: KeyBindings::default(),
            activation_selector: ".blog-content img, .project-content img".to_string(),
            close_fallback_ms: 400,
            log_level: LogLevel::default(),
        }
    }
}

impl ViewerConfig {
    /// Fixed-baseline variant: scale 1 is neutral and the floor.
    pub fn classic() -> Self {
        Self {
            limits: ScaleLimits::new(constants::CLASSIC_MIN_SCALE, constants::MAX_SCALE),
            baseline: BaselinePolicy::Fixed { scale: 1.0 },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ViewerError::InvalidConfig {
                    message: format!("{name} must be a positive number, got {value}"),
                })
            }
        }

        if self.version > CONFIG_VERSION {
            return Err(ViewerError::InvalidConfig {
                message: format!(
                    "config version {} is newer than supported version {}",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        positive("limits.min", self.limits.min)?;
        positive("limits.max", self.limits.max)?;
        if self.limits.min > self.limits.max {
            return Err(ViewerError::InvalidConfig {
                message: format!(
                    "limits.min ({}) exceeds limits.max ({})",
                    self.limits.min, self.limits.max
                ),
            });
        }

        if let BaselinePolicy::Fixed { scale } = self.baseline {
            positive("baseline.scale", scale)?;
        }

        positive("steps.wheel_in", self.steps.wheel_in)?;
        positive("steps.wheel_out", self.steps.wheel_out)?;
        positive("steps.button_in", self.steps.button_in)?;
        positive("steps.button_out", self.steps.button_out)?;
        positive("steps.double_activate", self.steps.double_activate)?;
        positive("gestures.key_pan_step", self.gestures.key_pan_step)?;

        if !(self.gestures.tap_move_threshold.is_finite() && self.gestures.tap_move_threshold >= 0.0) {
            return Err(ViewerError::InvalidConfig {
                message: "gestures.tap_move_threshold must be finite and non-negative".to_string(),
            });
        }

        Ok(())
    }
}
