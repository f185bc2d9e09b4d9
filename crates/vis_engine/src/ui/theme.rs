//! UI theme configuration
//!
//! Widget colors and sizing load from TOML, with a compiled-in default
//! for hosts that don't ship a theme file. All sizes are in UI units
//! (the canvas is 100 units wide).

use serde::Deserialize;
use thiserror::Error;

use crate::foundation::Color;

/// Result type for theme loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a theme
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source failed to parse or deserialize
    #[error("failed to parse theme: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Colors for one widget across its interaction states
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StateColors {
    /// Resting color
    pub normal: Color,
    /// Pointer over the widget
    pub hover: Color,
    /// Press in progress
    pub pressed: Color,
    /// Widget disabled
    pub inactive: Color,
}

impl StateColors {
    /// Pick the color for the current interaction state
    pub fn get(&self, hovered: bool, pressed: bool, enabled: bool) -> Color {
        if !enabled {
            self.inactive
        } else if pressed {
            self.pressed
        } else if hovered {
            self.hover
        } else {
            self.normal
        }
    }
}

impl Default for StateColors {
    fn default() -> Self {
        Self {
            normal: Color::new(0.2, 0.2, 0.2, 1.0),
            hover: Color::new(0.3, 0.3, 0.3, 1.0),
            pressed: Color::new(0.15, 0.15, 0.15, 1.0),
            inactive: Color::new(0.2, 0.2, 0.2, 0.5),
        }
    }
}

/// Button appearance
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ButtonTheme {
    /// Background fill per state
    pub background: StateColors,
    /// Label color per state
    pub text: StateColors,
    /// Label font size, UI units
    pub font_size: f32,
    /// Horizontal/vertical padding for fit-to-text sizing, as a
    /// multiple of the label size
    pub padding_scale: [f32; 2],
}

impl Default for ButtonTheme {
    fn default() -> Self {
        Self {
            background: StateColors::default(),
            text: StateColors {
                normal: Color::WHITE,
                hover: Color::WHITE,
                pressed: Color::new(0.8, 0.8, 0.8, 1.0),
                inactive: Color::GREY,
            },
            font_size: 2.0,
            padding_scale: [1.4, 1.6],
        }
    }
}

/// Input-field appearance
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InputFieldTheme {
    /// Background fill when unfocused
    pub background: Color,
    /// Background fill when focused
    pub focused_background: Color,
    /// Text color
    pub text_color: Color,
    /// Placeholder/hint text color
    pub hint_color: Color,
    /// Caret color
    pub caret_color: Color,
    /// Font size, UI units
    pub font_size: f32,
    /// Inner padding between the field edge and the text, UI units
    pub padding: f32,
}

impl Default for InputFieldTheme {
    fn default() -> Self {
        Self {
            background: Color::new(0.12, 0.12, 0.12, 1.0),
            focused_background: Color::new(0.18, 0.18, 0.18, 1.0),
            text_color: Color::WHITE,
            hint_color: Color::GREY,
            caret_color: Color::WHITE,
            font_size: 2.0,
            padding: 0.5,
        }
    }
}

/// Scrollbar/slider/picker accents
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AccentTheme {
    /// Track/background fill
    pub track: Color,
    /// Thumb/handle fill per state
    pub handle: StateColors,
}

impl Default for AccentTheme {
    fn default() -> Self {
        Self {
            track: Color::new(0.1, 0.1, 0.1, 1.0),
            handle: StateColors {
                normal: Color::new(0.45, 0.45, 0.45, 1.0),
                hover: Color::new(0.55, 0.55, 0.55, 1.0),
                pressed: Color::new(0.7, 0.7, 0.7, 1.0),
                inactive: Color::GREY,
            },
        }
    }
}

/// Complete widget theme
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct UiTheme {
    /// Button appearance
    pub button: ButtonTheme,
    /// Input-field appearance
    pub input_field: InputFieldTheme,
    /// Scrollbar and slider appearance
    pub accent: AccentTheme,
}

impl UiTheme {
    /// Load a theme from TOML source. Missing keys fall back to the
    /// compiled-in defaults.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] when the source is not valid TOML or a
    /// value has the wrong shape.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let theme = toml::from_str(source)?;
        log::debug!("ui theme loaded from TOML");
        Ok(theme)
    }
}
