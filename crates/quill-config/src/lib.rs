//! Quill configuration system
//!
//! Loads text and layout settings from `quill.toml`, with `QUILL_*`
//! environment variables taking precedence.

use std::path::{Path, PathBuf};

use quill_text::{
    FontError, FontId, FontService, HorizontalAlignment, Layout, LayoutEngine, PointSize26Dot6,
    SystemFontClient, TextController, VerticalAlignment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "quill.toml";

/// Errors that can occur while loading configuration or the fonts it names.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Font(#[from] FontError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Font and style settings
    pub text: TextConfig,
    /// Layout engine settings
    pub layout: LayoutConfig,
}

/// Font and style configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Family of the default font; the system sans-serif face when unset
    pub font_family: Option<String>,
    /// Extra font file (.ttf/.otf/.ttc) registered before fonts are looked up
    pub font_file: Option<PathBuf>,
    /// Default text size in points
    pub point_size: f32,
    /// Screen resolution used to convert points to pixels
    pub dpi: f32,
    pub underline: bool,
    /// Underline thickness in pixels; the font's value when zero
    pub underline_height: f32,
}

/// Layout engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wrap lines at word boundaries and new lines
    pub multi_line: bool,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    /// Cut text that does not fit and end it with an ellipsis
    pub ellipsis: bool,
    /// Room reserved for the cursor at the end of each line, in pixels
    pub cursor_width: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: None,
            font_file: None,
            point_size: 12.0,
            dpi: 96.0,
            underline: false,
            underline_height: 0.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            multi_line: false,
            horizontal_alignment: HorizontalAlignment::Begin,
            vertical_alignment: VerticalAlignment::Top,
            ellipsis: false,
            cursor_width: 1.0,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn parse_horizontal(value: &str) -> Option<HorizontalAlignment> {
    match value.to_ascii_lowercase().as_str() {
        "begin" => Some(HorizontalAlignment::Begin),
        "center" => Some(HorizontalAlignment::Center),
        "end" => Some(HorizontalAlignment::End),
        _ => None,
    }
}

fn parse_vertical(value: &str) -> Option<VerticalAlignment> {
    match value.to_ascii_lowercase().as_str() {
        "top" => Some(VerticalAlignment::Top),
        "center" => Some(VerticalAlignment::Center),
        "bottom" => Some(VerticalAlignment::Bottom),
        _ => None,
    }
}

impl QuillConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    /// Load `quill.toml` from the current directory, or the defaults if it
    /// is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                warn!(%err, "ignoring {CONFIG_FILE}");
                Self::default()
            }
        }
    }

    /// Merge configuration with `QUILL_*` environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|name| std::env::var(name).ok());
    }

    /// Merge values looked up by variable name. Unparsable values are
    /// ignored.
    pub fn merge_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Text settings
        if let Some(family) = var("QUILL_FONT_FAMILY") {
            self.text.font_family = Some(family);
        }
        if let Some(path) = var("QUILL_FONT_FILE") {
            self.text.font_file = Some(PathBuf::from(path));
        }
        if let Some(size) = var("QUILL_POINT_SIZE").and_then(|v| v.parse().ok()) {
            self.text.point_size = size;
        }
        if let Some(dpi) = var("QUILL_DPI").and_then(|v| v.parse().ok()) {
            self.text.dpi = dpi;
        }
        if let Some(val) = var("QUILL_UNDERLINE") {
            self.text.underline = parse_bool(&val);
        }

        // Layout settings
        if let Some(val) = var("QUILL_MULTI_LINE") {
            self.layout.multi_line = parse_bool(&val);
        }
        if let Some(val) = var("QUILL_ELLIPSIS") {
            self.layout.ellipsis = parse_bool(&val);
        }
        if let Some(alignment) = var("QUILL_HORIZONTAL_ALIGNMENT").and_then(|v| parse_horizontal(&v)) {
            self.layout.horizontal_alignment = alignment;
        }
        if let Some(alignment) = var("QUILL_VERTICAL_ALIGNMENT").and_then(|v| parse_vertical(&v)) {
            self.layout.vertical_alignment = alignment;
        }
        if let Some(width) = var("QUILL_CURSOR_WIDTH").and_then(|v| v.parse().ok()) {
            self.layout.cursor_width = width;
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Default point size in 26.6 fixed point.
    pub fn point_size_26dot6(&self) -> PointSize26Dot6 {
        (self.text.point_size.max(0.0) * 64.0).round() as PointSize26Dot6
    }

    /// A layout engine with the configured options.
    pub fn layout_engine(&self) -> LayoutEngine {
        let mut engine = LayoutEngine::new();
        engine.set_layout(if self.layout.multi_line {
            Layout::MultiLineBox
        } else {
            Layout::SingleLineBox
        });
        engine.set_horizontal_alignment(self.layout.horizontal_alignment);
        engine.set_vertical_alignment(self.layout.vertical_alignment);
        engine.set_text_ellipsis_enabled(self.layout.ellipsis);
        engine.set_cursor_width(self.layout.cursor_width);
        engine
    }

    /// Apply layout and underline settings to a controller.
    pub fn configure(&self, controller: &mut TextController) {
        controller.set_layout_engine(self.layout_engine());
        controller.set_underline_enabled(self.text.underline);
        controller.set_underline_height(self.text.underline_height);
    }

    /// Open the system fonts with the configured DPI and extra font file,
    /// and resolve the default font.
    pub fn font_client(&self) -> Result<(SystemFontClient, FontId)> {
        let mut client = SystemFontClient::new();
        client.set_dpi(self.text.dpi);

        if let Some(path) = &self.text.font_file {
            client.load_font_data(std::fs::read(path)?);
        }

        let point_size = self.point_size_26dot6();
        let font_id = match &self.text.font_family {
            Some(family) => client.font_for_family(family, point_size)?,
            None => client.find_default_font('a', point_size, false),
        };
        debug!(font_id, point_size, "default font");
        Ok((client, font_id))
    }
}
