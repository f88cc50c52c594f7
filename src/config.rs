//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sunwheel/sunwheel.toml`
//! 3. Local config: explicit `--config` path, else `./.sunwheel.toml`
//! 4. Environment variables: `SUNWHEEL_*` prefix, `__` between nested keys

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::scale::WheelGeometry;
use crate::application::timeline::Easing;
use crate::application::{ApplicationError, ApplicationResult, HighlightMode, OpacityLevels};
use crate::domain::coloring::default_reserved_colors;
use crate::domain::{
    ColorScheme, DomainError, LabelColoring, Lab, Rgb, DEFAULT_DEPTH_CUTOFF, DEFAULT_WORD_SEPARATOR,
};

const APP_NAME: &str = "sunwheel";
const ENV_PREFIX: &str = "SUNWHEEL";

/// Unified configuration for sunwheel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Leaf coloring policy
    pub color_scheme: ColorScheme,
    pub label_coloring: LabelColoring,
    pub zoom_duration_ms: u64,
    pub highlight_duration_ms: u64,
    /// `C` in the leaf weight `max(0, C - depth)`
    pub wedge_width_depth_cutoff: f64,
    /// Name of the synthetic root above the top-level keys
    pub root_name: String,
    /// Splits node names into two label lines
    pub word_separator: char,
    /// Highlight mode used on hover-enter
    pub hover_mode: HighlightMode,
    pub easing: Easing,
    pub geometry: WheelGeometry,
    pub opacity: OpacityLevels,
    /// Name -> hex color overriding every scheme
    pub reserved_colors: BTreeMap<String, String>,
    /// First tooltip row label, e.g. "Language" or "Watershed"
    pub subject_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::default(),
            label_coloring: LabelColoring::default(),
            zoom_duration_ms: 1000,
            highlight_duration_ms: 250,
            wedge_width_depth_cutoff: DEFAULT_DEPTH_CUTOFF,
            root_name: "Root".into(),
            word_separator: DEFAULT_WORD_SEPARATOR,
            hover_mode: HighlightMode::default(),
            easing: Easing::default(),
            geometry: WheelGeometry::default(),
            opacity: OpacityLevels::default(),
            reserved_colors: default_reserved_colors(),
            subject_label: "Language".into(),
        }
    }
}

/// Raw geometry table; `None` means "not specified, inherit".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    pub radius: Option<f64>,
    pub padding: Option<f64>,
    pub inner_offset: Option<f64>,
    pub radial_exponent: Option<f64>,
}

/// Raw opacity table; `None` means "not specified, inherit".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOpacity {
    pub full: Option<f64>,
    pub dimmed: Option<f64>,
    pub stroke_full: Option<f64>,
    pub stroke_dimmed: Option<f64>,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a layer only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    pub color_scheme: Option<ColorScheme>,
    pub label_coloring: Option<LabelColoring>,
    pub zoom_duration_ms: Option<u64>,
    pub highlight_duration_ms: Option<u64>,
    pub wedge_width_depth_cutoff: Option<f64>,
    pub root_name: Option<String>,
    pub word_separator: Option<char>,
    pub hover_mode: Option<HighlightMode>,
    pub easing: Option<Easing>,
    #[serde(default)]
    pub geometry: RawGeometry,
    #[serde(default)]
    pub opacity: RawOpacity,
    pub reserved_colors: Option<BTreeMap<String, String>>,
    pub subject_label: Option<String>,
}

impl WheelGeometry {
    fn merge(&self, raw: &RawGeometry) -> Self {
        Self {
            radius: raw.radius.unwrap_or(self.radius),
            padding: raw.padding.unwrap_or(self.padding),
            inner_offset: raw.inner_offset.unwrap_or(self.inner_offset),
            radial_exponent: raw.radial_exponent.unwrap_or(self.radial_exponent),
        }
    }
}

impl OpacityLevels {
    fn merge(&self, raw: &RawOpacity) -> Self {
        Self {
            full: raw.full.unwrap_or(self.full),
            dimmed: raw.dimmed.unwrap_or(self.dimmed),
            stroke_full: raw.stroke_full.unwrap_or(self.stroke_full),
            stroke_dimmed: raw.stroke_dimmed.unwrap_or(self.stroke_dimmed),
        }
    }
}

/// Get the XDG config directory for sunwheel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(format!(".{APP_NAME}.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge a raw layer onto self.
    ///
    /// - Scalars: layer wins if specified, otherwise keep base
    /// - `reserved_colors`: merged by key, layer wins per name
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut reserved_colors = self.reserved_colors.clone();
        if let Some(extra) = &overlay.reserved_colors {
            reserved_colors.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            color_scheme: overlay.color_scheme.unwrap_or(self.color_scheme),
            label_coloring: overlay.label_coloring.unwrap_or(self.label_coloring),
            zoom_duration_ms: overlay.zoom_duration_ms.unwrap_or(self.zoom_duration_ms),
            highlight_duration_ms: overlay
                .highlight_duration_ms
                .unwrap_or(self.highlight_duration_ms),
            wedge_width_depth_cutoff: overlay
                .wedge_width_depth_cutoff
                .unwrap_or(self.wedge_width_depth_cutoff),
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            word_separator: overlay.word_separator.unwrap_or(self.word_separator),
            hover_mode: overlay.hover_mode.unwrap_or(self.hover_mode),
            easing: overlay.easing.unwrap_or(self.easing),
            geometry: self.geometry.merge(&overlay.geometry),
            opacity: self.opacity.merge(&overlay.opacity),
            reserved_colors,
            subject_label: overlay
                .subject_label
                .clone()
                .unwrap_or_else(|| self.subject_label.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; `./.sunwheel.toml` is tried when `None`
    ///
    /// An explicit local path must exist; the implicit one is optional.
    pub fn load(local: Option<&Path>) -> ApplicationResult<Self> {
        let implicit = local_config_path(Path::new("."));
        let local = match local {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => implicit.exists().then_some(implicit),
        };
        let global = global_config_path().filter(|p| p.exists());
        let current = Self::load_layers(global.as_deref(), local.as_deref())?;
        Self::apply_env_overrides(current, None)
    }

    /// Defaults, then the given global and local files, without env overrides.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();
        for path in [global, local].into_iter().flatten() {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
            tracing::debug!(path = %path.display(), "applied config layer");
        }
        Ok(current)
    }

    /// Apply `SUNWHEEL_*` environment variables as explicit overrides.
    ///
    /// `source` replaces the process environment when given.
    pub fn apply_env_overrides(
        mut settings: Self,
        source: Option<HashMap<String, String>>,
    ) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(source),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("color_scheme") {
            settings.color_scheme = parse_option(&val)?;
        }
        if let Ok(val) = config.get_string("label_coloring") {
            settings.label_coloring = parse_option(&val)?;
        }
        if let Ok(val) = config.get_string("hover_mode") {
            settings.hover_mode = parse_option(&val)?;
        }
        if let Ok(val) = config.get_string("easing") {
            settings.easing = match val.to_ascii_lowercase().as_str() {
                "linear" => Easing::Linear,
                "cubic-in-out" | "cubic_in_out" => Easing::CubicInOut,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("unknown easing: {other}"),
                    })
                }
            };
        }
        if let Ok(val) = config.get_int("zoom_duration_ms") {
            settings.zoom_duration_ms = non_negative("zoom_duration_ms", val)?;
        }
        if let Ok(val) = config.get_int("highlight_duration_ms") {
            settings.highlight_duration_ms = non_negative("highlight_duration_ms", val)?;
        }
        if let Ok(val) = config.get_float("wedge_width_depth_cutoff") {
            settings.wedge_width_depth_cutoff = val;
        }
        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("word_separator") {
            if let Some(c) = val.chars().next() {
                settings.word_separator = c;
            }
        }
        if let Ok(val) = config.get_string("subject_label") {
            settings.subject_label = val;
        }
        if let Ok(val) = config.get_float("geometry.radius") {
            settings.geometry.radius = val;
        }
        if let Ok(val) = config.get_float("geometry.padding") {
            settings.geometry.padding = val;
        }
        if let Ok(val) = config.get_float("geometry.inner_offset") {
            settings.geometry.inner_offset = val;
        }
        if let Ok(val) = config.get_float("geometry.radial_exponent") {
            settings.geometry.radial_exponent = val;
        }
        if let Ok(val) = config.get_float("opacity.full") {
            settings.opacity.full = val;
        }
        if let Ok(val) = config.get_float("opacity.dimmed") {
            settings.opacity.dimmed = val;
        }
        if let Ok(val) = config.get_float("opacity.stroke_full") {
            settings.opacity.stroke_full = val;
        }
        if let Ok(val) = config.get_float("opacity.stroke_dimmed") {
            settings.opacity.stroke_dimmed = val;
        }

        Ok(settings)
    }

    pub fn zoom_duration(&self) -> Duration {
        Duration::from_millis(self.zoom_duration_ms)
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }

    /// Parse the reserved color table into Lab.
    pub fn reserved_lab(&self) -> ApplicationResult<HashMap<String, Lab>> {
        self.reserved_colors
            .iter()
            .map(|(name, hex)| {
                let rgb: Rgb = hex.parse()?;
                Ok::<_, ApplicationError>((name.clone(), rgb.to_lab()))
            })
            .collect()
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# sunwheel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sunwheel/sunwheel.toml
#   Local:  ./.sunwheel.toml or --config <file>
#   Env:    SUNWHEEL_* (nested keys use __, e.g. SUNWHEEL_GEOMETRY__RADIUS=150)

# Leaf coloring: hue | hue-lab | hue-parents | hash
# color_scheme = "hue"

# Label text: brightness | flat
# label_coloring = "brightness"

# zoom_duration_ms = 1000
# highlight_duration_ms = 250
# wedge_width_depth_cutoff = 5.8
# root_name = "Root"
# word_separator = "-"

# Hover highlighting: lineage | focus | wheel-subtree | show-all
# hover_mode = "lineage"

# easing = "cubic-in-out"
# subject_label = "Language"

[geometry]
# radius = 200.0
# padding = 5.0
# inner_offset = 20.0
# radial_exponent = 1.3

[opacity]
# full = 1.0
# dimmed = 0.1
# stroke_full = 0.5
# stroke_dimmed = 0.1

[reserved_colors]
# Merged by name across layers
# Uninhabited = "#fff"
# Ocean = "#8080FF"
"##
        .to_string()
    }
}

fn parse_option<T>(val: &str) -> ApplicationResult<T>
where
    T: FromStr<Err = DomainError>,
{
    val.parse().map_err(|e: DomainError| ApplicationError::Config {
        message: e.to_string(),
    })
}

fn non_negative(key: &str, val: i64) -> ApplicationResult<u64> {
    u64::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{key} must not be negative: {val}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
