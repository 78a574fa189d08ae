use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::Rgba;

pub const DEFAULT_SCREENSHOT_ROOT: &str = "screenshots";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// How a screenshot filename is reduced to the key that pairs its halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingStrategy {
    /// Cut at the last `_`: `shot_TV.png` and `shot_DRC.png` share `shot`.
    #[default]
    LastUnderscore,
    /// Cut at the last `.`: every file keeps its own key and stands alone.
    LastDot,
}

/// What cancelling the delete confirmation does to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelBehavior {
    /// Stay in multi-select with every selection intact.
    #[default]
    KeepSelection,
    /// Clear the selection and return to browsing.
    ClearSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonStyle {
    /// Pulse the button toward `pressed-scale` and back.
    #[default]
    Scale,
    /// Grow the bounds by `max-expansion` pixels toward the screen edges.
    Grow,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ScreenConfig {
    /// Logical canvas width; the window is stretched to fit.
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GridConfig {
    pub columns: u32,
    /// Height of the header banner; grid rows start below it.
    pub header_height: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            header_height: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ButtonConfig {
    pub style: ButtonStyle,
    /// Frames spent inflating and again deflating.
    pub steps: u32,
    pub pressed_scale: f32,
    pub max_expansion: i32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            style: ButtonStyle::Scale,
            steps: 3,
            pressed_scale: 1.1,
            max_expansion: 12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ParticleConfig {
    /// Probability that a new particle spawns on a given frame.
    pub spawn_chance: f64,
    /// Fixed RNG seed; random when omitted.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub highlight: String,
    pub selected_tint: String,
    pub header_tint: String,
    pub delete_tint: String,
    pub trail: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            highlight: "#ffff00".into(),
            selected_tint: "#00ff00".into(),
            header_tint: "#000093".into(),
            delete_tint: "#ff0000".into(),
            trail: "#90ee9064".into(),
        }
    }
}

/// Theme colours after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub highlight: Rgba,
    pub selected_tint: Rgba,
    pub header_tint: Rgba,
    pub delete_tint: Rgba,
    pub trail: Rgba,
}

impl ThemeConfig {
    pub fn resolve(&self) -> Result<Theme> {
        let parse = |name: &str, value: &str| {
            Rgba::parse_hex(value).ok_or_else(|| {
                Error::InvalidConfig(format!("theme.{name}: '{value}' is not a hex colour"))
            })
        };
        Ok(Theme {
            highlight: parse("highlight", &self.highlight)?,
            selected_tint: parse("selected-tint", &self.selected_tint)?,
            header_tint: parse("header-tint", &self.header_tint)?,
            delete_tint: parse("delete-tint", &self.delete_tint)?,
            trail: parse("trail", &self.trail)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Directory scanned recursively for `_TV` / `_DRC` screenshots.
    pub screenshot_root: PathBuf,
    /// Directory holding the fixed UI textures.
    pub assets_dir: PathBuf,
    pub screen: ScreenConfig,
    pub grid: GridConfig,
    pub pairing: PairingStrategy,
    pub cancel_behavior: CancelBehavior,
    /// Frames the single-view slide takes.
    pub transition_steps: u32,
    pub button: ButtonConfig,
    pub particles: ParticleConfig,
    /// Ghost pointers kept while drag-scrolling.
    pub trail_length: usize,
    /// Pointer travel (px) after which a touch counts as a drag, not a tap.
    pub drag_threshold: i32,
    /// Scan on a worker and show placeholders while it runs.
    pub background_scan: bool,
    /// Longest edge of grid thumbnails.
    pub thumbnail_max_px: u32,
    /// Preferred font family for labels.
    pub font: Option<String>,
    /// Track looped in the background; silence when omitted.
    pub music: Option<PathBuf>,
    /// Linear music volume, 0.0 to 1.0.
    pub music_volume: f32,
    pub theme: ThemeConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            screenshot_root: PathBuf::from(DEFAULT_SCREENSHOT_ROOT),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            screen: ScreenConfig::default(),
            grid: GridConfig::default(),
            pairing: PairingStrategy::default(),
            cancel_behavior: CancelBehavior::default(),
            transition_steps: 50,
            button: ButtonConfig::default(),
            particles: ParticleConfig::default(),
            trail_length: 20,
            drag_threshold: 16,
            background_scan: true,
            thumbnail_max_px: 480,
            font: None,
            music: None,
            music_volume: 0.15,
            theme: ThemeConfig::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Check value ranges and return the configuration unchanged when sane.
    pub fn validated(self) -> Result<Self> {
        fn ensure(cond: bool, msg: &str) -> Result<()> {
            if cond {
                Ok(())
            } else {
                Err(Error::InvalidConfig(msg.to_string()))
            }
        }
        ensure(
            self.screen.width > 0 && self.screen.height > 0,
            "screen width and height must be positive",
        )?;
        ensure(self.grid.columns >= 1, "grid.columns must be at least 1")?;
        ensure(
            self.grid.header_height < self.screen.height,
            "grid.header-height must be smaller than the screen height",
        )?;
        ensure(
            self.transition_steps >= 1,
            "transition-steps must be at least 1",
        )?;
        ensure(self.button.steps >= 1, "button.steps must be at least 1")?;
        ensure(
            self.button.pressed_scale >= 1.0,
            "button.pressed-scale must be >= 1.0",
        )?;
        ensure(
            self.button.max_expansion >= 0,
            "button.max-expansion must not be negative",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.particles.spawn_chance),
            "particles.spawn-chance must be within [0, 1]",
        )?;
        ensure(
            self.thumbnail_max_px >= 16,
            "thumbnail-max-px must be at least 16",
        )?;
        ensure(self.drag_threshold >= 0, "drag-threshold must not be negative")?;
        ensure(
            (0.0..=1.0).contains(&self.music_volume),
            "music-volume must be within [0, 1]",
        )?;
        self.theme.resolve()?;
        Ok(self)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub const fn screen_width(&self) -> i32 {
        self.screen.width as i32
    }

    #[allow(clippy::cast_possible_wrap)]
    pub const fn screen_height(&self) -> i32 {
        self.screen.height as i32
    }
}
