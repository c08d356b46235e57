use crate::camera::{CameraPose, OrbitControls};
use crate::gallery::{default_designs, default_projects, GalleryItem, ProjectItem};
use crate::navigation::TransitionConfig;
use crate::theme::{Theme, ThemeConfig};
use crate::views::ViewPoses;
use anyhow::{Context, Result};
use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use winit::dpi::PhysicalSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "ViewportConfig::default_title")]
    pub title: String,
    #[serde(default = "ViewportConfig::default_width")]
    pub width: u32,
    #[serde(default = "ViewportConfig::default_height")]
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { title: Self::default_title(), width: Self::default_width(), height: Self::default_height() }
    }
}

impl ViewportConfig {
    fn default_title() -> String {
        "Folio Room".to_string()
    }

    const fn default_width() -> u32 {
        1280
    }

    const fn default_height() -> u32 {
        720
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }
}

/// Layout used on narrow viewports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileConfig {
    #[serde(default = "MobileConfig::default_breakpoint")]
    pub breakpoint: u32,
    #[serde(default = "MobileConfig::default_about")]
    pub about: CameraPose,
    #[serde(default = "MobileConfig::default_projects")]
    pub projects: CameraPose,
    #[serde(default = "MobileConfig::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "MobileConfig::default_room_scale")]
    pub room_scale: f32,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            breakpoint: Self::default_breakpoint(),
            about: Self::default_about(),
            projects: Self::default_projects(),
            max_distance: Self::default_max_distance(),
            room_scale: Self::default_room_scale(),
        }
    }
}

impl MobileConfig {
    const fn default_breakpoint() -> u32 {
        992
    }

    fn default_about() -> CameraPose {
        CameraPose::new(Vec3::new(0.09, 0.23, 0.51), Vec3::new(-1.57, 0.0, 1.57))
    }

    fn default_projects() -> CameraPose {
        CameraPose::new(Vec3::new(1.1, 0.82, 0.5), Vec3::new(0.0, 0.0, 1.55))
    }

    const fn default_max_distance() -> f32 {
        1.5
    }

    const fn default_room_scale() -> f32 {
        0.95
    }

    pub fn is_mobile(&self, viewport: PhysicalSize<u32>) -> bool {
        viewport.width <= self.breakpoint
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "AssetConfig::default_room_model")]
    pub room_model: PathBuf,
    #[serde(default = "AssetConfig::default_fan_clips")]
    pub fan_clips: Vec<String>,
    #[serde(default = "AssetConfig::default_title_text")]
    pub title_text: String,
    #[serde(default = "AssetConfig::default_subtitle_text")]
    pub subtitle_text: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            room_model: Self::default_room_model(),
            fan_clips: Self::default_fan_clips(),
            title_text: Self::default_title_text(),
            subtitle_text: Self::default_subtitle_text(),
        }
    }
}

impl AssetConfig {
    fn default_room_model() -> PathBuf {
        PathBuf::from("models/room.glb")
    }

    fn default_fan_clips() -> Vec<String> {
        std::iter::once("fan_rotation".to_string())
            .chain((1..=4).map(|i| format!("fan_rotation.{i:03}")))
            .collect()
    }

    fn default_title_text() -> String {
        "Amine Belajdel".to_string()
    }

    fn default_subtitle_text() -> String {
        "Web Designer / Developer".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub initial_theme: Theme,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub views: ViewPoses,
    #[serde(default)]
    pub mobile: MobileConfig,
    #[serde(default)]
    pub orbit: OrbitControls,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectItem>,
    #[serde(default = "default_designs")]
    pub designs: Vec<GalleryItem>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            initial_theme: Theme::default(),
            transition: TransitionConfig::default(),
            views: ViewPoses::default(),
            mobile: MobileConfig::default(),
            orbit: OrbitControls::default(),
            theme: ThemeConfig::default(),
            assets: AssetConfig::default(),
            projects: default_projects(),
            designs: default_designs(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub theme: Option<Theme>,
    pub room_model: Option<PathBuf>,
}

impl PortfolioConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("[config] Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(width) = overrides.width {
            self.viewport.width = width;
        }
        if let Some(height) = overrides.height {
            self.viewport.height = height;
        }
        if let Some(theme) = overrides.theme {
            self.initial_theme = theme;
        }
        if let Some(room_model) = &overrides.room_model {
            self.assets.room_model = room_model.clone();
        }
    }

    /// View poses with the mobile overrides folded in when `viewport` is narrow.
    pub fn poses_for(&self, viewport: PhysicalSize<u32>) -> ViewPoses {
        let mut poses = self.views.clone();
        if self.mobile.is_mobile(viewport) {
            poses.about = self.mobile.about;
            poses.projects = self.mobile.projects;
        }
        poses
    }

    pub fn orbit_for(&self, viewport: PhysicalSize<u32>) -> OrbitControls {
        let mut orbit = self.orbit.clone();
        if self.mobile.is_mobile(viewport) {
            orbit.max_distance = self.mobile.max_distance;
        }
        orbit
    }

    pub fn room_scale_for(&self, viewport: PhysicalSize<u32>) -> f32 {
        if self.mobile.is_mobile(viewport) {
            self.mobile.room_scale
        } else {
            1.0
        }
    }
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.theme.is_none() && self.room_model.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.theme.is_some() {
            fields.push("theme");
        }
        if self.room_model.is_some() {
            fields.push("room");
        }
        fields
    }
}
