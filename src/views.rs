use crate::camera::CameraPose;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    Home,
    About,
    Projects,
    Cv,
    DesignGallery,
}

impl ViewId {
    pub const ALL: [ViewId; 5] = [ViewId::Home, ViewId::About, ViewId::Projects, ViewId::Cv, ViewId::DesignGallery];

    pub fn name(self) -> &'static str {
        match self {
            ViewId::Home => "home",
            ViewId::About => "about",
            ViewId::Projects => "projects",
            ViewId::Cv => "cv",
            ViewId::DesignGallery => "design-gallery",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "home" | "default" => Some(ViewId::Home),
            "about" => Some(ViewId::About),
            "projects" => Some(ViewId::Projects),
            "cv" => Some(ViewId::Cv),
            "design-gallery" | "design" | "designs" => Some(ViewId::DesignGallery),
            _ => None,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scene object a view cannot be entered without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    BookCover,
    CvBook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterEffect {
    OpenBookCover,
    DimRoomLight,
    CvSpotlight,
    RevealProjects,
    HighlightGallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitEffect {
    ResetBookCover,
    RestoreRoomLight,
    ResetCvSpotlight,
    ResetProjects,
    ResetGallery,
}

#[derive(Debug, Clone)]
pub struct View {
    pub id: ViewId,
    pub pose: CameraPose,
    pub anchor: Option<Anchor>,
    pub enter: SmallVec<[EnterEffect; 2]>,
    pub exit: SmallVec<[ExitEffect; 2]>,
}

/// Camera poses per view, as authored for the desktop layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewPoses {
    #[serde(default = "ViewPoses::default_home")]
    pub home: CameraPose,
    #[serde(default = "ViewPoses::default_about")]
    pub about: CameraPose,
    #[serde(default = "ViewPoses::default_projects")]
    pub projects: CameraPose,
    #[serde(default = "ViewPoses::default_cv")]
    pub cv: CameraPose,
    #[serde(default = "ViewPoses::default_design_gallery")]
    pub design_gallery: CameraPose,
}

impl Default for ViewPoses {
    fn default() -> Self {
        Self {
            home: Self::default_home(),
            about: Self::default_about(),
            projects: Self::default_projects(),
            cv: Self::default_cv(),
            design_gallery: Self::default_design_gallery(),
        }
    }
}

impl ViewPoses {
    pub const HOME: CameraPose = CameraPose::new(
        Vec3::new(1.009028643133046, 0.5463638814987481, 0.4983449671971262),
        Vec3::new(-0.8313297556598935, 0.9383399492446749, 0.7240714481613063),
    );

    fn default_home() -> CameraPose {
        Self::HOME
    }

    fn default_about() -> CameraPose {
        CameraPose::new(Vec3::new(0.12, 0.2, 0.55), Vec3::new(-1.54, 0.13, 1.41))
    }

    fn default_projects() -> CameraPose {
        CameraPose::new(Vec3::new(1.0, 0.45, 0.01), Vec3::new(0.05, 0.05, 0.0))
    }

    fn default_cv() -> CameraPose {
        CameraPose::new(Vec3::new(0.15, 0.35, 0.25), Vec3::new(-0.8, 0.5, 0.6))
    }

    fn default_design_gallery() -> CameraPose {
        CameraPose::new(Vec3::new(-0.5, 0.5, 0.3), Vec3::new(0.0, -1.57, 0.0))
    }

    pub fn pose(&self, id: ViewId) -> CameraPose {
        match id {
            ViewId::Home => self.home,
            ViewId::About => self.about,
            ViewId::Projects => self.projects,
            ViewId::Cv => self.cv,
            ViewId::DesignGallery => self.design_gallery,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewRegistry {
    views: BTreeMap<ViewId, View>,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::from_poses(&ViewPoses::default())
    }
}

impl ViewRegistry {
    pub fn from_poses(poses: &ViewPoses) -> Self {
        let views = ViewId::ALL
            .into_iter()
            .map(|id| {
                let (anchor, enter, exit): (_, SmallVec<[EnterEffect; 2]>, SmallVec<[ExitEffect; 2]>) = match id {
                    ViewId::Home => (None, smallvec![], smallvec![]),
                    ViewId::About => (
                        Some(Anchor::BookCover),
                        smallvec![EnterEffect::OpenBookCover, EnterEffect::DimRoomLight],
                        smallvec![ExitEffect::ResetBookCover, ExitEffect::RestoreRoomLight],
                    ),
                    ViewId::Projects => {
                        (None, smallvec![EnterEffect::RevealProjects], smallvec![ExitEffect::ResetProjects])
                    }
                    ViewId::Cv => (
                        Some(Anchor::CvBook),
                        smallvec![EnterEffect::CvSpotlight],
                        smallvec![ExitEffect::ResetCvSpotlight],
                    ),
                    ViewId::DesignGallery => {
                        (None, smallvec![EnterEffect::HighlightGallery], smallvec![ExitEffect::ResetGallery])
                    }
                };
                (id, View { id, pose: poses.pose(id), anchor, enter, exit })
            })
            .collect();
        Self { views }
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    /// Looks a view up by its DOM/config name; unknown names yield `None`.
    pub fn get_named(&self, name: &str) -> Option<&View> {
        ViewId::parse(name).and_then(|id| self.get(id))
    }

    pub fn home_pose(&self) -> CameraPose {
        self.get(ViewId::Home).map(|view| view.pose).unwrap_or(ViewPoses::HOME)
    }

    pub fn set_pose(&mut self, id: ViewId, pose: CameraPose) {
        if let Some(view) = self.views.get_mut(&id) {
            view.pose = pose;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Exit effects of every view except `keep`, in view order.
    pub fn exit_effects_except(&self, keep: ViewId) -> impl Iterator<Item = ExitEffect> + '_ {
        self.views.values().filter(move |view| view.id != keep).flat_map(|view| view.exit.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_aliases_resolve() {
        for id in ViewId::ALL {
            assert_eq!(ViewId::parse(id.name()), Some(id));
        }
        assert_eq!(ViewId::parse(" Design "), Some(ViewId::DesignGallery));
        assert_eq!(ViewId::parse("contact"), None);
    }

    #[test]
    fn registry_lookup_by_name() {
        let registry = ViewRegistry::default();
        let about = registry.get_named("about").expect("about registered");
        assert_eq!(about.anchor, Some(Anchor::BookCover));
        assert_eq!(about.pose.position, Vec3::new(0.12, 0.2, 0.55));
        assert!(registry.get_named("blog").is_none());
    }

    #[test]
    fn exit_effects_skip_the_kept_view() {
        let registry = ViewRegistry::default();
        let effects: Vec<_> = registry.exit_effects_except(ViewId::Projects).collect();
        assert!(!effects.contains(&ExitEffect::ResetProjects));
        assert!(effects.contains(&ExitEffect::ResetBookCover));
        assert!(effects.contains(&ExitEffect::ResetGallery));
        assert!(effects.contains(&ExitEffect::ResetCvSpotlight));
    }
}
