use bevy_ecs::prelude::Entity;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectItem {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Resting height of the plane, filled in when the wall is laid out.
    #[serde(skip)]
    pub rest_y: f32,
    #[serde(skip)]
    pub mesh: Option<Entity>,
}

impl ProjectItem {
    pub fn new(image: impl Into<String>, url: Option<&str>) -> Self {
        Self { image: image.into(), url: url.map(str::to_string), rest_y: 0.0, mesh: None }
    }

    /// Link to open on click; blank urls count as none.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub image: String,
    pub title: String,
    #[serde(skip)]
    pub mesh: Option<Entity>,
    #[serde(skip)]
    pub frame: Option<Entity>,
}

impl GalleryItem {
    pub fn new(image: impl Into<String>, title: impl Into<String>) -> Self {
        Self { image: image.into(), title: title.into(), mesh: None, frame: None }
    }
}

pub fn default_projects() -> Vec<ProjectItem> {
    vec![
        ProjectItem::new("textures/project-spaze.webp", Some("https://www.spaze.social/")),
        ProjectItem::new("textures/project-myteachers.jpg", None),
        ProjectItem::new("textures/project-wholesale.jpg", None),
        ProjectItem::new("textures/project-pelotero.jpg", None),
    ]
}

pub fn default_designs() -> Vec<GalleryItem> {
    vec![
        GalleryItem::new("textures/design-1.jpg", "Brand Identity"),
        GalleryItem::new("textures/design-2.jpg", "Poster Design"),
        GalleryItem::new("textures/design-3.jpg", "UI/UX Design"),
        GalleryItem::new("textures/design-4.jpg", "Social Media"),
    ]
}

/// Project planes hang on the back wall; the first of every three starts a new row.
pub fn project_slot(index: usize) -> Vec3 {
    let column = if index % 3 == 0 { 0.0 } else { 1.0 };
    let row = (index / 3) as f32;
    Vec3::new(0.3 + index as f32 * 0.8 * column, 1.0 - 0.48 * row, -1.15)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSlot {
    pub frame: Vec3,
    pub frame_rotation: Vec3,
    pub light: Vec3,
}

/// Design frames form a two-column grid on the side wall, each with a spotlight above it.
pub fn design_slot(index: usize) -> FrameSlot {
    let row = (index / 2) as f32;
    let column = (index % 2) as f32;
    let frame = Vec3::new(-0.7, 0.6 - row * 0.35, 0.2 + column * 0.4);
    FrameSlot {
        frame,
        frame_rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
        light: Vec3::new(-0.5, 0.8 - row * 0.35, frame.z),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub projects: Vec<ProjectItem>,
    pub designs: Vec<GalleryItem>,
}

impl Catalogue {
    pub fn new(projects: Vec<ProjectItem>, designs: Vec<GalleryItem>) -> Self {
        Self { projects, designs }
    }

    pub fn project_by_mesh(&self, mesh: Entity) -> Option<(usize, &ProjectItem)> {
        self.projects.iter().enumerate().find(|(_, project)| project.mesh == Some(mesh))
    }

    pub fn design_by_mesh(&self, mesh: Entity) -> Option<(usize, &GalleryItem)> {
        self.designs.iter().enumerate().find(|(_, design)| design.mesh == Some(mesh))
    }

    pub fn project_meshes(&self) -> impl Iterator<Item = (usize, Entity, f32)> + '_ {
        self.projects.iter().enumerate().filter_map(|(i, p)| p.mesh.map(|mesh| (i, mesh, p.rest_y)))
    }

    pub fn design_meshes(&self) -> impl Iterator<Item = (usize, Entity)> + '_ {
        self.designs.iter().enumerate().filter_map(|(i, d)| d.mesh.map(|mesh| (i, mesh)))
    }
}
