use anyhow::{anyhow, Context, Result};
use glam::{EulerRot, Quat, Vec3};
use log::warn;
use std::fs;
use std::path::Path;

/// One node of the room model, with its local transform already decomposed.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub children: Vec<RoomNode>,
}

impl RoomNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RoomNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomAsset {
    pub nodes: Vec<RoomNode>,
    pub animations: Vec<String>,
}

impl RoomAsset {
    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.iter().any(|clip| clip == name)
    }
}

/// Loads the room model as a scene graph plus its named animation clips.
pub trait RoomLoader {
    fn load_room(&self, path: &Path) -> Result<RoomAsset>;
}

/// Reads node hierarchy and animation names from a glTF/GLB document.
///
/// Only the document is parsed; mesh buffers stay with the renderer, so
/// compressed geometry extensions do not need to be understood here.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfRoomLoader;

impl RoomLoader for GltfRoomLoader {
    fn load_room(&self, path: &Path) -> Result<RoomAsset> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read room model {}", path.display()))?;
        let gltf = gltf::Gltf::from_slice_without_validation(&bytes)
            .with_context(|| format!("Failed to parse room model {}", path.display()))?;
        let document = &gltf.document;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| anyhow!("Room model '{}' contains no scene", path.display()))?;
        if document.scenes().len() > 1 {
            warn!("[assets] Room model '{}' has several scenes; using '{}'.", path.display(), scene.index());
        }

        let nodes = scene.nodes().map(|node| convert_node(&node)).collect();
        let animations = document
            .animations()
            .map(|animation| {
                animation.name().map(str::to_string).unwrap_or_else(|| format!("clip_{}", animation.index()))
            })
            .collect();
        Ok(RoomAsset { nodes, animations })
    }
}

fn convert_node(node: &gltf::Node<'_>) -> RoomNode {
    let (t, r, s) = node.transform().decomposed();
    let rotation = Quat::from_xyzw(r[0], r[1], r[2], r[3]).normalize();
    let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);
    RoomNode {
        name: node.name().map(str::to_string).unwrap_or_default(),
        translation: Vec3::from_array(t),
        rotation: Vec3::new(rx, ry, rz),
        scale: Vec3::from_array(s),
        children: node.children().map(|child| convert_node(&child)).collect(),
    }
}

/// Loader overlay shown until the room model has been attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    /// The overlay stays up while loading and after a failure.
    pub fn indicator_visible(&self) -> bool {
        !matches!(self, LoadState::Ready)
    }
}
