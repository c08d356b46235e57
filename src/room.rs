use crate::assets::{RoomAsset, RoomNode};
use crate::camera::CameraPose;
use crate::ecs::{
    rgb, Children, FanLight, Light, MainCamera, Material, Materials, Name, Parent, Shadows, Texture,
    Transform3D,
};
use crate::gallery::{design_slot, project_slot, GalleryItem, ProjectItem};
use crate::theme::ThemePalette;
use bevy_ecs::prelude::*;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

pub const ROOM_ROOT: &str = "Room";
pub const WALL: &str = "Wall";
pub const BOOK: &str = "Book";
pub const BOOK_INNER: &str = "Book001";
pub const SWITCH_BOARD: &str = "SwitchBoard";
pub const SWITCH: &str = "Switch";
pub const STAND: &str = "Stand";
pub const CPU: &str = "CPU";
pub const CV_BOOK: &str = "CVBook";
pub const CV_GLOW: &str = "CVGlow";
pub const DESIGN: &str = "design";
pub const DESIGN_FRAME: &str = "DesignFrame";
pub const PROJECT: &str = "project";

const SCREEN_VIDEO: &str = "textures/arcane.mp4";
const BOOK_INNER_TEXTURE: &str = "textures/book-inner.jpg";
const CV_COVER_TEXTURE: &str = "textures/cv-cover.jpg";

/// Handles to the scene objects the controllers drive. Everything created from
/// the room model or a font is optional until that asset has arrived.
#[derive(Resource, Debug, Clone)]
pub struct SceneRefs {
    pub camera: Entity,
    pub ambient_light: Entity,
    pub room_light: Entity,
    pub fan_lights: Vec<Entity>,
    pub text_lights: Vec<Entity>,
    pub cv_spotlight: Entity,
    pub gallery_lights: Vec<Entity>,
    pub room_root: Option<Entity>,
    pub book: Option<Entity>,
    pub book_cover: Option<Entity>,
    pub switch_board: Option<Entity>,
    pub light_switch: Option<Entity>,
    pub cv_book: Option<Entity>,
    pub cv_glow: Option<Entity>,
    pub title_text: Option<Entity>,
    pub subtitle_text: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Title,
    Subtitle,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub size: f32,
    pub depth: f32,
}

/// Spawns the camera and every light that exists before the room model loads.
pub fn spawn_static_scene(
    world: &mut World,
    home: CameraPose,
    gallery_lights: usize,
    palette: &ThemePalette,
) -> SceneRefs {
    let camera = world
        .spawn((
            Name::new("Camera"),
            MainCamera,
            Transform3D::at(home.position).with_rotation(home.rotation),
        ))
        .id();

    let ambient_light = world
        .spawn((Name::new("AmbientLight"), Light::ambient(palette.ambient_color, palette.ambient_intensity)))
        .id();
    let room_light = world
        .spawn((
            Name::new("RoomLight"),
            Light::point(palette.room_light_color, palette.room_light_intensity, 10.0),
            Transform3D::at(Vec3::new(0.3, 2.0, 0.5)),
            Shadows { cast: true, receive: false },
        ))
        .id();

    let fan_specs = [
        (rgb(0xff0000), 0.2, Vec3::new(0.0, 0.29, -0.29)),
        (rgb(0x00ff00), 0.12, Vec3::new(-0.15, 0.29, -0.29)),
        (rgb(0x00ff00), 0.2, Vec3::new(0.21, 0.29, -0.29)),
        (rgb(0x00ff00), 0.2, Vec3::new(0.21, 0.19, -0.29)),
        (rgb(0x00ff00), palette.fan_light_distance, Vec3::new(0.21, 0.08, -0.29)),
    ];
    let fan_lights = fan_specs
        .into_iter()
        .enumerate()
        .map(|(i, (color, distance, position))| {
            let mut fan = world.spawn((
                Name::new(format!("FanLight{}", i + 1)),
                Light::point(color, 30.0, distance),
                Transform3D::at(position),
            ));
            // Only the three fans facing the camera flicker.
            if i < 3 {
                fan.insert(FanLight { phase: i as f32 });
            }
            fan.id()
        })
        .collect();

    let text_lights = [
        Vec3::new(-0.2, 0.6, 0.24),
        Vec3::new(-0.2, 0.6, 0.42),
        Vec3::new(-0.2, 0.6, 0.01),
        Vec3::new(-0.2, 0.6, -0.14),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, position)| {
        world
            .spawn((
                Name::new(format!("TextLight{}", i + 1)),
                Light::point(rgb(0xff0000), palette.text_light_intensity, 1.1),
                Transform3D::at(position),
            ))
            .id()
    })
    .collect();

    let cv_spotlight = world
        .spawn((
            Name::new("CvSpotlight"),
            Light::spot(Vec3::ONE, 0.0, 1.0, FRAC_PI_6, 0.5, 2.0).aimed_at(Vec3::new(0.2, 0.15, 0.3)),
            Transform3D::at(Vec3::new(0.2, 0.6, 0.3)),
            Shadows { cast: true, receive: false },
        ))
        .id();

    let gallery_lights = (0..gallery_lights)
        .map(|i| {
            world
                .spawn((
                    Name::new(format!("GalleryLight{}", i + 1)),
                    Light::spot(Vec3::ONE, palette.gallery_light_intensity, 2.0, FRAC_PI_4, 0.3, 1.0),
                    Transform3D::default(),
                ))
                .id()
        })
        .collect();

    SceneRefs {
        camera,
        ambient_light,
        room_light,
        fan_lights,
        text_lights,
        cv_spotlight,
        gallery_lights,
        room_root: None,
        book: None,
        book_cover: None,
        switch_board: None,
        light_switch: None,
        cv_book: None,
        cv_glow: None,
        title_text: None,
        subtitle_text: None,
    }
}

/// Adds the loaded room model under a root node and records the interactive parts.
/// Returns the number of entities spawned.
pub fn attach_room(world: &mut World, refs: &mut SceneRefs, room: &RoomAsset, scale: f32) -> usize {
    let root = world
        .spawn((Name::new(ROOM_ROOT), Transform3D::default().with_scale(Vec3::splat(scale))))
        .id();
    refs.room_root = Some(root);
    let mut spawned = 1;

    for node in &room.nodes {
        let entity = spawn_node(world, node, root, 0, &mut spawned);
        let first_child = first_child_of(world, entity);
        match node.name.as_str() {
            BOOK => {
                refs.book = Some(entity);
                refs.book_cover = first_child;
                world.entity_mut(entity).insert((
                    Texture(BOOK_INNER_TEXTURE.to_string()),
                    Materials::single(Material::colored(Vec3::ONE)),
                ));
            }
            SWITCH_BOARD => {
                refs.switch_board = Some(entity);
                refs.light_switch = first_child;
            }
            STAND => {
                if let Some(screen) = first_child {
                    world
                        .entity_mut(screen)
                        .insert((Texture(SCREEN_VIDEO.to_string()), Materials::single(Material::default())));
                }
            }
            CPU => {
                for glass in children_of(world, entity).into_iter().take(2) {
                    world
                        .entity_mut(glass)
                        .insert(Materials::single(Material::colored(rgb(0x999999)).translucent(0.8)));
                }
            }
            _ => {}
        }
    }
    spawned
}

fn spawn_node(world: &mut World, node: &RoomNode, parent: Entity, depth: usize, spawned: &mut usize) -> Entity {
    let shadows = match depth {
        0 => Shadows { cast: node.name != WALL, receive: true },
        1 => Shadows { cast: node.name != BOOK_INNER && node.name != SWITCH, receive: true },
        _ => Shadows::default(),
    };
    let entity = world
        .spawn((
            Name::new(node.name.clone()),
            Transform3D { translation: node.translation, rotation: node.rotation, scale: node.scale },
            shadows,
            Parent(parent),
        ))
        .id();
    *spawned += 1;

    let children: Vec<Entity> =
        node.children.iter().map(|child| spawn_node(world, child, entity, depth + 1, spawned)).collect();
    if !children.is_empty() {
        world.entity_mut(entity).insert(Children(children));
    }
    entity
}

fn children_of(world: &World, entity: Entity) -> Vec<Entity> {
    world.get::<Children>(entity).map(|order| order.0.clone()).unwrap_or_default()
}

fn first_child_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<Children>(entity).and_then(|order| order.0.first().copied())
}

/// The CV book on the desk plus the glow shell used for hover feedback.
pub fn spawn_cv_book(world: &mut World, refs: &mut SceneRefs) -> Entity {
    let leather = Material::colored(rgb(0x8b4513));
    let pages = Material::colored(rgb(0xf5f5dc));
    let cover = Material::colored(Vec3::ONE);
    let book = world
        .spawn((
            Name::new(CV_BOOK),
            Transform3D::at(Vec3::new(0.2, 0.158, 0.3)).with_rotation(Vec3::new(0.0, -0.3, 0.0)),
            Materials::from_slots([leather, leather, cover, pages, leather, leather]),
            Texture(CV_COVER_TEXTURE.to_string()),
            Shadows { cast: true, receive: true },
        ))
        .id();
    let glow = world
        .spawn((
            Name::new(CV_GLOW),
            Transform3D::default(),
            Materials::single(Material::colored(rgb(0xffaa00)).translucent(0.0)),
            Parent(book),
        ))
        .id();
    world.entity_mut(book).insert(Children(vec![glow]));
    refs.cv_book = Some(book);
    refs.cv_glow = Some(glow);
    book
}

/// Framed design images on the side wall, each lit by its own gallery spotlight.
pub fn spawn_design_gallery(world: &mut World, refs: &SceneRefs, designs: &mut [GalleryItem]) {
    for (i, design) in designs.iter_mut().enumerate() {
        let slot = design_slot(i);
        let frame = world
            .spawn((
                Name::new(DESIGN_FRAME),
                Transform3D::at(slot.frame).with_rotation(slot.frame_rotation),
                Materials::single(Material::colored(rgb(0x2c2c2c))),
                Shadows { cast: true, receive: true },
            ))
            .id();
        let plane = world
            .spawn((
                Name::new(DESIGN),
                Transform3D::at(Vec3::new(0.0, 0.0, 0.011)),
                Materials::single(Material::default().unlit_emission()),
                Texture(design.image.clone()),
                Parent(frame),
            ))
            .id();
        world.entity_mut(frame).insert(Children(vec![plane]));
        design.frame = Some(frame);
        design.mesh = Some(plane);

        if let Some(&light) = refs.gallery_lights.get(i) {
            if let Some(mut transform) = world.get_mut::<Transform3D>(light) {
                transform.translation = slot.light;
            }
            if let Some(mut spot) = world.get_mut::<Light>(light) {
                spot.target = slot.frame;
            }
        }
    }
}

/// Project planes start collapsed and transparent until the projects view reveals them.
pub fn spawn_project_wall(world: &mut World, projects: &mut [ProjectItem]) {
    for (i, project) in projects.iter_mut().enumerate() {
        let position = project_slot(i);
        let plane = world
            .spawn((
                Name::new(PROJECT),
                Transform3D::at(position).with_scale(Vec3::ZERO),
                Materials::single(Material::colored(Vec3::ONE).translucent(0.0)),
                Texture(project.image.clone()),
            ))
            .id();
        project.rest_y = position.y;
        project.mesh = Some(plane);
    }
}

/// Spawns a text mesh once its font has resolved, coloured for the current theme.
pub fn spawn_intro_text(
    world: &mut World,
    refs: &mut SceneRefs,
    slot: TextSlot,
    text: &str,
    palette: &ThemePalette,
) -> Entity {
    let (name, position, size, depth) = match slot {
        TextSlot::Title => ("TitleText", Vec3::new(-0.27, 0.55, 0.5), 0.08, 0.01),
        TextSlot::Subtitle => ("SubtitleText", Vec3::new(-0.255, 0.5, 0.5), 0.018, 0.0),
    };
    let entity = world
        .spawn((
            Name::new(name),
            Transform3D::at(position).with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0)),
            Materials::from_slots([Material::colored(palette.text_primary), Material::colored(palette.text_secondary)]),
            TextLabel { text: text.to_string(), size, depth },
        ))
        .id();
    let previous = match slot {
        TextSlot::Title => refs.title_text.replace(entity),
        TextSlot::Subtitle => refs.subtitle_text.replace(entity),
    };
    if let Some(old) = previous {
        world.despawn(old);
    }
    entity
}

pub fn name_of(world: &World, entity: Entity) -> Option<&str> {
    world.get::<Name>(entity).map(Name::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room() -> RoomAsset {
        RoomAsset {
            nodes: vec![
                RoomNode::new(WALL),
                RoomNode::new(BOOK).with_children([RoomNode::new(BOOK_INNER)]),
                RoomNode::new(SWITCH_BOARD).with_children([RoomNode::new(SWITCH)]),
                RoomNode::new(CPU).with_children([RoomNode::new("Glass"), RoomNode::new("Glass2")]),
            ],
            animations: vec!["fan_rotation".to_string()],
        }
    }

    #[test]
    fn static_scene_uses_light_palette() {
        let mut world = World::new();
        let palette = ThemePalette::light();
        let refs = spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 4, &palette);
        assert_eq!(refs.fan_lights.len(), 5);
        assert_eq!(refs.gallery_lights.len(), 4);
        assert_eq!(world.get::<Light>(refs.room_light).unwrap().intensity, 2.5);
        assert_eq!(world.get::<Light>(refs.cv_spotlight).unwrap().intensity, 0.0);
        assert!(world.get::<FanLight>(refs.fan_lights[3]).is_none());
        assert!(refs.book_cover.is_none());
    }

    #[test]
    fn attaching_room_records_interactive_parts() {
        let mut world = World::new();
        let mut refs =
            spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 4, &ThemePalette::light());
        let spawned = attach_room(&mut world, &mut refs, &sample_room(), 1.0);
        assert_eq!(spawned, 9);

        let cover = refs.book_cover.expect("book cover found");
        assert_eq!(name_of(&world, cover), Some(BOOK_INNER));
        assert!(!world.get::<Shadows>(cover).unwrap().cast);
        let switch = refs.light_switch.expect("switch found");
        assert_eq!(name_of(&world, switch), Some(SWITCH));
        let wall = world
            .query::<(Entity, &Name)>()
            .iter(&world)
            .find(|(_, name)| name.as_str() == WALL)
            .map(|(entity, _)| entity)
            .expect("wall spawned");
        assert_eq!(world.get::<Shadows>(wall).unwrap(), &Shadows { cast: false, receive: true });
    }

    #[test]
    fn gallery_and_projects_attach_meshes() {
        let mut world = World::new();
        let refs =
            spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 2, &ThemePalette::light());
        let mut designs = vec![GalleryItem::new("a.jpg", "A"), GalleryItem::new("b.jpg", "B")];
        let mut projects = vec![ProjectItem::new("p.jpg", None)];
        spawn_design_gallery(&mut world, &refs, &mut designs);
        spawn_project_wall(&mut world, &mut projects);

        let plane = designs[1].mesh.expect("design mesh");
        assert_eq!(world.get::<Materials>(plane).unwrap().slot(0).unwrap().emissive_intensity, 0.0);
        let light = world.get::<Light>(refs.gallery_lights[1]).unwrap();
        assert_eq!(light.target, design_slot(1).frame);

        let project = projects[0].mesh.expect("project mesh");
        assert_eq!(world.get::<Transform3D>(project).unwrap().scale, Vec3::ZERO);
        assert_eq!(projects[0].rest_y, 1.0);
    }

    #[test]
    fn respawning_text_replaces_previous_mesh() {
        let mut world = World::new();
        let palette = ThemePalette::light();
        let mut refs = spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 0, &palette);
        let first = spawn_intro_text(&mut world, &mut refs, TextSlot::Title, "Name", &palette);
        let second = spawn_intro_text(&mut world, &mut refs, TextSlot::Title, "Name", &palette);
        assert_ne!(first, second);
        assert!(world.get::<TextLabel>(first).is_none());
        assert_eq!(refs.title_text, Some(second));
    }
}
