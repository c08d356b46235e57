use bevy_ecs::prelude::*;
use glam::Vec3;
use smallvec::SmallVec;
use std::borrow::Cow;

// ---------- Components ----------
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Name(pub Cow<'static, str>);

impl Name {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Position, XYZ Euler rotation (radians) and scale of a scene object.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform3D {
    pub fn at(translation: Vec3) -> Self {
        Self { translation, ..Self::default() }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
    Spot,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    /// Falloff range; zero means unlimited.
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub target: Vec3,
}

impl Light {
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            distance: 0.0,
            angle: 0.0,
            penumbra: 0.0,
            decay: 0.0,
            target: Vec3::ZERO,
        }
    }

    pub fn point(color: Vec3, intensity: f32, distance: f32) -> Self {
        Self { kind: LightKind::Point, distance, decay: 2.0, ..Self::ambient(color, intensity) }
    }

    pub fn spot(color: Vec3, intensity: f32, distance: f32, angle: f32, penumbra: f32, decay: f32) -> Self {
        Self { kind: LightKind::Spot, distance, angle, penumbra, decay, ..Self::ambient(color, intensity) }
    }

    pub fn aimed_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self { color: Vec3::ONE, emissive: Vec3::ZERO, emissive_intensity: 1.0, opacity: 1.0, transparent: false }
    }
}

impl Material {
    pub fn colored(color: Vec3) -> Self {
        Self { color, ..Self::default() }
    }

    pub fn unlit_emission(mut self) -> Self {
        self.emissive_intensity = 0.0;
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }
}

/// Material slots of a mesh; multi-material meshes (text, the CV book) use more than one.
#[derive(Component, Clone, Debug, Default)]
pub struct Materials(pub SmallVec<[Material; 2]>);

impl Materials {
    pub fn single(material: Material) -> Self {
        let mut slots = SmallVec::new();
        slots.push(material);
        Self(slots)
    }

    pub fn from_slots(slots: impl IntoIterator<Item = Material>) -> Self {
        Self(slots.into_iter().collect())
    }

    pub fn slot(&self, index: u8) -> Option<&Material> {
        self.0.get(index as usize)
    }

    pub fn slot_mut(&mut self, index: u8) -> Option<&mut Material> {
        self.0.get_mut(index as usize)
    }
}

/// Image shown on a mesh (texture path resolved by the renderer).
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Texture(pub String);

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shadows {
    pub cast: bool,
    pub receive: bool,
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MainCamera;

/// Flickering fan light; the phase offsets the flicker curve.
#[derive(Component, Clone, Copy, Debug)]
pub struct FanLight {
    pub phase: f32,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Parent(pub Entity);

#[derive(Component, Clone, Debug, Default)]
pub struct Children(pub Vec<Entity>);

// ---------- Channels ----------
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// One animatable scalar on a scene object. Colour channels use X/Y/Z for r/g/b.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Translation(Axis),
    Rotation(Axis),
    Scale(Axis),
    LightIntensity,
    LightDistance,
    LightColor(Axis),
    Color { slot: u8, axis: Axis },
    Emissive { slot: u8, axis: Axis },
    EmissiveIntensity { slot: u8 },
    Opacity { slot: u8 },
}

impl Channel {
    pub fn translation(value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(Channel::Translation, value)
    }

    pub fn rotation(value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(Channel::Rotation, value)
    }

    pub fn scale(value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(Channel::Scale, value)
    }

    pub fn light_color(value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(Channel::LightColor, value)
    }

    pub fn color(slot: u8, value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(|axis| Channel::Color { slot, axis }, value)
    }

    pub fn emissive(slot: u8, value: Vec3) -> [(Channel, f32); 3] {
        Self::per_axis(|axis| Channel::Emissive { slot, axis }, value)
    }

    fn per_axis(make: impl Fn(Axis) -> Channel, value: Vec3) -> [(Channel, f32); 3] {
        Axis::ALL.map(|axis| (make(axis), axis.get(value)))
    }
}

pub fn read_channel(world: &World, entity: Entity, channel: Channel) -> Option<f32> {
    match channel {
        Channel::Translation(axis) => world.get::<Transform3D>(entity).map(|t| axis.get(t.translation)),
        Channel::Rotation(axis) => world.get::<Transform3D>(entity).map(|t| axis.get(t.rotation)),
        Channel::Scale(axis) => world.get::<Transform3D>(entity).map(|t| axis.get(t.scale)),
        Channel::LightIntensity => world.get::<Light>(entity).map(|l| l.intensity),
        Channel::LightDistance => world.get::<Light>(entity).map(|l| l.distance),
        Channel::LightColor(axis) => world.get::<Light>(entity).map(|l| axis.get(l.color)),
        Channel::Color { slot, axis } => material(world, entity, slot).map(|m| axis.get(m.color)),
        Channel::Emissive { slot, axis } => material(world, entity, slot).map(|m| axis.get(m.emissive)),
        Channel::EmissiveIntensity { slot } => material(world, entity, slot).map(|m| m.emissive_intensity),
        Channel::Opacity { slot } => material(world, entity, slot).map(|m| m.opacity),
    }
}

/// Writes `value` into the channel; returns false when the entity or component is gone.
pub fn write_channel(world: &mut World, entity: Entity, channel: Channel, value: f32) -> bool {
    match channel {
        Channel::Translation(axis) => with_transform(world, entity, |t| axis.set(&mut t.translation, value)),
        Channel::Rotation(axis) => with_transform(world, entity, |t| axis.set(&mut t.rotation, value)),
        Channel::Scale(axis) => with_transform(world, entity, |t| axis.set(&mut t.scale, value)),
        Channel::LightIntensity => with_light(world, entity, |l| l.intensity = value),
        Channel::LightDistance => with_light(world, entity, |l| l.distance = value),
        Channel::LightColor(axis) => with_light(world, entity, |l| axis.set(&mut l.color, value)),
        Channel::Color { slot, axis } => with_material(world, entity, slot, |m| axis.set(&mut m.color, value)),
        Channel::Emissive { slot, axis } => {
            with_material(world, entity, slot, |m| axis.set(&mut m.emissive, value))
        }
        Channel::EmissiveIntensity { slot } => {
            with_material(world, entity, slot, |m| m.emissive_intensity = value)
        }
        Channel::Opacity { slot } => with_material(world, entity, slot, |m| m.opacity = value),
    }
}

fn material(world: &World, entity: Entity, slot: u8) -> Option<&Material> {
    world.get::<Materials>(entity).and_then(|materials| materials.slot(slot))
}

fn with_transform(world: &mut World, entity: Entity, f: impl FnOnce(&mut Transform3D)) -> bool {
    match world.get_mut::<Transform3D>(entity) {
        Some(mut transform) => {
            f(&mut transform);
            true
        }
        None => false,
    }
}

fn with_light(world: &mut World, entity: Entity, f: impl FnOnce(&mut Light)) -> bool {
    match world.get_mut::<Light>(entity) {
        Some(mut light) => {
            f(&mut light);
            true
        }
        None => false,
    }
}

fn with_material(world: &mut World, entity: Entity, slot: u8, f: impl FnOnce(&mut Material)) -> bool {
    let Some(mut materials) = world.get_mut::<Materials>(entity) else {
        return false;
    };
    match materials.slot_mut(slot) {
        Some(material) => {
            f(material);
            true
        }
        None => false,
    }
}

/// `0xRRGGBB` to a linear 0..1 colour, matching how the page authors its palette.
pub fn rgb(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

// ---------- Systems ----------
pub fn sys_flicker_fan_lights(clock: Res<crate::time::FrameClock>, mut lights: Query<(&FanLight, &mut Light)>) {
    // sin(2t) has period π.
    let t = clock.elapsed.rem_euclid(std::f64::consts::PI) as f32;
    for (fan, mut light) in &mut lights {
        light.intensity = 30.0 + (t * 2.0 + fan.phase).sin() * 5.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_components() {
        let mut world = World::new();
        let entity = world
            .spawn((
                Transform3D::default(),
                Materials::from_slots([Material::default(), Material::colored(Vec3::ZERO)]),
            ))
            .id();

        assert!(write_channel(&mut world, entity, Channel::Rotation(Axis::X), 1.25));
        assert!(write_channel(&mut world, entity, Channel::Color { slot: 1, axis: Axis::Z }, 0.5));
        assert_eq!(read_channel(&world, entity, Channel::Rotation(Axis::X)), Some(1.25));
        assert_eq!(read_channel(&world, entity, Channel::Color { slot: 1, axis: Axis::Z }), Some(0.5));
        assert_eq!(read_channel(&world, entity, Channel::Color { slot: 0, axis: Axis::Z }), Some(1.0));
    }

    #[test]
    fn missing_components_and_slots_are_reported() {
        let mut world = World::new();
        let entity = world.spawn(Materials::single(Material::default())).id();
        assert!(!write_channel(&mut world, entity, Channel::LightIntensity, 2.0));
        assert!(!write_channel(&mut world, entity, Channel::Opacity { slot: 3 }, 0.0));
        assert_eq!(read_channel(&world, entity, Channel::Scale(Axis::Y)), None);
    }

    #[test]
    fn fan_lights_flicker_with_their_phase() {
        let mut world = World::new();
        let mut clock = crate::time::FrameClock::default();
        clock.advance(0.5);
        world.insert_resource(clock);
        let first = world.spawn((FanLight { phase: 0.0 }, Light::point(Vec3::ONE, 0.0, 1.0))).id();
        let second = world.spawn((FanLight { phase: 1.0 }, Light::point(Vec3::ONE, 0.0, 1.0))).id();
        let steady = world.spawn(Light::point(Vec3::ONE, 7.0, 1.0)).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(sys_flicker_fan_lights);
        schedule.run(&mut world);

        let intensity = |entity| world.get::<Light>(entity).map(|light| light.intensity);
        assert_eq!(intensity(first), Some(30.0 + 1.0_f32.sin() * 5.0));
        assert_eq!(intensity(second), Some(30.0 + 2.0_f32.sin() * 5.0));
        assert_eq!(intensity(steady), Some(7.0));
    }

    #[test]
    fn rgb_splits_hex_components() {
        assert_eq!(rgb(0xffaa00), Vec3::new(1.0, 170.0 / 255.0, 0.0));
        assert_eq!(rgb(0x000000), Vec3::ZERO);
    }
}
