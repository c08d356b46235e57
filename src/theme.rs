use crate::ecs::{rgb, Axis, Channel};
use crate::room::SceneRefs;
use crate::tween::{TweenRequest, TweenScheduler};
use bevy_ecs::prelude::{Entity, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn body_class(self) -> &'static str {
        match self {
            Theme::Light => "light-theme",
            Theme::Dark => "dark-theme",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Target values one theme drives the room towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub room_light_color: Vec3,
    pub room_light_intensity: f32,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub fan_light_distance: f32,
    pub gallery_light_intensity: f32,
    pub text_primary: Vec3,
    pub text_secondary: Vec3,
    pub text_light_intensity: f32,
    pub switch_rotation: f32,
}

impl ThemePalette {
    pub fn light() -> Self {
        Self {
            room_light_color: Vec3::ONE,
            room_light_intensity: 2.5,
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.6,
            fan_light_distance: 0.05,
            gallery_light_intensity: 2.0,
            text_primary: rgb(0x171f27),
            text_secondary: Vec3::ONE,
            text_light_intensity: 0.0,
            switch_rotation: 0.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            room_light_color: Vec3::new(0.27254901960784313, 0.23137254901960785, 0.6862745098039216),
            room_light_intensity: 1.5,
            ambient_color: Vec3::new(0.17254901960784313, 0.23137254901960785, 0.6862745098039216),
            ambient_intensity: 0.3,
            fan_light_distance: 0.07,
            gallery_light_intensity: 3.0,
            text_primary: Vec3::splat(8.0),
            text_secondary: Vec3::splat(5.0),
            text_light_intensity: 0.6,
            switch_rotation: PI / 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "ThemeConfig::default_fade_seconds")]
    pub fade_seconds: f32,
    #[serde(default = "ThemeConfig::default_gallery_fade_seconds")]
    pub gallery_fade_seconds: f32,
    #[serde(default = "ThemePalette::light")]
    pub light: ThemePalette,
    #[serde(default = "ThemePalette::dark")]
    pub dark: ThemePalette,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fade_seconds: Self::default_fade_seconds(),
            gallery_fade_seconds: Self::default_gallery_fade_seconds(),
            light: ThemePalette::light(),
            dark: ThemePalette::dark(),
        }
    }
}

impl ThemeConfig {
    const fn default_fade_seconds() -> f32 {
        0.5
    }

    const fn default_gallery_fade_seconds() -> f32 {
        1.0
    }

    pub fn palette(&self, theme: Theme) -> &ThemePalette {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

/// Retargets every themed value in the room. Objects that have not loaded yet are skipped.
pub fn apply_theme<A>(
    world: &mut World,
    scheduler: &mut TweenScheduler<A>,
    refs: &SceneRefs,
    config: &ThemeConfig,
    theme: Theme,
) {
    let palette = config.palette(theme);
    let fade = config.fade_seconds;

    if let Some(switch) = refs.light_switch {
        scheduler.set_now(world, switch, Channel::Rotation(Axis::Z), palette.switch_rotation);
    }

    scheduler.animate(TweenRequest::new(refs.room_light, fade).to_all(Channel::light_color(palette.room_light_color)));
    scheduler.animate(TweenRequest::new(refs.ambient_light, fade).to_all(Channel::light_color(palette.ambient_color)));
    scheduler
        .animate(TweenRequest::new(refs.room_light, fade).to(Channel::LightIntensity, palette.room_light_intensity));
    scheduler
        .animate(TweenRequest::new(refs.ambient_light, fade).to(Channel::LightIntensity, palette.ambient_intensity));
    if let Some(&fan) = refs.fan_lights.last() {
        scheduler.animate(TweenRequest::new(fan, fade).to(Channel::LightDistance, palette.fan_light_distance));
    }
    for &light in &refs.gallery_lights {
        scheduler.animate(
            TweenRequest::new(light, config.gallery_fade_seconds)
                .to(Channel::LightIntensity, palette.gallery_light_intensity),
        );
    }

    for text in [refs.title_text, refs.subtitle_text].into_iter().flatten() {
        paint_text(world, scheduler, text, palette);
    }

    for &light in &refs.text_lights {
        scheduler.animate(TweenRequest::new(light, fade).to(Channel::LightIntensity, palette.text_light_intensity));
    }
}

pub(crate) fn paint_text<A>(
    world: &mut World,
    scheduler: &mut TweenScheduler<A>,
    text: Entity,
    palette: &ThemePalette,
) {
    for (channel, value) in Channel::color(0, palette.text_primary) {
        scheduler.set_now(world, text, channel, value);
    }
    for (channel, value) in Channel::color(1, palette.text_secondary) {
        scheduler.set_now(world, text, channel, value);
    }
}
