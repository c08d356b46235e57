use anyhow::Result;
use bevy_ecs::prelude::Entity;
use folio_room::assets::{RoomAsset, RoomLoader, RoomNode};
use folio_room::config::PortfolioConfig;
use folio_room::ecs::{Light, Materials, Transform3D};
use folio_room::events::PortfolioEvent;
use folio_room::room::TextSlot;
use folio_room::theme::Theme;
use folio_room::Portfolio;
use glam::Vec3;
use std::f32::consts::PI;
use std::path::Path;

const STEP: f32 = 0.125;

struct SwitchRoom;

impl RoomLoader for SwitchRoom {
    fn load_room(&self, _path: &Path) -> Result<RoomAsset> {
        Ok(RoomAsset {
            nodes: vec![
                RoomNode::new("Book").with_children([RoomNode::new("Book001")]),
                RoomNode::new("SwitchBoard").with_children([RoomNode::new("Switch")]),
            ],
            animations: Vec::new(),
        })
    }
}

fn run(portfolio: &mut Portfolio, seconds: f32) {
    for _ in 0..(seconds / STEP).round() as usize {
        portfolio.frame(STEP, None);
    }
}

/// Every value the theme drives, excluding the flickering fan intensities.
#[derive(Debug, PartialEq)]
struct Snapshot {
    lights: Vec<(Vec3, f32, f32)>,
    text: Vec<Vec<Vec3>>,
    switch_rotation: f32,
}

fn snapshot(portfolio: &Portfolio) -> Snapshot {
    let refs = portfolio.scene_refs().expect("scene");
    let world = portfolio.world();
    let mut light_entities: Vec<Entity> = vec![refs.room_light, refs.ambient_light];
    light_entities.extend(refs.text_lights.iter().copied());
    light_entities.extend(refs.gallery_lights.iter().copied());
    let mut lights: Vec<_> = light_entities
        .into_iter()
        .map(|entity| {
            let light = world.get::<Light>(entity).expect("light");
            (light.color, light.intensity, light.distance)
        })
        .collect();
    let fan = world.get::<Light>(*refs.fan_lights.last().expect("fan lights")).expect("fan light");
    lights.push((fan.color, 0.0, fan.distance));

    let text = [refs.title_text, refs.subtitle_text]
        .into_iter()
        .flatten()
        .map(|entity| {
            let materials = world.get::<Materials>(entity).expect("text materials");
            materials.0.iter().map(|material| material.color).collect()
        })
        .collect();
    let switch = refs.light_switch.expect("switch attached");
    let switch_rotation = world.get::<Transform3D>(switch).expect("switch transform").rotation.z;
    Snapshot { lights, text, switch_rotation }
}

fn themed_portfolio() -> Portfolio {
    let mut portfolio = Portfolio::new(&PortfolioConfig::default());
    portfolio.load_room(&SwitchRoom).expect("room attaches");
    portfolio.attach_intro_text(TextSlot::Title).expect("title spawned");
    portfolio.attach_intro_text(TextSlot::Subtitle).expect("subtitle spawned");
    portfolio.drain_events();
    portfolio
}

#[test]
fn dark_then_light_restores_every_value() {
    let mut portfolio = themed_portfolio();
    let original = snapshot(&portfolio);

    assert!(portfolio.set_theme(Theme::Dark));
    assert_eq!(portfolio.body_class(), "dark-theme");
    let immediate = snapshot(&portfolio);
    assert_eq!(immediate.switch_rotation, PI / 7.0, "switch flips without a transition");
    assert_eq!(immediate.text[0], vec![Vec3::splat(8.0), Vec3::splat(5.0)], "text recolours immediately");

    run(&mut portfolio, 1.0);
    let refs = portfolio.scene_refs().expect("scene").clone();
    let room = portfolio.world().get::<Light>(refs.room_light).expect("room light");
    assert_eq!(room.intensity, 1.5);
    assert_eq!(room.color, Vec3::new(0.27254901960784313, 0.23137254901960785, 0.6862745098039216));
    let fan = portfolio.world().get::<Light>(refs.fan_lights[4]).expect("fan 5");
    assert_eq!(fan.distance, 0.07);
    for &light in &refs.gallery_lights {
        assert_eq!(portfolio.world().get::<Light>(light).expect("gallery light").intensity, 3.0);
    }

    assert!(portfolio.set_theme(Theme::Light));
    run(&mut portfolio, 1.0);
    assert_eq!(snapshot(&portfolio), original);
    assert_eq!(portfolio.body_class(), "light-theme");

    let changes: Vec<_> = portfolio
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, PortfolioEvent::ThemeChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![PortfolioEvent::ThemeChanged { theme: Theme::Dark }, PortfolioEvent::ThemeChanged { theme: Theme::Light }]
    );
}

#[test]
fn setting_the_active_theme_is_a_no_op() {
    let mut portfolio = themed_portfolio();
    assert!(!portfolio.set_theme(Theme::Light));
    assert!(portfolio.scheduler().is_idle());
    portfolio.toggle_theme();
    portfolio.toggle_theme();
    run(&mut portfolio, 1.0);
    assert_eq!(portfolio.theme(), Theme::Light);
}

#[test]
fn late_text_adopts_the_current_theme() {
    let mut portfolio = Portfolio::new(&PortfolioConfig::default());
    portfolio.load_room(&SwitchRoom).expect("room attaches");
    portfolio.set_theme(Theme::Dark);
    let title = portfolio.attach_intro_text(TextSlot::Title).expect("title spawned");
    let materials = portfolio.world().get::<Materials>(title).expect("text materials");
    assert_eq!(materials.slot(0).expect("front").color, Vec3::splat(8.0));
}

#[test]
fn theme_applies_before_the_room_loads() {
    let mut portfolio = Portfolio::new(&PortfolioConfig::default());
    assert!(portfolio.set_theme(Theme::Dark));
    run(&mut portfolio, 1.0);
    let refs = portfolio.scene_refs().expect("scene").clone();
    assert_eq!(portfolio.world().get::<Light>(refs.ambient_light).expect("ambient").intensity, 0.3);

    portfolio.load_room(&SwitchRoom).expect("room attaches");
    let switch = portfolio.scene_refs().and_then(|refs| refs.light_switch).expect("switch");
    assert_eq!(portfolio.world().get::<Transform3D>(switch).expect("switch").rotation.z, PI / 7.0);
}
