use anyhow::Result;
use folio_room::assets::{RoomAsset, RoomLoader, RoomNode};
use folio_room::config::PortfolioConfig;
use folio_room::ecs::{Light, Materials, Transform3D};
use folio_room::events::PortfolioEvent;
use folio_room::input::UiEvent;
use folio_room::views::{ViewId, ViewPoses};
use folio_room::Portfolio;
use glam::Vec3;
use std::f32::consts::PI;
use std::path::Path;

const STEP: f32 = 0.125;

struct SampleRoom;

impl RoomLoader for SampleRoom {
    fn load_room(&self, _path: &Path) -> Result<RoomAsset> {
        Ok(RoomAsset {
            nodes: vec![
                RoomNode::new("Wall"),
                RoomNode::new("Book").with_children([RoomNode::new("Book001")]),
                RoomNode::new("SwitchBoard").with_children([RoomNode::new("Switch")]),
            ],
            animations: vec!["fan_rotation".to_string(), "fan_rotation.002".to_string()],
        })
    }
}

fn loaded_portfolio() -> Portfolio {
    let mut portfolio = Portfolio::new(&PortfolioConfig::default());
    portfolio.load_room(&SampleRoom).expect("sample room attaches");
    portfolio.drain_events();
    portfolio
}

fn run(portfolio: &mut Portfolio, seconds: f32) {
    let steps = (seconds / STEP).round() as usize;
    for _ in 0..steps {
        portfolio.frame(STEP, None);
    }
}

fn click(portfolio: &mut Portfolio, id: &str) {
    portfolio.handle_event(UiEvent::MenuClick(id.to_string()));
}

fn cover_rotation(portfolio: &Portfolio) -> f32 {
    let cover = portfolio.scene_refs().and_then(|refs| refs.book_cover).expect("book cover attached");
    portfolio.world().get::<Transform3D>(cover).expect("cover transform").rotation.x
}

fn count(events: &[PortfolioEvent], wanted: &PortfolioEvent) -> usize {
    events.iter().filter(|event| *event == wanted).count()
}

#[test]
fn about_then_close_follows_the_page_timeline() {
    let mut portfolio = loaded_portfolio();
    let state = portfolio.navigation().clone();
    assert_eq!(state.current, ViewId::Home);
    assert!(state.input_enabled);
    assert!(!state.close_button_visible);
    assert_eq!(portfolio.body_class(), "light-theme");

    click(&mut portfolio, "about-menu");
    assert!(!portfolio.navigation().input_enabled, "input is disabled synchronously");
    assert!(!portfolio.navigation().close_button_visible);

    run(&mut portfolio, 1.375);
    assert!(!portfolio.navigation().close_button_visible);
    run(&mut portfolio, 0.125);
    assert!(portfolio.navigation().close_button_visible, "close button appears once the camera arrives");
    assert_eq!(portfolio.camera_pose().expect("camera").position, Vec3::new(0.12, 0.2, 0.55));

    run(&mut portfolio, 1.5);
    assert_eq!(cover_rotation(&portfolio), PI);
    let room_light = portfolio.scene_refs().expect("scene").room_light;
    assert_eq!(portfolio.world().get::<Light>(room_light).expect("room light").intensity, 1.0);
    assert!(!portfolio.navigation().input_enabled);

    click(&mut portfolio, "close-btn");
    assert!(!portfolio.navigation().close_button_visible);
    run(&mut portfolio, 1.375);
    assert!(!portfolio.navigation().input_enabled);
    run(&mut portfolio, 0.125);

    let pose = portfolio.camera_pose().expect("camera");
    assert_eq!(pose.position, Vec3::new(1.009028643133046, 0.5463638814987481, 0.4983449671971262));
    assert_eq!(pose, ViewPoses::HOME);
    assert_eq!(cover_rotation(&portfolio), 0.0);
    assert_eq!(portfolio.world().get::<Light>(room_light).expect("room light").intensity, 2.5);
    assert!(portfolio.navigation().input_enabled);
    assert_eq!(portfolio.navigation().current, ViewId::Home);

    let events = portfolio.drain_events();
    assert_eq!(count(&events, &PortfolioEvent::InputEnabled), 1);
    assert_eq!(count(&events, &PortfolioEvent::InputDisabled), 1);
}

#[test]
fn repeated_close_enables_input_exactly_once() {
    let mut portfolio = loaded_portfolio();
    click(&mut portfolio, "projects-menu");
    run(&mut portfolio, 0.5);
    for _ in 0..3 {
        click(&mut portfolio, "close-btn");
        run(&mut portfolio, 0.5);
    }
    assert!(!portfolio.navigation().input_enabled, "only the last close may complete");
    run(&mut portfolio, 2.0);

    assert!(portfolio.navigation().input_enabled);
    assert_eq!(portfolio.camera_pose(), Some(ViewPoses::HOME));
    let events = portfolio.drain_events();
    assert_eq!(count(&events, &PortfolioEvent::InputEnabled), 1);
    assert!(portfolio.scheduler().is_idle());

    click(&mut portfolio, "close-btn");
    run(&mut portfolio, 2.0);
    assert_eq!(count(&portfolio.drain_events(), &PortfolioEvent::InputEnabled), 0);
}

#[test]
fn latest_navigation_decides_the_final_pose() {
    let mut portfolio = loaded_portfolio();
    click(&mut portfolio, "about-menu");
    click(&mut portfolio, "projects-menu");
    run(&mut portfolio, 3.0);
    let projects = PortfolioConfig::default().views.projects;
    assert_eq!(portfolio.camera_pose(), Some(projects));

    click(&mut portfolio, "about-menu");
    run(&mut portfolio, 0.5);
    click(&mut portfolio, "design-menu");
    run(&mut portfolio, 1.0);
    assert!(!portfolio.navigation().close_button_visible, "the about completion was superseded");
    run(&mut portfolio, 2.5);

    let design = PortfolioConfig::default().views.design_gallery;
    assert_eq!(portfolio.camera_pose(), Some(design));
    assert_eq!(portfolio.navigation().current, ViewId::DesignGallery);
    assert_eq!(cover_rotation(&portfolio), 0.0, "cover opening was cancelled by the reset");
    assert!(portfolio.navigation().close_button_visible);
}

#[test]
fn about_is_ignored_before_the_room_loads() {
    let mut portfolio = Portfolio::new(&PortfolioConfig::default());
    let before = portfolio.navigation().clone();
    let pose = portfolio.camera_pose();

    click(&mut portfolio, "about-menu");
    click(&mut portfolio, "cv-menu");
    run(&mut portfolio, 2.0);

    assert_eq!(portfolio.navigation(), &before);
    assert_eq!(portfolio.camera_pose(), pose);
    let ignored = portfolio
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, PortfolioEvent::NavigationIgnored { .. }))
        .count();
    assert_eq!(ignored, 2);
}

#[test]
fn gallery_highlight_resets_when_leaving() {
    let mut portfolio = loaded_portfolio();
    let meshes: Vec<_> = portfolio.catalogue().design_meshes().map(|(_, mesh)| mesh).collect();
    assert_eq!(meshes.len(), 4);
    let intensity = |portfolio: &Portfolio, mesh| {
        portfolio.world().get::<Materials>(mesh).and_then(|m| m.slot(0).copied()).expect("design material").emissive_intensity
    };

    click(&mut portfolio, "design-menu");
    run(&mut portfolio, 3.0);
    for &mesh in &meshes {
        assert_eq!(intensity(&portfolio, mesh), 0.2);
    }

    click(&mut portfolio, "cv-menu");
    run(&mut portfolio, 1.0);
    for &mesh in &meshes {
        assert_eq!(intensity(&portfolio, mesh), 0.0);
    }
}

#[test]
fn projects_reveal_and_collapse() {
    let mut portfolio = loaded_portfolio();
    let projects: Vec<_> = portfolio.catalogue().project_meshes().collect();
    assert_eq!(projects.len(), 4);

    click(&mut portfolio, "project-2");
    assert_eq!(portfolio.navigation().current, ViewId::Projects);
    run(&mut portfolio, 3.5);
    for &(_, mesh, rest_y) in &projects {
        let transform = portfolio.world().get::<Transform3D>(mesh).expect("project transform");
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(transform.translation.y, rest_y + 0.05);
        let opacity = portfolio.world().get::<Materials>(mesh).and_then(|m| m.slot(0).copied()).expect("material").opacity;
        assert_eq!(opacity, 1.0);
    }

    click(&mut portfolio, "close-btn");
    run(&mut portfolio, 1.5);
    for &(_, mesh, rest_y) in &projects {
        let transform = portfolio.world().get::<Transform3D>(mesh).expect("project transform");
        assert_eq!(transform.scale, Vec3::ZERO);
        assert_eq!(transform.translation.y, rest_y);
    }
}

#[test]
fn unknown_elements_and_names_are_ignored() {
    let mut portfolio = loaded_portfolio();
    click(&mut portfolio, "contact-menu");
    assert!(!portfolio.navigate_named("blog"));
    assert_eq!(portfolio.navigation().epoch, 0);
    assert!(portfolio.navigate_named("design"));
    assert_eq!(portfolio.navigation().current, ViewId::DesignGallery);
}

#[test]
fn transitions_complete_after_days_of_uptime() {
    let mut portfolio = loaded_portfolio();
    portfolio.frame(530_000.0, None);
    let frames = |portfolio: &mut Portfolio| {
        for _ in 0..600 {
            portfolio.frame(1.0 / 60.0, None);
        }
    };

    click(&mut portfolio, "about-menu");
    frames(&mut portfolio);
    assert!(portfolio.navigation().close_button_visible);
    assert_eq!(cover_rotation(&portfolio), PI);

    click(&mut portfolio, "close-btn");
    frames(&mut portfolio);
    assert!(portfolio.navigation().input_enabled);
    assert_eq!(portfolio.navigation().current, ViewId::Home);
}
