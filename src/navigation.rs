//! View-to-view camera navigation.
//!
//! The controller owns which view is current and whether the user may orbit.
//! Completions that must wait for the camera (showing the close button,
//! re-enabling input) are delayed calls tagged with the epoch that scheduled
//! them; every accepted navigation or close bumps the epoch, so only the most
//! recent request's completion is ever applied.

use crate::camera::{CameraPose, OrbitControls};
use crate::ecs::{rgb, Axis, Channel, Transform3D};
use crate::events::{EventBus, PortfolioEvent};
use crate::gallery::Catalogue;
use crate::room::SceneRefs;
use crate::theme::{Theme, ThemePalette};
use crate::tween::{TweenRequest, TweenScheduler};
use crate::views::{Anchor, EnterEffect, ExitEffect, ViewId, ViewRegistry};
use bevy_ecs::prelude::World;
use glam::Vec3;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "TransitionConfig::default_camera_seconds")]
    pub camera_seconds: f32,
    #[serde(default = "TransitionConfig::default_settle_seconds")]
    pub settle_seconds: f32,
    #[serde(default = "TransitionConfig::default_project_stagger")]
    pub project_stagger: f32,
    #[serde(default = "TransitionConfig::default_project_lift")]
    pub project_lift: f32,
    #[serde(default = "TransitionConfig::default_highlight_seconds")]
    pub highlight_seconds: f32,
    #[serde(default = "TransitionConfig::default_highlight_stagger")]
    pub highlight_stagger: f32,
    #[serde(default = "TransitionConfig::default_highlight_intensity")]
    pub highlight_intensity: f32,
    #[serde(default = "TransitionConfig::default_dimmed_room_intensity")]
    pub dimmed_room_intensity: f32,
    #[serde(default = "TransitionConfig::default_cv_spotlight_intensity")]
    pub cv_spotlight_intensity: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            camera_seconds: Self::default_camera_seconds(),
            settle_seconds: Self::default_settle_seconds(),
            project_stagger: Self::default_project_stagger(),
            project_lift: Self::default_project_lift(),
            highlight_seconds: Self::default_highlight_seconds(),
            highlight_stagger: Self::default_highlight_stagger(),
            highlight_intensity: Self::default_highlight_intensity(),
            dimmed_room_intensity: Self::default_dimmed_room_intensity(),
            cv_spotlight_intensity: Self::default_cv_spotlight_intensity(),
        }
    }
}

impl TransitionConfig {
    const fn default_camera_seconds() -> f32 {
        1.5
    }

    const fn default_settle_seconds() -> f32 {
        1.0
    }

    const fn default_project_stagger() -> f32 {
        0.1
    }

    const fn default_project_lift() -> f32 {
        0.05
    }

    const fn default_highlight_seconds() -> f32 {
        0.5
    }

    const fn default_highlight_stagger() -> f32 {
        0.2
    }

    const fn default_highlight_intensity() -> f32 {
        0.2
    }

    const fn default_dimmed_room_intensity() -> f32 {
        1.0
    }

    const fn default_cv_spotlight_intensity() -> f32 {
        5.0
    }
}

/// Emissive colour used for highlighted design frames.
pub const HIGHLIGHT_COLOR: u32 = 0xffaa00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledCall {
    ShowCloseButton { epoch: u64 },
    EnableInput { epoch: u64 },
}

impl ScheduledCall {
    pub fn epoch(self) -> u64 {
        match self {
            ScheduledCall::ShowCloseButton { epoch } | ScheduledCall::EnableInput { epoch } => epoch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current: ViewId,
    pub input_enabled: bool,
    pub close_button_visible: bool,
    pub epoch: u64,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self { current: ViewId::Home, input_enabled: true, close_button_visible: false, epoch: 0 }
    }
}

/// Everything a navigation step touches, borrowed from the owning context.
pub struct NavContext<'a> {
    pub world: &'a mut World,
    pub scheduler: &'a mut TweenScheduler<ScheduledCall>,
    pub catalogue: &'a Catalogue,
    pub theme: Theme,
    pub palette: &'a ThemePalette,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    registry: ViewRegistry,
    timings: TransitionConfig,
    state: NavigationState,
}

impl NavigationController {
    pub fn new(registry: ViewRegistry, timings: TransitionConfig) -> Self {
        Self { registry, timings, state: NavigationState::default() }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ViewRegistry {
        &mut self.registry
    }

    pub fn timings(&self) -> &TransitionConfig {
        &self.timings
    }

    pub fn navigate_named(&mut self, ctx: &mut NavContext<'_>, name: &str) -> bool {
        match ViewId::parse(name) {
            Some(view) => self.navigate(ctx, view),
            None => {
                warn!("[navigation] Unknown view '{name}'; ignoring.");
                publish(ctx.world, PortfolioEvent::NavigationIgnored { view: name.to_string(), reason: "unknown view" });
                false
            }
        }
    }

    /// Starts the transition into `view`. Returns `false` when the view cannot be
    /// entered yet, in which case nothing about the current state has changed.
    pub fn navigate(&mut self, ctx: &mut NavContext<'_>, view: ViewId) -> bool {
        if view == ViewId::Home {
            self.close(ctx);
            return true;
        }
        let Some(target) = self.registry.get(view).cloned() else {
            warn!("[navigation] View '{view}' is not registered; ignoring.");
            publish(ctx.world, PortfolioEvent::NavigationIgnored { view: view.to_string(), reason: "unregistered" });
            return false;
        };
        let Some(refs) = ctx.world.get_resource::<SceneRefs>().cloned() else {
            warn!("[navigation] Scene is not built yet; ignoring '{view}'.");
            publish(ctx.world, PortfolioEvent::NavigationIgnored { view: view.to_string(), reason: "scene missing" });
            return false;
        };
        if let Some(anchor) = target.anchor {
            if !anchor_present(&refs, anchor) {
                warn!("[navigation] '{view}' needs {anchor:?}, which has not loaded; ignoring.");
                publish(ctx.world, PortfolioEvent::NavigationIgnored { view: view.to_string(), reason: "not loaded" });
                return false;
            }
        }

        self.state.epoch += 1;
        let epoch = self.state.epoch;
        self.set_input_enabled(ctx.world, false);
        self.set_close_button(ctx.world, false);

        let exits: Vec<ExitEffect> = self.registry.exit_effects_except(view).collect();
        for effect in exits {
            self.run_exit(ctx, &refs, effect);
        }
        self.move_camera(ctx, &refs, target.pose);
        for &effect in &target.enter {
            self.run_enter(ctx, &refs, effect);
        }
        ctx.scheduler.delayed_call(self.timings.camera_seconds, ScheduledCall::ShowCloseButton { epoch });

        self.state.current = view;
        debug!("[navigation] Entering '{view}' (epoch {epoch}).");
        publish(ctx.world, PortfolioEvent::ViewEntered { view });
        true
    }

    /// Returns to the home pose and re-enables input once the camera has arrived.
    pub fn close(&mut self, ctx: &mut NavContext<'_>) {
        let Some(refs) = ctx.world.get_resource::<SceneRefs>().cloned() else {
            warn!("[navigation] Scene is not built yet; ignoring close.");
            return;
        };
        self.state.epoch += 1;
        let epoch = self.state.epoch;
        self.set_close_button(ctx.world, false);

        let exits: Vec<ExitEffect> = self.registry.iter().flat_map(|view| view.exit.iter().copied()).collect();
        for effect in exits {
            self.run_exit(ctx, &refs, effect);
        }
        let home = self.registry.home_pose();
        self.move_camera(ctx, &refs, home);
        ctx.scheduler.delayed_call(self.timings.camera_seconds, ScheduledCall::EnableInput { epoch });

        let from = std::mem::replace(&mut self.state.current, ViewId::Home);
        debug!("[navigation] Closing '{from}' (epoch {epoch}).");
        publish(ctx.world, PortfolioEvent::ViewClosed { from });
    }

    /// Applies a delayed completion. Completions from a superseded epoch are dropped.
    pub fn complete(&mut self, world: &mut World, call: ScheduledCall) -> bool {
        if call.epoch() != self.state.epoch {
            debug!("[navigation] Dropping stale {call:?} (current epoch {}).", self.state.epoch);
            return false;
        }
        match call {
            ScheduledCall::ShowCloseButton { .. } => self.set_close_button(world, true),
            ScheduledCall::EnableInput { .. } => self.set_input_enabled(world, true),
        }
        true
    }

    fn set_input_enabled(&mut self, world: &mut World, enabled: bool) {
        if let Some(mut controls) = world.get_resource_mut::<OrbitControls>() {
            controls.enabled = enabled;
        }
        if self.state.input_enabled == enabled {
            return;
        }
        self.state.input_enabled = enabled;
        publish(world, if enabled { PortfolioEvent::InputEnabled } else { PortfolioEvent::InputDisabled });
    }

    fn set_close_button(&mut self, world: &mut World, visible: bool) {
        if self.state.close_button_visible == visible {
            return;
        }
        self.state.close_button_visible = visible;
        publish(world, if visible { PortfolioEvent::CloseButtonShown } else { PortfolioEvent::CloseButtonHidden });
    }

    fn move_camera(&self, ctx: &mut NavContext<'_>, refs: &SceneRefs, pose: CameraPose) {
        ctx.scheduler.animate(
            TweenRequest::new(refs.camera, self.timings.camera_seconds)
                .to_all(Channel::translation(pose.position))
                .to_all(Channel::rotation(pose.rotation)),
        );
    }

    fn run_enter(&self, ctx: &mut NavContext<'_>, refs: &SceneRefs, effect: EnterEffect) {
        let t = &self.timings;
        match effect {
            EnterEffect::OpenBookCover => {
                if let Some(cover) = refs.book_cover {
                    ctx.scheduler.animate(
                        TweenRequest::new(cover, t.camera_seconds)
                            .to(Channel::Rotation(Axis::X), PI)
                            .delay(t.camera_seconds),
                    );
                }
            }
            EnterEffect::DimRoomLight => {
                if ctx.theme == Theme::Light {
                    ctx.scheduler.animate(
                        TweenRequest::new(refs.room_light, t.camera_seconds)
                            .to(Channel::LightIntensity, t.dimmed_room_intensity),
                    );
                }
            }
            EnterEffect::CvSpotlight => {
                ctx.scheduler.animate(
                    TweenRequest::new(refs.cv_spotlight, t.camera_seconds)
                        .to(Channel::LightIntensity, t.cv_spotlight_intensity),
                );
            }
            EnterEffect::RevealProjects => {
                for (i, mesh, rest_y) in ctx.catalogue.project_meshes() {
                    for (channel, value) in Channel::scale(Vec3::ONE) {
                        ctx.scheduler.set_now(ctx.world, mesh, channel, value);
                    }
                    let delay = t.camera_seconds + t.project_stagger * i as f32;
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, t.camera_seconds).to(Channel::Opacity { slot: 0 }, 1.0).delay(delay),
                    );
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, t.settle_seconds)
                            .to(Channel::Translation(Axis::Y), rest_y + t.project_lift)
                            .delay(delay),
                    );
                }
            }
            EnterEffect::HighlightGallery => {
                for (i, mesh) in ctx.catalogue.design_meshes() {
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, t.highlight_seconds)
                            .to_all(Channel::emissive(0, rgb(HIGHLIGHT_COLOR)))
                            .to(Channel::EmissiveIntensity { slot: 0 }, t.highlight_intensity)
                            .delay(t.camera_seconds + t.highlight_stagger * i as f32),
                    );
                }
            }
        }
    }

    fn run_exit(&self, ctx: &mut NavContext<'_>, refs: &SceneRefs, effect: ExitEffect) {
        let t = &self.timings;
        match effect {
            ExitEffect::ResetBookCover => {
                if let Some(cover) = refs.book_cover {
                    ctx.scheduler
                        .animate(TweenRequest::new(cover, t.camera_seconds).to(Channel::Rotation(Axis::X), 0.0));
                }
            }
            ExitEffect::RestoreRoomLight => {
                if ctx.theme == Theme::Light {
                    ctx.scheduler.animate(
                        TweenRequest::new(refs.room_light, t.camera_seconds)
                            .to(Channel::LightIntensity, ctx.palette.room_light_intensity),
                    );
                }
            }
            ExitEffect::ResetCvSpotlight => {
                ctx.scheduler
                    .animate(TweenRequest::new(refs.cv_spotlight, t.camera_seconds).to(Channel::LightIntensity, 0.0));
            }
            ExitEffect::ResetProjects => {
                for (_, mesh, rest_y) in ctx.catalogue.project_meshes() {
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, t.settle_seconds)
                            .to(Channel::Opacity { slot: 0 }, 0.0)
                            .to(Channel::Translation(Axis::Y), rest_y),
                    );
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, 0.0).to_all(Channel::scale(Vec3::ZERO)).delay(t.settle_seconds),
                    );
                }
            }
            ExitEffect::ResetGallery => {
                for (_, mesh) in ctx.catalogue.design_meshes() {
                    ctx.scheduler.animate(
                        TweenRequest::new(mesh, t.highlight_seconds).to(Channel::EmissiveIntensity { slot: 0 }, 0.0),
                    );
                }
            }
        }
    }
}

fn anchor_present(refs: &SceneRefs, anchor: Anchor) -> bool {
    match anchor {
        Anchor::BookCover => refs.book_cover.is_some(),
        Anchor::CvBook => refs.cv_book.is_some(),
    }
}

/// Current camera pose as stored on the camera entity.
pub fn camera_pose(world: &World) -> Option<CameraPose> {
    let refs = world.get_resource::<SceneRefs>()?;
    let transform = world.get::<Transform3D>(refs.camera)?;
    Some(CameraPose::new(transform.translation, transform.rotation))
}

pub(crate) fn publish(world: &mut World, event: PortfolioEvent) {
    if let Some(mut bus) = world.get_resource_mut::<EventBus>() {
        bus.push(event);
    }
}
