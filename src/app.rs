use crate::assets::{LoadState, RoomAsset, RoomLoader};
use crate::camera::{Camera3D, CameraPose, OrbitControls};
use crate::config::{AssetConfig, MobileConfig, PortfolioConfig};
use crate::ecs::{sys_flicker_fan_lights, Axis, Channel};
use crate::events::{EventBus, PortfolioEvent};
use crate::gallery::Catalogue;
use crate::input::{apply_hover, resolve_hit, HitTarget, MenuTarget, UiEvent};
use crate::navigation::{camera_pose, publish, NavContext, NavigationController, NavigationState, ScheduledCall};
use crate::room::{
    attach_room, spawn_cv_book, spawn_design_gallery, spawn_intro_text, spawn_project_wall, spawn_static_scene,
    SceneRefs, TextSlot,
};
use crate::theme::{apply_theme, Theme, ThemeConfig};
use crate::time::FrameClock;
use crate::tween::TweenScheduler;
use crate::views::{ViewId, ViewPoses, ViewRegistry};
use anyhow::Result;
use bevy_ecs::prelude::{Entity, Schedule, World};
use glam::Vec3;
use log::{error, info, warn};
use winit::dpi::PhysicalSize;

const CAMERA_FOV_DEGREES: f32 = 35.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
/// Zoom factor per wheel notch.
const WHEEL_ZOOM_STEP: f32 = 0.95;

/// Receives the scene once per frame; implemented by the host renderer.
pub trait FrameSink {
    fn render(&mut self, world: &World, camera: &Camera3D);
}

/// The page: scene, transitions, navigation, theme and loader state behind one handle.
pub struct Portfolio {
    world: World,
    schedule: Schedule,
    scheduler: TweenScheduler<ScheduledCall>,
    navigation: NavigationController,
    theme: Theme,
    theme_config: ThemeConfig,
    catalogue: Catalogue,
    load_state: LoadState,
    assets: AssetConfig,
    desktop_poses: ViewPoses,
    desktop_orbit: OrbitControls,
    mobile: MobileConfig,
    viewport: PhysicalSize<u32>,
    playing_clips: Vec<String>,
}

impl Portfolio {
    pub fn new(config: &PortfolioConfig) -> Self {
        let viewport = config.viewport.size();
        let poses = config.poses_for(viewport);
        let theme = config.initial_theme;

        let mut world = World::new();
        world.insert_resource(FrameClock::default());
        world.insert_resource(EventBus::default());
        world.insert_resource(config.orbit_for(viewport));

        let palette = config.theme.palette(theme);
        let refs = spawn_static_scene(&mut world, poses.home, config.designs.len(), palette);
        let mut catalogue = Catalogue::new(config.projects.clone(), config.designs.clone());
        spawn_design_gallery(&mut world, &refs, &mut catalogue.designs);
        spawn_project_wall(&mut world, &mut catalogue.projects);
        world.insert_resource(refs);

        let mut schedule = Schedule::default();
        schedule.add_systems(sys_flicker_fan_lights);

        info!(
            "[app] Portfolio ready: {}x{} ({}), theme {theme}.",
            viewport.width,
            viewport.height,
            if config.mobile.is_mobile(viewport) { "mobile" } else { "desktop" }
        );

        Self {
            world,
            schedule,
            scheduler: TweenScheduler::new(),
            navigation: NavigationController::new(ViewRegistry::from_poses(&poses), config.transition.clone()),
            theme,
            theme_config: config.theme.clone(),
            catalogue,
            load_state: LoadState::default(),
            assets: config.assets.clone(),
            desktop_poses: config.views.clone(),
            desktop_orbit: config.orbit.clone(),
            mobile: config.mobile.clone(),
            viewport,
            playing_clips: Vec::new(),
        }
    }

    // ---------- Assets ----------

    /// Loads the configured room model. On failure the loader stays up and the
    /// error is reported; nothing is retried.
    pub fn load_room(&mut self, loader: &dyn RoomLoader) -> Result<usize> {
        let path = self.assets.room_model.clone();
        match loader.load_room(&path) {
            Ok(asset) => Ok(self.attach_room_asset(&asset)),
            Err(err) => {
                self.room_load_failed(&err);
                Err(err)
            }
        }
    }

    pub fn attach_room_asset(&mut self, asset: &RoomAsset) -> usize {
        let Some(mut refs) = self.world.remove_resource::<SceneRefs>() else {
            warn!("[app] Scene references missing; room not attached.");
            return 0;
        };
        if let Some(previous) = refs.room_root {
            warn!("[app] Room already attached as {previous:?}; ignoring second attach.");
            self.world.insert_resource(refs);
            return 0;
        }
        let room_scale = self.room_scale();
        let spawned = attach_room(&mut self.world, &mut refs, asset, room_scale);
        if refs.cv_book.is_none() {
            spawn_cv_book(&mut self.world, &mut refs);
        }
        if let Some(switch) = refs.light_switch {
            let rotation = self.theme_config.palette(self.theme).switch_rotation;
            self.scheduler.set_now(&mut self.world, switch, Channel::Rotation(Axis::Z), rotation);
        }
        if refs.book_cover.is_none() {
            warn!("[app] Room model has no book cover; the about view stays unavailable.");
        }
        self.world.insert_resource(refs);

        self.playing_clips.clear();
        for clip in &self.assets.fan_clips {
            if asset.has_animation(clip) {
                self.playing_clips.push(clip.clone());
            } else {
                warn!("[app] Animation clip '{clip}' not found in room model.");
            }
        }

        self.load_state = LoadState::Ready;
        info!("[app] Room attached: {spawned} nodes, {} clips playing.", self.playing_clips.len());
        publish(&mut self.world, PortfolioEvent::RoomLoaded { nodes: spawned });
        spawned
    }

    pub fn room_load_failed(&mut self, err: &anyhow::Error) {
        error!("[app] Room model failed to load: {err:#}");
        let message = format!("{err:#}");
        self.load_state = LoadState::Failed(message.clone());
        publish(&mut self.world, PortfolioEvent::RoomLoadFailed { message });
    }

    /// Called by the host once a font has resolved for the given text slot.
    pub fn attach_intro_text(&mut self, slot: TextSlot) -> Option<Entity> {
        let text = match slot {
            TextSlot::Title => self.assets.title_text.clone(),
            TextSlot::Subtitle => self.assets.subtitle_text.clone(),
        };
        let palette = self.theme_config.palette(self.theme);
        let mut refs = self.world.remove_resource::<SceneRefs>()?;
        let entity = spawn_intro_text(&mut self.world, &mut refs, slot, &text, palette);
        self.world.insert_resource(refs);
        publish(&mut self.world, PortfolioEvent::TextAttached { label: text });
        Some(entity)
    }

    // ---------- Interaction ----------

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::MenuClick(id) => match MenuTarget::from_element_id(&id) {
                Some(MenuTarget::View(view)) => {
                    self.navigate(view);
                }
                Some(MenuTarget::Project(_)) => {
                    self.navigate(ViewId::Projects);
                }
                Some(MenuTarget::Close) => self.close(),
                None => warn!("[app] No handler for element '{id}'."),
            },
            UiEvent::WorldClick { hits } => self.handle_world_click(&hits),
            UiEvent::PointerHover { hits } => {
                if self.navigation.state().current != ViewId::Home {
                    return;
                }
                let Some(refs) = self.world.get_resource::<SceneRefs>() else {
                    return;
                };
                apply_hover(&self.world, &mut self.scheduler, refs, &self.catalogue, &hits);
            }
            UiEvent::Drag { delta } => {
                let viewport = self.viewport;
                self.drive_camera(|controls, pose| controls.orbit(pose, delta, viewport));
            }
            UiEvent::Wheel { delta } => {
                let factor = WHEEL_ZOOM_STEP.powf(delta);
                self.drive_camera(|controls, pose| controls.zoom(pose, factor));
            }
        }
    }

    fn handle_world_click(&mut self, hits: &[Entity]) {
        let Some(refs) = self.world.get_resource::<SceneRefs>() else {
            return;
        };
        let Some(target) = hits.iter().find_map(|&hit| resolve_hit(&self.world, refs, &self.catalogue, hit)) else {
            return;
        };
        let at_home = self.navigation.state().current == ViewId::Home;
        match target {
            HitTarget::Project(index) => {
                if let Some(url) = self.catalogue.projects.get(index).and_then(|project| project.link()) {
                    let url = url.to_string();
                    info!("[app] Opening project {index}: {url}");
                    publish(&mut self.world, PortfolioEvent::OpenUrl { url });
                }
            }
            HitTarget::AboutBook if at_home => {
                self.navigate(ViewId::About);
            }
            HitTarget::CvBook if at_home => {
                self.navigate(ViewId::Cv);
            }
            HitTarget::LightSwitch => self.toggle_theme(),
            HitTarget::AboutBook | HitTarget::CvBook | HitTarget::Design(_) => {}
        }
    }

    fn drive_camera(&mut self, step: impl FnOnce(&OrbitControls, &CameraPose) -> Option<CameraPose>) {
        let (Some(controls), Some(pose)) = (self.world.get_resource::<OrbitControls>(), camera_pose(&self.world))
        else {
            return;
        };
        let Some(next) = step(controls, &pose) else {
            return;
        };
        let Some(camera) = self.world.get_resource::<SceneRefs>().map(|refs| refs.camera) else {
            return;
        };
        for (channel, value) in Channel::translation(next.position).into_iter().chain(Channel::rotation(next.rotation)) {
            self.scheduler.set_now(&mut self.world, camera, channel, value);
        }
    }

    pub fn navigate(&mut self, view: ViewId) -> bool {
        let mut ctx = NavContext {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            catalogue: &self.catalogue,
            theme: self.theme,
            palette: self.theme_config.palette(self.theme),
        };
        self.navigation.navigate(&mut ctx, view)
    }

    pub fn navigate_named(&mut self, name: &str) -> bool {
        let mut ctx = NavContext {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            catalogue: &self.catalogue,
            theme: self.theme,
            palette: self.theme_config.palette(self.theme),
        };
        self.navigation.navigate_named(&mut ctx, name)
    }

    pub fn close(&mut self) {
        let mut ctx = NavContext {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            catalogue: &self.catalogue,
            theme: self.theme,
            palette: self.theme_config.palette(self.theme),
        };
        self.navigation.close(&mut ctx);
    }

    // ---------- Theme ----------

    /// Switches the page theme. Returns false when `theme` is already active.
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        let Some(refs) = self.world.get_resource::<SceneRefs>().cloned() else {
            return false;
        };
        self.theme = theme;
        apply_theme(&mut self.world, &mut self.scheduler, &refs, &self.theme_config, theme);
        info!("[app] Theme switched to {theme}.");
        publish(&mut self.world, PortfolioEvent::ThemeChanged { theme });
        true
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn body_class(&self) -> &'static str {
        self.theme.body_class()
    }

    // ---------- Frame ----------

    /// Advances every transition by `dt`, applies due completions and hands the
    /// scene to `sink`.
    pub fn frame(&mut self, dt: f32, sink: Option<&mut dyn FrameSink>) {
        if let Some(mut clock) = self.world.get_resource_mut::<FrameClock>() {
            clock.advance(dt);
        }
        self.schedule.run(&mut self.world);
        for call in self.scheduler.advance(&mut self.world, dt) {
            self.navigation.complete(&mut self.world, call);
        }
        if let Some(sink) = sink {
            let camera = self.camera();
            sink.render(&self.world, &camera);
        }
    }

    pub fn resize(&mut self, viewport: PhysicalSize<u32>) {
        let was_mobile = self.is_mobile();
        self.viewport = viewport;
        if was_mobile == self.is_mobile() {
            return;
        }
        let mobile = self.is_mobile();
        let (about, projects) = if mobile {
            (self.mobile.about, self.mobile.projects)
        } else {
            (self.desktop_poses.about, self.desktop_poses.projects)
        };
        let registry = self.navigation.registry_mut();
        registry.set_pose(ViewId::About, about);
        registry.set_pose(ViewId::Projects, projects);
        let max_distance = if mobile { self.mobile.max_distance } else { self.desktop_orbit.max_distance };
        if let Some(mut controls) = self.world.get_resource_mut::<OrbitControls>() {
            controls.max_distance = max_distance;
        }
        let room_root = self.world.get_resource::<SceneRefs>().and_then(|refs| refs.room_root);
        if let Some(root) = room_root {
            for (channel, value) in Channel::scale(Vec3::splat(self.room_scale())) {
                self.scheduler.set_now(&mut self.world, root, channel, value);
            }
        }
        info!("[app] Switched to {} layout.", if mobile { "mobile" } else { "desktop" });
    }

    // ---------- Accessors ----------

    pub fn camera(&self) -> Camera3D {
        let pose = camera_pose(&self.world).unwrap_or_else(|| self.navigation.registry().home_pose());
        Camera3D::new(pose, CAMERA_FOV_DEGREES.to_radians(), CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn camera_pose(&self) -> Option<CameraPose> {
        camera_pose(&self.world)
    }

    pub fn navigation(&self) -> &NavigationState {
        self.navigation.state()
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile.is_mobile(self.viewport)
    }

    fn room_scale(&self) -> f32 {
        if self.is_mobile() {
            self.mobile.room_scale
        } else {
            1.0
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn loader_visible(&self) -> bool {
        self.load_state.indicator_visible()
    }

    pub fn playing_clips(&self) -> &[String] {
        &self.playing_clips
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn scene_refs(&self) -> Option<&SceneRefs> {
        self.world.get_resource::<SceneRefs>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler(&self) -> &TweenScheduler<ScheduledCall> {
        &self.scheduler
    }

    pub fn drain_events(&mut self) -> Vec<PortfolioEvent> {
        self.world.get_resource_mut::<EventBus>().map(|mut bus| bus.drain()).unwrap_or_default()
    }
}
