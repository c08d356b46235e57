use crate::ecs::{rgb, Channel, Parent};
use crate::gallery::Catalogue;
use crate::navigation::HIGHLIGHT_COLOR;
use crate::room::SceneRefs;
use crate::tween::{TweenRequest, TweenScheduler};
use crate::views::ViewId;
use bevy_ecs::prelude::{Entity, World};
use glam::Vec2;
use log::warn;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pointer and DOM interactions forwarded by the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Click on a DOM element, identified by its id.
    MenuClick(String),
    /// Click on the canvas; `hits` are picked entities nearest first.
    WorldClick { hits: Vec<Entity> },
    PointerHover { hits: Vec<Entity> },
    Drag { delta: Vec2 },
    Wheel { delta: f32 },
}

/// DOM elements that trigger navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    View(ViewId),
    Project(usize),
    Close,
}

impl MenuTarget {
    pub fn from_element_id(id: &str) -> Option<Self> {
        match id.trim() {
            "about-menu" => Some(MenuTarget::View(ViewId::About)),
            "projects-menu" => Some(MenuTarget::View(ViewId::Projects)),
            "design-menu" => Some(MenuTarget::View(ViewId::DesignGallery)),
            "cv-menu" => Some(MenuTarget::View(ViewId::Cv)),
            "close-btn" => Some(MenuTarget::Close),
            other => other.strip_prefix("project-").and_then(|index| index.parse().ok()).map(MenuTarget::Project),
        }
    }

    pub fn element_id(self) -> String {
        match self {
            MenuTarget::View(ViewId::About) => "about-menu".to_string(),
            MenuTarget::View(ViewId::Projects) => "projects-menu".to_string(),
            MenuTarget::View(ViewId::DesignGallery) => "design-menu".to_string(),
            MenuTarget::View(ViewId::Cv) => "cv-menu".to_string(),
            MenuTarget::View(ViewId::Home) | MenuTarget::Close => "close-btn".to_string(),
            MenuTarget::Project(index) => format!("project-{index}"),
        }
    }
}

/// Interactive scene object a pick resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Project(usize),
    Design(usize),
    AboutBook,
    CvBook,
    LightSwitch,
}

const MAX_PARENT_WALK: usize = 32;

/// Walks up from a picked entity until it reaches something interactive.
pub fn resolve_hit(world: &World, refs: &SceneRefs, catalogue: &Catalogue, picked: Entity) -> Option<HitTarget> {
    let mut current = Some(picked);
    for _ in 0..MAX_PARENT_WALK {
        let entity = current?;
        if let Some((index, _)) = catalogue.project_by_mesh(entity) {
            return Some(HitTarget::Project(index));
        }
        if let Some((index, _)) = catalogue.design_by_mesh(entity) {
            return Some(HitTarget::Design(index));
        }
        if refs.book == Some(entity) || refs.book_cover == Some(entity) {
            return Some(HitTarget::AboutBook);
        }
        if refs.cv_book == Some(entity) || refs.cv_glow == Some(entity) {
            return Some(HitTarget::CvBook);
        }
        if refs.switch_board == Some(entity) || refs.light_switch == Some(entity) {
            return Some(HitTarget::LightSwitch);
        }
        current = world.get::<Parent>(entity).map(|parent| parent.0);
    }
    warn!("[input] Parent chain of {picked:?} is deeper than {MAX_PARENT_WALK}; giving up.");
    None
}

/// Hover feedback while the camera sits at home. Design highlights are reset
/// before the hovered ones are lit, and the CV book glows while pointed at.
pub fn apply_hover<A>(
    world: &World,
    scheduler: &mut TweenScheduler<A>,
    refs: &SceneRefs,
    catalogue: &Catalogue,
    hits: &[Entity],
) {
    const HOVER_SECONDS: f32 = 0.3;
    const HOVER_INTENSITY: f32 = 0.3;
    const CV_GLOW_OPACITY: f32 = 0.3;
    const CV_SPOT_INTENSITY: f32 = 3.0;

    for (_, mesh) in catalogue.design_meshes() {
        scheduler.animate(TweenRequest::new(mesh, HOVER_SECONDS).to(Channel::EmissiveIntensity { slot: 0 }, 0.0));
    }

    let mut cv_hovered = false;
    for &hit in hits {
        match resolve_hit(world, refs, catalogue, hit) {
            Some(HitTarget::Design(index)) => {
                if let Some(mesh) = catalogue.designs.get(index).and_then(|design| design.mesh) {
                    scheduler.animate(
                        TweenRequest::new(mesh, HOVER_SECONDS)
                            .to_all(Channel::emissive(0, rgb(HIGHLIGHT_COLOR)))
                            .to(Channel::EmissiveIntensity { slot: 0 }, HOVER_INTENSITY),
                    );
                }
            }
            Some(HitTarget::CvBook) => cv_hovered = true,
            _ => {}
        }
    }

    let (glow, spot) = if cv_hovered { (CV_GLOW_OPACITY, CV_SPOT_INTENSITY) } else { (0.0, 0.0) };
    if let Some(cv_glow) = refs.cv_glow {
        scheduler.animate(TweenRequest::new(cv_glow, HOVER_SECONDS).to(Channel::Opacity { slot: 0 }, glow));
    }
    if refs.cv_book.is_some() {
        scheduler.animate(TweenRequest::new(refs.cv_spotlight, HOVER_SECONDS).to(Channel::LightIntensity, spot));
    }
}

/// Raw pointer input as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    CursorPos { x: f32, y: f32 },
    Button { button: MouseButton, pressed: bool },
    Wheel { delta: f32 },
    Other,
}

impl PointerEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                PointerEvent::Wheel { delta: d }
            }
            WindowEvent::CursorMoved { position, .. } => {
                PointerEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                PointerEvent::Button { button: *button, pressed: *state == ElementState::Pressed }
            }
            _ => PointerEvent::Other,
        }
    }
}

/// Turns raw pointer input into drag and wheel interactions.
#[derive(Debug, Default)]
pub struct PointerInput {
    cursor: Option<Vec2>,
    dragging: bool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn push(&mut self, ev: PointerEvent) -> Option<UiEvent> {
        match ev {
            PointerEvent::CursorPos { x, y } => {
                let position = Vec2::new(x, y);
                let previous = self.cursor.replace(position);
                match previous {
                    Some(previous) if self.dragging => Some(UiEvent::Drag { delta: position - previous }),
                    _ => None,
                }
            }
            PointerEvent::Button { button: MouseButton::Left, pressed } => {
                self.dragging = pressed;
                None
            }
            PointerEvent::Wheel { delta } if delta != 0.0 => Some(UiEvent::Wheel { delta }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPose;
    use crate::ecs::Transform3D;
    use crate::gallery::GalleryItem;
    use crate::room::spawn_static_scene;
    use crate::theme::ThemePalette;
    use glam::Vec3;

    #[test]
    fn element_ids_map_to_targets() {
        assert_eq!(MenuTarget::from_element_id("about-menu"), Some(MenuTarget::View(ViewId::About)));
        assert_eq!(MenuTarget::from_element_id("project-2"), Some(MenuTarget::Project(2)));
        assert_eq!(MenuTarget::from_element_id("close-btn"), Some(MenuTarget::Close));
        assert_eq!(MenuTarget::from_element_id("project-x"), None);
        assert_eq!(MenuTarget::from_element_id("contact-menu"), None);
        assert_eq!(MenuTarget::Project(3).element_id(), "project-3");
    }

    #[test]
    fn hits_resolve_through_parents() {
        let mut world = World::new();
        let mut refs = spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 0, &ThemePalette::light());
        let board = world.spawn(Transform3D::default()).id();
        let switch = world.spawn((Transform3D::default(), Parent(board))).id();
        let knob = world.spawn((Transform3D::default(), Parent(switch))).id();
        refs.switch_board = Some(board);

        let catalogue = Catalogue::default();
        assert_eq!(resolve_hit(&world, &refs, &catalogue, knob), Some(HitTarget::LightSwitch));
        let stray = world.spawn(Transform3D::default()).id();
        assert_eq!(resolve_hit(&world, &refs, &catalogue, stray), None);
    }

    #[test]
    fn hover_lights_only_the_hovered_design() {
        let mut world = World::new();
        let refs = spawn_static_scene(&mut world, CameraPose::new(Vec3::ONE, Vec3::ZERO), 0, &ThemePalette::light());
        let a = world.spawn(Transform3D::default()).id();
        let b = world.spawn(Transform3D::default()).id();
        let mut designs = vec![GalleryItem::new("a.jpg", "A"), GalleryItem::new("b.jpg", "B")];
        designs[0].mesh = Some(a);
        designs[1].mesh = Some(b);
        let catalogue = Catalogue::new(Vec::new(), designs);

        let mut scheduler = TweenScheduler::<()>::new();
        apply_hover(&world, &mut scheduler, &refs, &catalogue, &[b]);
        assert_eq!(scheduler.target_of(a, Channel::EmissiveIntensity { slot: 0 }), Some(0.0));
        assert_eq!(scheduler.target_of(b, Channel::EmissiveIntensity { slot: 0 }), Some(0.3));
    }

    #[test]
    fn drags_need_the_left_button() {
        let mut pointer = PointerInput::new();
        assert_eq!(pointer.push(PointerEvent::CursorPos { x: 10.0, y: 10.0 }), None);
        assert_eq!(pointer.push(PointerEvent::CursorPos { x: 12.0, y: 10.0 }), None);
        pointer.push(PointerEvent::Button { button: MouseButton::Left, pressed: true });
        assert_eq!(
            pointer.push(PointerEvent::CursorPos { x: 15.0, y: 14.0 }),
            Some(UiEvent::Drag { delta: Vec2::new(3.0, 4.0) })
        );
        pointer.push(PointerEvent::Button { button: MouseButton::Left, pressed: false });
        assert_eq!(pointer.push(PointerEvent::CursorPos { x: 20.0, y: 20.0 }), None);
        assert_eq!(pointer.push(PointerEvent::Wheel { delta: -1.0 }), Some(UiEvent::Wheel { delta: -1.0 }));
    }
}
