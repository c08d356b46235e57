use crate::theme::Theme;
use crate::views::ViewId;
use bevy_ecs::prelude::Resource;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioEvent {
    ViewEntered { view: ViewId },
    ViewClosed { from: ViewId },
    NavigationIgnored { view: String, reason: &'static str },
    InputEnabled,
    InputDisabled,
    CloseButtonShown,
    CloseButtonHidden,
    ThemeChanged { theme: Theme },
    OpenUrl { url: String },
    RoomLoaded { nodes: usize },
    RoomLoadFailed { message: String },
    TextAttached { label: String },
}

impl fmt::Display for PortfolioEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioEvent::ViewEntered { view } => write!(f, "ViewEntered view={view}"),
            PortfolioEvent::ViewClosed { from } => write!(f, "ViewClosed from={from}"),
            PortfolioEvent::NavigationIgnored { view, reason } => {
                write!(f, "NavigationIgnored view={view} reason={reason}")
            }
            PortfolioEvent::InputEnabled => f.write_str("InputEnabled"),
            PortfolioEvent::InputDisabled => f.write_str("InputDisabled"),
            PortfolioEvent::CloseButtonShown => f.write_str("CloseButtonShown"),
            PortfolioEvent::CloseButtonHidden => f.write_str("CloseButtonHidden"),
            PortfolioEvent::ThemeChanged { theme } => write!(f, "ThemeChanged theme={theme}"),
            PortfolioEvent::OpenUrl { url } => write!(f, "OpenUrl url={url}"),
            PortfolioEvent::RoomLoaded { nodes } => write!(f, "RoomLoaded nodes={nodes}"),
            PortfolioEvent::RoomLoadFailed { message } => write!(f, "RoomLoadFailed {message}"),
            PortfolioEvent::TextAttached { label } => write!(f, "TextAttached label={label}"),
        }
    }
}

#[derive(Default, Resource)]
pub struct EventBus {
    events: Vec<PortfolioEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: PortfolioEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<PortfolioEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending(&self) -> &[PortfolioEvent] {
        &self.events
    }
}
