//! Input events and the listener registry.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Event types the engine listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Click,
    KeyDown,
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ShiftTab,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

/// An input event delivered to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomEvent {
    Click,
    KeyDown(Key),
}

impl DomEvent {
    /// The listener type this event is dispatched to.
    pub fn event_type(&self) -> EventType {
        match self {
            DomEvent::Click => EventType::Click,
            DomEvent::KeyDown(_) => EventType::KeyDown,
        }
    }
}

/// A registered listener. `owner` names who registered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub node: NodeId,
    pub event_type: EventType,
    pub owner: String,
}
