//! Pin definitions for the authoring graph.

use crate::scene::Hitbox;
use serde::{Deserialize, Serialize};

/// Unique, graph-scoped pin identifier. Never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub u64);

/// What a pin carries, and how the editor renders it.
///
/// `Flow` pins order execution; the typed value kinds carry data over links;
/// the `Field*` kinds are inline text boxes; the `Dropdown*`, `Variable` and
/// `SpriteVariable` kinds are pickers; `EditHitbox` opens the polygon editor.
/// Only flow and value kinds are linkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinKind {
    Flow,
    Number,
    String,
    Bool,
    Color,
    Sprite,
    /// Any value kind; matches every value kind when linking.
    AnyValue,
    /// Dropdown over the graph's variable table.
    Variable,
    /// Dropdown over sprite- and prop-producing nodes, picked by name.
    SpriteVariable,
    /// Dropdown over custom-event nodes, picked by name.
    Event,
    FieldNumber,
    FieldString,
    FieldBool,
    FieldColor,
    FieldKey,
    /// Dropdown over key actions (pressed / released / down / up).
    DropdownAction,
    /// Dropdown over collision layers.
    DropdownLayer,
    EditHitbox,
    None,
}

impl PinKind {
    /// Whether a link may attach to a pin of this kind at all.
    pub fn linkable(self) -> bool {
        matches!(
            self,
            PinKind::Flow
                | PinKind::Number
                | PinKind::String
                | PinKind::Bool
                | PinKind::Color
                | PinKind::Sprite
                | PinKind::AnyValue
        )
    }

    /// Whether values of this kind occupy a value-store slot when they are
    /// an output pin.
    pub fn carries_value(self) -> bool {
        self.linkable() && self != PinKind::Flow
    }

    /// Link compatibility: identical kinds, or `AnyValue` against any value
    /// kind. Flow only matches flow.
    pub fn matches(self, other: PinKind) -> bool {
        if self == PinKind::Flow || other == PinKind::Flow {
            return self == other;
        }
        self == other
            || (self == PinKind::AnyValue && other.carries_value())
            || (other == PinKind::AnyValue && self.carries_value())
    }
}

/// An authoring-time pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub node: super::NodeId,
    pub kind: PinKind,
    pub is_input: bool,
    /// Ordinal position within the owning node's input or output list.
    pub ordinal: usize,
    /// Raw text storage: literal values, key binds.
    pub text: String,
    /// Selected option for dropdown-like pins.
    pub picked_option: usize,
    /// Hitbox polygon, present only on `EditHitbox` pins.
    pub hitbox: Option<Hitbox>,
}

impl Pin {
    pub(crate) fn new(
        id: PinId,
        node: super::NodeId,
        kind: PinKind,
        is_input: bool,
        ordinal: usize,
    ) -> Self {
        Self {
            id,
            node,
            kind,
            is_input,
            ordinal,
            text: String::new(),
            picked_option: 0,
            hitbox: None,
        }
    }
}
