//! Node definitions: the closed set of node kinds and their pin templates.

use super::pin::PinKind;
use serde::{Deserialize, Serialize};

/// Unique, graph-scoped node identifier. Never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Every node kind the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    // Literals: parsed from their text field at build time.
    LiteralNumber,
    LiteralString,
    LiteralBool,
    LiteralColor,

    // Variable creation: the output slot persists across frames.
    CreateNumber,
    CreateString,
    CreateBool,
    CreateColor,

    // Variable access, resolved by name at build time.
    GetVariable,
    SetVariable,

    // Events.
    Start,
    Tick,
    OnKey,
    CreateCustomEvent,
    CallCustomEvent,

    // Flow control.
    Branch,
    Loop,

    // Sprite operations.
    CreateSprite,
    SetSpritePosition,
    GetSpritePosition,
    SetSpriteTexture,
    SetSpriteVisibility,
    ForceSprite,
    CheckCollision,

    // Draw props.
    CreateRectProp,
    CreateCircleProp,

    // Arithmetic.
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison.
    Equals,
    NotEquals,
    Greater,
    Less,

    // Logic.
    And,
    Or,
    Not,

    // Special getters, bound to fixed value-store slots.
    MousePosition,
    ScreenSize,

    // Debug.
    PrintValue,
}

/// The fixed pin layout of one node kind: `(inputs, outputs)`.
pub type PinTemplate = (&'static [PinKind], &'static [PinKind]);

impl NodeKind {
    /// The pin template instantiated when a node of this kind is placed.
    ///
    /// Ordinals are load-bearing: the compiler and interpreter address pins
    /// by position. Flow output ordinal 0 is always the "continue" pin;
    /// `Branch` uses 0 = true, 1 = false; `Loop` uses 0 = done, 1 = body.
    pub fn pins(self) -> PinTemplate {
        use PinKind::*;
        match self {
            NodeKind::LiteralNumber => (&[FieldNumber], &[Number]),
            NodeKind::LiteralString => (&[FieldString], &[String]),
            NodeKind::LiteralBool => (&[FieldBool], &[Bool]),
            NodeKind::LiteralColor => (&[FieldColor], &[Color]),

            NodeKind::CreateNumber => (&[Number], &[Number]),
            NodeKind::CreateString => (&[String], &[String]),
            NodeKind::CreateBool => (&[Bool], &[Bool]),
            NodeKind::CreateColor => (&[Color], &[Color]),

            NodeKind::GetVariable => (&[Variable], &[AnyValue]),
            NodeKind::SetVariable => (&[Flow, Variable, AnyValue], &[Flow, AnyValue]),

            NodeKind::Start => (&[], &[Flow]),
            NodeKind::Tick => (&[], &[Flow]),
            NodeKind::OnKey => (&[FieldKey, DropdownAction], &[Flow]),
            NodeKind::CreateCustomEvent => (&[], &[Flow]),
            NodeKind::CallCustomEvent => (&[Flow, Event], &[Flow]),

            NodeKind::Branch => (&[Flow, Bool], &[Flow, Flow]),
            NodeKind::Loop => (&[Flow, Bool], &[Flow, Flow]),

            NodeKind::CreateSprite => {
                (&[String, Number, Number, DropdownLayer, EditHitbox], &[Sprite])
            }
            NodeKind::SetSpritePosition => (&[Flow, SpriteVariable, Number, Number], &[Flow]),
            NodeKind::GetSpritePosition => (&[Flow, SpriteVariable], &[Flow, Number, Number]),
            NodeKind::SetSpriteTexture => (&[Flow, SpriteVariable, String], &[Flow]),
            NodeKind::SetSpriteVisibility => (&[Flow, SpriteVariable, Bool], &[Flow]),
            NodeKind::ForceSprite => {
                (&[Flow, SpriteVariable, Number, Number, Number], &[Flow])
            }
            NodeKind::CheckCollision => (&[Flow, SpriteVariable], &[Flow, Bool]),

            NodeKind::CreateRectProp => {
                (&[Number, Number, Color, DropdownLayer], &[Sprite])
            }
            NodeKind::CreateCircleProp => (&[Number, Color, DropdownLayer], &[Sprite]),

            NodeKind::Add
            | NodeKind::Subtract
            | NodeKind::Multiply
            | NodeKind::Divide
            | NodeKind::Modulo => (&[Flow, Number, Number], &[Flow, Number]),

            NodeKind::Equals | NodeKind::NotEquals => (&[Flow, AnyValue, AnyValue], &[Flow, Bool]),
            NodeKind::Greater | NodeKind::Less => (&[Flow, Number, Number], &[Flow, Bool]),

            NodeKind::And | NodeKind::Or => (&[Flow, Bool, Bool], &[Flow, Bool]),
            NodeKind::Not => (&[Flow, Bool], &[Flow, Bool]),

            NodeKind::MousePosition => (&[], &[Number, Number]),
            NodeKind::ScreenSize => (&[], &[Number, Number]),

            NodeKind::PrintValue => (&[Flow, AnyValue], &[Flow]),
        }
    }

    /// Kinds whose output slot is a persistent, named variable.
    pub fn creates_variable(self) -> bool {
        matches!(
            self,
            NodeKind::CreateNumber
                | NodeKind::CreateString
                | NodeKind::CreateBool
                | NodeKind::CreateColor
        ) || self.creates_component()
    }

    /// Kinds that materialize a scene component at build time.
    pub fn creates_component(self) -> bool {
        matches!(
            self,
            NodeKind::CreateSprite | NodeKind::CreateRectProp | NodeKind::CreateCircleProp
        )
    }

    /// Kinds whose value is parsed from pin text at build time.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::LiteralNumber
                | NodeKind::LiteralString
                | NodeKind::LiteralBool
                | NodeKind::LiteralColor
        )
    }

    /// Kinds whose outputs alias the fixed special slots.
    pub fn is_special_getter(self) -> bool {
        matches!(self, NodeKind::MousePosition | NodeKind::ScreenSize)
    }

    /// Whether the display name doubles as an identity (variable, sprite or
    /// event name) and may be edited by the user.
    pub fn name_editable(self) -> bool {
        self.creates_variable() || self == NodeKind::CreateCustomEvent
    }

    /// Default display name for freshly placed nodes.
    pub fn default_name(self) -> &'static str {
        match self {
            NodeKind::LiteralNumber => "Number",
            NodeKind::LiteralString => "String",
            NodeKind::LiteralBool => "Bool",
            NodeKind::LiteralColor => "Color",
            NodeKind::CreateNumber => "New Number",
            NodeKind::CreateString => "New String",
            NodeKind::CreateBool => "New Bool",
            NodeKind::CreateColor => "New Color",
            NodeKind::GetVariable => "Get Variable",
            NodeKind::SetVariable => "Set Variable",
            NodeKind::Start => "Start",
            NodeKind::Tick => "Tick",
            NodeKind::OnKey => "On Key",
            NodeKind::CreateCustomEvent => "New Event",
            NodeKind::CallCustomEvent => "Call Event",
            NodeKind::Branch => "Branch",
            NodeKind::Loop => "Loop",
            NodeKind::CreateSprite => "New Sprite",
            NodeKind::SetSpritePosition => "Set Position",
            NodeKind::GetSpritePosition => "Get Position",
            NodeKind::SetSpriteTexture => "Set Texture",
            NodeKind::SetSpriteVisibility => "Set Visibility",
            NodeKind::ForceSprite => "Force Sprite",
            NodeKind::CheckCollision => "Check Collision",
            NodeKind::CreateRectProp => "New Rect Prop",
            NodeKind::CreateCircleProp => "New Circle Prop",
            NodeKind::Add => "Add",
            NodeKind::Subtract => "Subtract",
            NodeKind::Multiply => "Multiply",
            NodeKind::Divide => "Divide",
            NodeKind::Modulo => "Modulo",
            NodeKind::Equals => "Equals",
            NodeKind::NotEquals => "Not Equals",
            NodeKind::Greater => "Greater",
            NodeKind::Less => "Less",
            NodeKind::And => "And",
            NodeKind::Or => "Or",
            NodeKind::Not => "Not",
            NodeKind::MousePosition => "Mouse Position",
            NodeKind::ScreenSize => "Screen Size",
            NodeKind::PrintValue => "Print",
        }
    }
}

/// An authoring-time node instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Canvas position, editor-owned.
    pub position: [f32; 2],
    /// Display name; doubles as the variable/sprite/event identity for
    /// kinds where [`NodeKind::name_editable`] holds.
    pub name: String,
    /// Input pin ids in ordinal order. Fixed per kind.
    pub inputs: Vec<super::PinId>,
    /// Output pin ids in ordinal order. Fixed per kind.
    pub outputs: Vec<super::PinId>,
}
