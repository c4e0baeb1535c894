//! The runtime value store: a flat, tagged-value array sized once per build.
//!
//! Every non-flow output pin in the compiled graph owns exactly one slot in
//! the store; data links make input pins mirror the slot of the output they
//! are wired to. Slot indices are stable for the lifetime of one build and
//! invalidated by the next.

use crate::error::RuntimeError;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    /// Parses `RRGGBB` or `RRGGBBAA` hex, with or without a leading `#`.
    pub fn from_hex(text: &str) -> Option<Color> {
        let hex = text.trim().trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 255 }),
            8 => Some(Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// A runtime value. The `Sprite` payload is the scene-component back
/// reference; `None` means the handle is not bound to a live component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    String(String),
    Bool(bool),
    Color(Color),
    Sprite(Option<usize>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Color(_) => "Color",
            Value::Sprite(_) => "Sprite",
        }
    }

    pub fn as_number(&self, operation: &str) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(mismatch(operation, "Number", other)),
        }
    }

    pub fn as_bool(&self, operation: &str) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(operation, "Bool", other)),
        }
    }

    pub fn as_str(&self, operation: &str) -> Result<&str, RuntimeError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(mismatch(operation, "String", other)),
        }
    }

    pub fn as_color(&self, operation: &str) -> Result<Color, RuntimeError> {
        match self {
            Value::Color(c) => Ok(*c),
            other => Err(mismatch(operation, "Color", other)),
        }
    }

    /// Resolves a sprite handle to its component index.
    pub fn as_component(&self, operation: &str) -> Result<usize, RuntimeError> {
        match self {
            Value::Sprite(Some(index)) => Ok(*index),
            other => Err(mismatch(operation, "Sprite", other)),
        }
    }
}

fn mismatch(operation: &str, expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operation: operation.to_string(),
        expected,
        found: found.clone(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{:.2}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Color(c) => write!(f, "{}", c),
            Value::Sprite(Some(index)) => write!(f, "sprite #{}", index),
            Value::Sprite(None) => write!(f, "sprite (unbound)"),
        }
    }
}

/// One entry in the value store.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub value: Value,
    /// Display name, taken from the owning node at build time.
    pub name: String,
    /// Persistent variables survive across frames and are listed in the
    /// host UI; plain slots are scratch storage for node outputs.
    pub is_variable: bool,
}

/// Fixed slot for the error sentinel every unresolved pin points at.
pub const SLOT_ERROR: usize = 0;
pub const SLOT_MOUSE_X: usize = 1;
pub const SLOT_MOUSE_Y: usize = 2;
pub const SLOT_SCREEN_W: usize = 3;
pub const SLOT_SCREEN_H: usize = 4;
/// Number of special slots allocated ahead of any node output.
pub const SPECIAL_SLOTS: usize = 5;

/// The contiguous slot array for one build.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    slots: Vec<Slot>,
}

impl ValueStore {
    /// Creates a store holding the special slots plus `extra` node slots.
    pub fn with_capacity(extra: usize) -> Self {
        let mut slots = Vec::with_capacity(SPECIAL_SLOTS + extra);
        for name in ["<error>", "mouse x", "mouse y", "screen width", "screen height"] {
            slots.push(Slot {
                value: if name == "<error>" { Value::Null } else { Value::Number(0.0) },
                name: name.to_string(),
                is_variable: false,
            });
        }
        Self { slots }
    }

    /// Appends a slot and returns its index.
    pub fn allocate(&mut self, value: Value, name: &str, is_variable: bool) -> usize {
        self.slots.push(Slot {
            value,
            name: name.to_string(),
            is_variable,
        });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Value, RuntimeError> {
        self.slots
            .get(index)
            .map(|s| &s.value)
            .ok_or(RuntimeError::SlotOutOfBounds(index))
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(RuntimeError::SlotOutOfBounds(index))?;
        slot.value = value;
        Ok(())
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Stable list of slot indices flagged as variables, in allocation order.
    pub fn variable_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_variable)
            .map(|(i, _)| i)
            .collect()
    }

    /// Formats a slot for display or logging. Sprite handles resolve through
    /// the scene to a one-line visibility, position and rotation summary.
    pub fn stringify(&self, index: usize, scene: &Scene) -> String {
        let Some(slot) = self.slots.get(index) else {
            return format!("<slot {} out of bounds>", index);
        };
        match &slot.value {
            Value::Sprite(Some(component)) => scene
                .describe(*component)
                .unwrap_or_else(|| format!("sprite #{} (dead)", component)),
            other => other.to_string(),
        }
    }
}
