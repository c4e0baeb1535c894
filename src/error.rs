use crate::graph::{LinkId, NodeId, PinId};
use crate::value::Value;
use thiserror::Error;

/// Errors raised by authoring-time mutations of a [`GraphContext`](crate::graph::GraphContext).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0:?} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("Pin {0:?} does not exist in this graph")]
    UnknownPin(PinId),

    #[error("Link {0:?} does not exist in this graph")]
    UnknownLink(LinkId),

    #[error("Pins {a:?} and {b:?} cannot be linked: {reason}")]
    IllegalLink { a: PinId, b: PinId, reason: String },
}

/// Fatal errors raised while compiling a graph into its runtime form.
///
/// Any of these aborts the build; the caller stays in edit mode and no
/// runtime graph is produced.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Node '{node}' references pin {pin:?}, which does not exist")]
    UnresolvedPin { node: String, pin: PinId },

    #[error("Node '{node}' has an invalid {expected} literal: '{text}'")]
    InvalidLiteral {
        node: String,
        expected: &'static str,
        text: String,
    },

    #[error("Node '{node}' selects variable '{variable}', which no longer exists")]
    UnboundVariable { node: String, variable: String },

    #[error("Node '{node}' has no variable selected")]
    NoVariableSelected { node: String },

    #[error("Node '{node}' calls custom event '{event}', which no longer exists")]
    UnboundEvent { node: String, event: String },

    #[error("Node '{node}' selects sprite '{sprite}', which no longer exists")]
    UnboundSprite { node: String, sprite: String },

    #[error("Failed to load texture '{path}' for node '{node}': {message}")]
    TextureLoad {
        node: String,
        path: String,
        message: String,
    },

    #[error("The graph has {count} Tick nodes; exactly one per graph is allowed")]
    DuplicateEntryPoint { count: usize },

    #[error("The flow chain through node '{node}' loops back on itself")]
    FlowCycle { node: String },
}

/// Errors raised during frame execution.
///
/// Only the variants that gate *entering* run mode abort anything; errors
/// hit mid-walk are downgraded to log entries so one bad node cannot take
/// down an otherwise-working frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("The graph has no Tick node; nothing would execute each frame")]
    NoEntryPoint,

    #[error("The source graph changed after this build; rebuild before running")]
    StaleBuild,

    #[error("Type mismatch in '{operation}': expected {expected}, found value '{found}'")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        found: Value,
    },

    #[error("Value slot {0} is out of bounds for this build")]
    SlotOutOfBounds(usize),

    #[error("Scene component {0} does not exist in this build")]
    UnknownComponent(usize),
}

/// Errors raised while saving or loading a graph file.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Could not read graph file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Graph file encode failed: {0}")]
    Encode(String),

    #[error("Graph file decode failed: {0}")]
    Decode(String),
}
