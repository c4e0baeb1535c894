//! Prelude module for convenient imports
//!
//! Re-exports the types most embedders touch: the authoring graph, the
//! compiler entry point, the runtime, and their support types.

// Authoring model
pub use crate::graph::{
    GraphContext, Link, LinkId, Node, NodeId, NodeKind, Pin, PinId, PinKind, VariableEntry,
    VariableKind,
};
pub use crate::graph::persist::GraphFile;

// Compilation
pub use crate::compiler::{compile, CompiledGraph};

// Execution
pub use crate::runtime::{FrameInput, KeyAction, Runtime};

// Scene
pub use crate::scene::{
    CollisionOutcome, Force, Hitbox, HitboxShape, Layer, Prop, PropShape, Scene, SceneComponent,
    Sprite, Texture, Vec2,
};

// Values
pub use crate::value::{Color, Value, ValueStore};

// Support
pub use crate::error::{BuildError, GraphError, PersistError, RuntimeError};
pub use crate::log::{LogEntry, LogLevel};
pub use crate::project::Project;
pub use crate::settings::Settings;
