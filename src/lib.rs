//! # Karakuri - Node-Graph Scripting Engine
//!
//! **Karakuri** compiles visual node graphs into a flattened runtime
//! representation and interprets them each frame to drive a simple 2D
//! scene of sprites and props. Users author programs by placing typed
//! nodes (variables, events, control flow, sprite operations, arithmetic,
//! comparisons) and wiring them with typed pins; the engine takes it from
//! there.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: build or load a [`GraphContext`](graph::GraphContext) —
//!     the editable node/pin/link model. The embedding editor mutates it;
//!     the engine only ever reads it.
//! 2.  **Build**: [`compiler::compile`] resolves every id to an index,
//!     allocates the value store, binds variables by name and materializes
//!     the scene. Any problem rejects the build and the host stays in edit
//!     mode.
//! 3.  **Run**: a [`Runtime`](runtime::Runtime) takes ownership of the
//!     build and executes it one frame at a time, walking flow-pin chains,
//!     firing key events, integrating forces and resolving collisions.
//! 4.  **Observe**: the runtime accumulates a leveled log the host drains
//!     into its log panel; per-node problems never abort a frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use karakuri::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = GraphContext::new();
//!
//!     // A variable "Score" seeded from a literal 42.
//!     let literal = graph.add_node(NodeKind::LiteralNumber);
//!     let field = graph.node(literal).unwrap().inputs[0];
//!     graph.set_pin_text(field, "42")?;
//!
//!     let score = graph.add_node(NodeKind::CreateNumber);
//!     graph.rename_node(score, "Score")?;
//!
//!     let out = graph.node(literal).unwrap().outputs[0];
//!     let init = graph.node(score).unwrap().inputs[0];
//!     graph.create_link(out, init)?;
//!
//!     // Every graph needs a Tick entry point to run.
//!     graph.add_node(NodeKind::Tick);
//!
//!     let project = Project::new(".");
//!     let compiled = karakuri::compiler::compile(&graph, &project)?;
//!
//!     let mut runtime = Runtime::new(compiled, project, Settings::default())?;
//!     runtime.run_frame(&FrameInput::default());
//!
//!     for entry in runtime.drain_log() {
//!         println!("{entry}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod graph;
pub mod log;
pub mod prelude;
pub mod project;
pub mod runtime;
pub mod scene;
pub mod settings;
pub mod value;
