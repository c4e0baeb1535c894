//! The flattened, resolved mirror of an authoring graph.
//!
//! Built once per compile. All id indirection is resolved to plain array
//! indices; the interpreter never touches the authoring graph. A compiled
//! graph snapshots the source revision it was built from, and refuses to
//! be mistaken for current once the source changes.

use crate::graph::{GraphContext, NodeKind, PinId, PinKind};
use crate::scene::{Hitbox, Scene};
use crate::value::ValueStore;

/// A resolved pin.
#[derive(Debug, Clone)]
pub struct RuntimePin {
    /// Id of the authoring pin this mirrors.
    pub source: PinId,
    pub kind: PinKind,
    /// Owning runtime node index.
    pub node: usize,
    pub is_input: bool,
    pub ordinal: usize,
    /// Slot in the value store this pin reads or writes. Defaults to the
    /// error sentinel until allocation or link application binds it.
    pub value_index: usize,
    /// For output flow pins: the node the linked chain continues at.
    /// For event-picker pins: the resolved custom-event node.
    pub next_node: Option<usize>,
    /// For sprite/prop-producing or -selecting pins: the scene component.
    pub component: Option<usize>,
    /// Text state copied from the authoring pin.
    pub text: String,
    pub picked_option: usize,
    pub hitbox: Option<Hitbox>,
}

/// A resolved node.
#[derive(Debug, Clone)]
pub struct RuntimeNode {
    pub kind: NodeKind,
    pub name: String,
    /// Indices into the runtime pin array, in ordinal order.
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

/// The output of one successful build: the resolved graph plus the value
/// store and scene it executes against.
#[derive(Debug)]
pub struct CompiledGraph {
    pub(crate) nodes: Vec<RuntimeNode>,
    pub(crate) pins: Vec<RuntimePin>,
    pub(crate) values: ValueStore,
    pub(crate) scene: Scene,
    /// Index of the graph's single Tick node, if it has one.
    pub(crate) tick: Option<usize>,
    source_revision: u64,
}

impl CompiledGraph {
    pub(crate) fn new(source_revision: u64) -> Self {
        Self {
            nodes: Vec::new(),
            pins: Vec::new(),
            values: ValueStore::default(),
            scene: Scene::new(),
            tick: None,
            source_revision,
        }
    }

    pub fn nodes(&self) -> &[RuntimeNode] {
        &self.nodes
    }

    pub fn pins(&self) -> &[RuntimePin] {
        &self.pins
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn source_revision(&self) -> u64 {
        self.source_revision
    }

    /// Whether the source graph has been edited since this build. A stale
    /// build must not be run.
    pub fn is_stale(&self, graph: &GraphContext) -> bool {
        graph.revision() != self.source_revision
    }

    pub fn input_pin(&self, node: usize, ordinal: usize) -> Option<&RuntimePin> {
        self.nodes
            .get(node)
            .and_then(|n| n.inputs.get(ordinal))
            .map(|&p| &self.pins[p])
    }

    pub fn output_pin(&self, node: usize, ordinal: usize) -> Option<&RuntimePin> {
        self.nodes
            .get(node)
            .and_then(|n| n.outputs.get(ordinal))
            .map(|&p| &self.pins[p])
    }

    /// The node an output flow pin's chain continues at, if linked.
    pub fn flow_successor(&self, node: usize, ordinal: usize) -> Option<usize> {
        self.output_pin(node, ordinal)
            .filter(|p| p.kind == PinKind::Flow)
            .and_then(|p| p.next_node)
    }
}
