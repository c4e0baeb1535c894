//! The authoring-time graph model.
//!
//! A [`GraphContext`] owns every node, pin and link the editor works on,
//! plus the derived variable table. It is pure data: the editor mutates it,
//! the compiler reads it. Ids are monotonic and never reused, so a stale id
//! held across a deletion resolves to "not found" rather than a recycled
//! slot. Deletion uses swap-with-last; iteration order is not stable across
//! deletions.

mod link;
mod node;
pub mod persist;
mod pin;

pub use link::{Link, LinkId};
pub use node::{Node, NodeId, NodeKind};
pub use pin::{Pin, PinId, PinKind};

use crate::error::GraphError;
use crate::scene::Hitbox;
use serde::{Deserialize, Serialize};

/// The value kind of a named variable, as listed in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    None,
    Number,
    String,
    Bool,
    Color,
    Sprite,
}

/// One entry of the derived variable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    pub kind: VariableKind,
}

/// The editable node graph.
#[derive(Debug, Clone, Default)]
pub struct GraphContext {
    nodes: Vec<Node>,
    pins: Vec<Pin>,
    links: Vec<Link>,
    next_node_id: u64,
    next_pin_id: u64,
    next_link_id: u64,
    /// Derived from variable-producing nodes; index 0 is the reserved
    /// "none" sentinel. Rebuilt on create/rename/delete, never persisted.
    variables: Vec<VariableEntry>,
    /// Bumped on every mutation; compiled graphs snapshot it to detect
    /// staleness.
    revision: u64,
}

impl GraphContext {
    pub fn new() -> Self {
        let mut graph = Self::default();
        graph.rebuild_variables();
        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn variables(&self) -> &[VariableEntry] {
        &self.variables
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    fn pin_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| p.id == id)
    }

    /// The pin at `ordinal` of a node's input list.
    pub fn input_pin(&self, node: NodeId, ordinal: usize) -> Option<&Pin> {
        self.node(node)
            .and_then(|n| n.inputs.get(ordinal))
            .and_then(|id| self.pin(*id))
    }

    /// The pin at `ordinal` of a node's output list.
    pub fn output_pin(&self, node: NodeId, ordinal: usize) -> Option<&Pin> {
        self.node(node)
            .and_then(|n| n.outputs.get(ordinal))
            .and_then(|id| self.pin(*id))
    }

    /// Places a node of the given kind, instantiating its pin template.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.add_node_at(kind, [0.0, 0.0])
    }

    pub fn add_node_at(&mut self, kind: NodeKind, position: [f32; 2]) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let (input_kinds, output_kinds) = kind.pins();
        let mut inputs = Vec::with_capacity(input_kinds.len());
        let mut outputs = Vec::with_capacity(output_kinds.len());
        for (ordinal, pin_kind) in input_kinds.iter().enumerate() {
            inputs.push(self.add_pin(id, *pin_kind, true, ordinal));
        }
        for (ordinal, pin_kind) in output_kinds.iter().enumerate() {
            outputs.push(self.add_pin(id, *pin_kind, false, ordinal));
        }

        self.nodes.push(Node {
            id,
            kind,
            position,
            name: kind.default_name().to_string(),
            inputs,
            outputs,
        });

        if kind.creates_variable() {
            self.rebuild_variables();
        }
        self.touch();
        id
    }

    fn add_pin(&mut self, node: NodeId, kind: PinKind, is_input: bool, ordinal: usize) -> PinId {
        let id = PinId(self.next_pin_id);
        self.next_pin_id += 1;
        self.pins.push(Pin::new(id, node, kind, is_input, ordinal));
        id
    }

    /// Removes a node, its pins, and every link touching those pins.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::UnknownNode(id))?;
        let node = self.nodes.swap_remove(index);

        let mut doomed: Vec<PinId> = node.inputs.clone();
        doomed.extend_from_slice(&node.outputs);
        self.links
            .retain(|l| !doomed.contains(&l.from) && !doomed.contains(&l.to));
        self.pins.retain(|p| p.node != id);

        if node.kind.creates_variable() {
            self.rebuild_variables();
        }
        self.touch();
        Ok(())
    }

    /// Renames a node. For variable-producing nodes this re-keys the
    /// variable table, which transparently reconnects get/set nodes at the
    /// next build.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GraphError::UnknownNode(id))?;
        node.name = name.to_string();
        if node.kind.creates_variable() {
            self.rebuild_variables();
        }
        self.touch();
        Ok(())
    }

    pub fn set_pin_text(&mut self, id: PinId, text: &str) -> Result<(), GraphError> {
        let pin = self.pin_mut(id).ok_or(GraphError::UnknownPin(id))?;
        pin.text = text.to_string();
        self.touch();
        Ok(())
    }

    pub fn set_pin_option(&mut self, id: PinId, option: usize) -> Result<(), GraphError> {
        let pin = self.pin_mut(id).ok_or(GraphError::UnknownPin(id))?;
        pin.picked_option = option;
        self.touch();
        Ok(())
    }

    pub fn set_pin_hitbox(&mut self, id: PinId, hitbox: Hitbox) -> Result<(), GraphError> {
        let pin = self.pin_mut(id).ok_or(GraphError::UnknownPin(id))?;
        pin.hitbox = Some(hitbox);
        self.touch();
        Ok(())
    }

    /// Connects two pins, in either argument order.
    ///
    /// Legality: one input and one output, different owning nodes, matching
    /// kinds (or `AnyValue` on a value pin, or flow against flow), and both
    /// pins linkable at all. A new link into an occupied non-flow input
    /// replaces the old one; a flow output keeps at most one outgoing link.
    /// On error the link table is left unchanged.
    pub fn create_link(&mut self, a: PinId, b: PinId) -> Result<LinkId, GraphError> {
        let pin_a = self.pin(a).ok_or(GraphError::UnknownPin(a))?;
        let pin_b = self.pin(b).ok_or(GraphError::UnknownPin(b))?;

        let illegal = |reason: &str| GraphError::IllegalLink {
            a,
            b,
            reason: reason.to_string(),
        };

        if pin_a.is_input == pin_b.is_input {
            return Err(illegal("pins have the same direction"));
        }
        if pin_a.node == pin_b.node {
            return Err(illegal("pins belong to the same node"));
        }
        if !pin_a.kind.linkable() || !pin_b.kind.linkable() {
            return Err(illegal("pin kind does not accept links"));
        }
        if !pin_a.kind.matches(pin_b.kind) {
            return Err(illegal("pin kinds do not match"));
        }

        let (from, to) = if pin_a.is_input { (b, a) } else { (a, b) };
        let from_kind = self.pin(from).map(|p| p.kind);

        // Single writer into a non-flow input; single reader out of a flow
        // output. Reconnecting drops the previous link.
        if from_kind == Some(PinKind::Flow) {
            self.links.retain(|l| l.from != from);
        } else {
            self.links.retain(|l| l.to != to);
        }

        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;
        self.links.push(Link { id, from, to });
        self.touch();
        Ok(id)
    }

    pub fn remove_link(&mut self, id: LinkId) -> Result<(), GraphError> {
        let index = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(GraphError::UnknownLink(id))?;
        self.links.swap_remove(index);
        self.touch();
        Ok(())
    }

    /// The incoming link of an input pin, if any.
    pub fn link_into(&self, input: PinId) -> Option<&Link> {
        self.links.iter().find(|l| l.to == input)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Rebuilds the derived variable table from variable-producing nodes,
    /// in node order. Index 0 is the reserved "none" sentinel.
    pub(crate) fn rebuild_variables(&mut self) {
        self.variables.clear();
        self.variables.push(VariableEntry {
            name: "NONE".to_string(),
            kind: VariableKind::None,
        });
        for node in &self.nodes {
            if !node.kind.creates_variable() {
                continue;
            }
            let kind = match node.kind {
                NodeKind::CreateNumber => VariableKind::Number,
                NodeKind::CreateString => VariableKind::String,
                NodeKind::CreateBool => VariableKind::Bool,
                NodeKind::CreateColor => VariableKind::Color,
                _ => VariableKind::Sprite,
            };
            self.variables.push(VariableEntry {
                name: node.name.clone(),
                kind,
            });
        }
    }

    /// The raw `(node, pin, link)` id counters. Persisted so that ids are
    /// never reused across a save/load cycle, even after deletions.
    pub(crate) fn counters(&self) -> (u64, u64, u64) {
        (self.next_node_id, self.next_pin_id, self.next_link_id)
    }

    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        pins: Vec<Pin>,
        links: Vec<Link>,
        next_node_id: u64,
        next_pin_id: u64,
        next_link_id: u64,
    ) -> Self {
        let mut graph = Self {
            nodes,
            pins,
            links,
            next_node_id,
            next_pin_id,
            next_link_id,
            variables: Vec::new(),
            revision: 0,
        };
        graph.rebuild_variables();
        graph
    }
}
