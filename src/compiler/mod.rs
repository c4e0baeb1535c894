//! The graph compiler: authoring graph in, runtime graph out.
//!
//! Compilation is a fixed sequence of passes over the source graph:
//!
//! 1. Mirror nodes and pins 1:1, resolving every pin id to an array index
//!    through maps built once up front.
//! 2. Allocate value-store slots for non-flow output pins; parse literal
//!    node text; bind special getters to the fixed special slots.
//! 3. Resolve get/set-variable and call-event indirection by name.
//! 4. Apply links: data inputs mirror their source slot, flow outputs
//!    learn their successor node.
//! 5. Materialize scene components, loading sprite textures from disk, and
//!    resolve sprite-picker pins.
//! 6. Seed variable slots from their (possibly linked) creation inputs.
//! 7. Validate: a single Tick entry point, no flow cycles.
//!
//! Every failure is fatal: the build is rejected and the caller stays in
//! edit mode. A successful build is deterministic — the same source graph
//! always produces the same slot, successor and component assignments.

mod runtime_graph;

pub use runtime_graph::{CompiledGraph, RuntimeNode, RuntimePin};

use crate::error::BuildError;
use crate::graph::{GraphContext, Node, NodeKind, PinKind, VariableKind};
use crate::project::Project;
use crate::scene::{Hitbox, Layer, Prop, PropShape, SceneComponent, Sprite, Texture, Vec2};
use crate::value::{
    Color, Value, ValueStore, SLOT_MOUSE_X, SLOT_MOUSE_Y, SLOT_SCREEN_H, SLOT_SCREEN_W,
};
use ahash::AHashMap;
use itertools::Itertools;

/// Compiles a graph against a project root (used to resolve texture
/// files).
pub fn compile(graph: &GraphContext, project: &Project) -> Result<CompiledGraph, BuildError> {
    Compiler::new(graph, project).run()
}

struct Compiler<'a> {
    graph: &'a GraphContext,
    project: &'a Project,
    node_index: AHashMap<crate::graph::NodeId, usize>,
    pin_index: AHashMap<crate::graph::PinId, usize>,
}

impl<'a> Compiler<'a> {
    fn new(graph: &'a GraphContext, project: &'a Project) -> Self {
        let node_index = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        let pin_index = graph
            .pins()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        Self {
            graph,
            project,
            node_index,
            pin_index,
        }
    }

    fn run(self) -> Result<CompiledGraph, BuildError> {
        let mut out = CompiledGraph::new(self.graph.revision());

        self.mirror(&mut out)?;
        self.allocate_slots(&mut out)?;
        self.resolve_variables(&mut out)?;
        self.apply_links(&mut out)?;
        self.materialize_scene(&mut out)?;
        self.seed_variables(&mut out);
        self.validate(&mut out)?;

        tracing::info!(
            nodes = out.nodes.len(),
            slots = out.values.len(),
            components = out.scene.len(),
            "graph built"
        );
        Ok(out)
    }

    /// Pass 1: mirror nodes and pins, resolving ids to indices.
    fn mirror(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        for pin in self.graph.pins() {
            let node = *self
                .node_index
                .get(&pin.node)
                .ok_or_else(|| BuildError::UnresolvedPin {
                    node: format!("<node {}>", pin.node.0),
                    pin: pin.id,
                })?;
            out.pins.push(RuntimePin {
                source: pin.id,
                kind: pin.kind,
                node,
                is_input: pin.is_input,
                ordinal: pin.ordinal,
                value_index: crate::value::SLOT_ERROR,
                next_node: None,
                component: None,
                text: pin.text.clone(),
                picked_option: pin.picked_option,
                hitbox: pin.hitbox.clone(),
            });
        }

        for node in self.graph.nodes() {
            let resolve = |ids: &[crate::graph::PinId]| -> Result<Vec<usize>, BuildError> {
                ids.iter()
                    .map(|id| {
                        self.pin_index
                            .get(id)
                            .copied()
                            .ok_or_else(|| BuildError::UnresolvedPin {
                                node: node.name.clone(),
                                pin: *id,
                            })
                    })
                    .collect()
            };
            out.nodes.push(RuntimeNode {
                kind: node.kind,
                name: node.name.clone(),
                inputs: resolve(&node.inputs)?,
                outputs: resolve(&node.outputs)?,
            });
        }
        Ok(())
    }

    /// Pass 2: size the value store and allocate slots.
    fn allocate_slots(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        let slot_count: usize = self
            .graph
            .nodes()
            .iter()
            .filter(|n| !n.kind.is_special_getter())
            .map(|n| {
                n.outputs
                    .iter()
                    .filter_map(|id| self.graph.pin(*id))
                    .filter(|p| p.kind.carries_value())
                    .count()
            })
            .sum();
        out.values = ValueStore::with_capacity(slot_count);

        for node_idx in 0..out.nodes.len() {
            let kind = out.nodes[node_idx].kind;
            let name = out.nodes[node_idx].name.clone();

            if kind.is_special_getter() {
                let slots = match kind {
                    NodeKind::MousePosition => [SLOT_MOUSE_X, SLOT_MOUSE_Y],
                    _ => [SLOT_SCREEN_W, SLOT_SCREEN_H],
                };
                for (ordinal, slot) in slots.into_iter().enumerate() {
                    let pin = out.nodes[node_idx].outputs[ordinal];
                    out.pins[pin].value_index = slot;
                }
                continue;
            }

            if kind.is_literal() {
                let field = out.nodes[node_idx].inputs[0];
                let value = self.parse_literal(kind, &name, &out.pins[field].text)?;
                let slot = out.values.allocate(value, &name, false);
                let output = out.nodes[node_idx].outputs[0];
                out.pins[output].value_index = slot;
                continue;
            }

            let is_variable = kind.creates_variable();
            let outputs = out.nodes[node_idx].outputs.clone();
            for pin_idx in outputs {
                if !out.pins[pin_idx].kind.carries_value() {
                    continue;
                }
                let default = default_value(out.pins[pin_idx].kind);
                let slot = out.values.allocate(default, &name, is_variable);
                out.pins[pin_idx].value_index = slot;

                // The creation node's value input aliases the variable's
                // storage, so an inline edit mutates it in place.
                if is_variable && !kind.creates_component() && out.pins[pin_idx].ordinal == 0 {
                    let input = out.nodes[node_idx].inputs[0];
                    out.pins[input].value_index = slot;
                }
            }
        }
        Ok(())
    }

    fn parse_literal(
        &self,
        kind: NodeKind,
        node: &str,
        text: &str,
    ) -> Result<Value, BuildError> {
        let text = text.trim();
        match kind {
            NodeKind::LiteralNumber => {
                if text.is_empty() {
                    return Ok(Value::Number(0.0));
                }
                text.parse::<f64>().map(Value::Number).map_err(|_| {
                    BuildError::InvalidLiteral {
                        node: node.to_string(),
                        expected: "number",
                        text: text.to_string(),
                    }
                })
            }
            NodeKind::LiteralString => Ok(Value::String(text.to_string())),
            NodeKind::LiteralBool => Ok(Value::Bool(text == "true")),
            NodeKind::LiteralColor => {
                if text.is_empty() {
                    return Ok(Value::Color(Color::WHITE));
                }
                Color::from_hex(text).map(Value::Color).ok_or_else(|| {
                    BuildError::InvalidLiteral {
                        node: node.to_string(),
                        expected: "hex color",
                        text: text.to_string(),
                    }
                })
            }
            _ => unreachable!("not a literal kind"),
        }
    }

    /// Pass 3: resolve get/set-variable and call-event indirection by name.
    ///
    /// The dropdown stores an index into the variable table, but binding
    /// goes through the *name*: renaming a creation node reconnects every
    /// getter and setter at the next build. Duplicate names resolve to the
    /// first creation node in scan order.
    fn resolve_variables(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        for node_idx in 0..out.nodes.len() {
            match out.nodes[node_idx].kind {
                NodeKind::GetVariable | NodeKind::SetVariable => {
                    let is_setter = out.nodes[node_idx].kind == NodeKind::SetVariable;
                    let picker_ordinal = if is_setter { 1 } else { 0 };
                    let picker = out.nodes[node_idx].inputs[picker_ordinal];
                    let picked = out.pins[picker].picked_option;

                    let node_name = out.nodes[node_idx].name.clone();
                    let variables = self.graph.variables();
                    if picked == 0 {
                        return Err(BuildError::NoVariableSelected { node: node_name });
                    }
                    let entry = variables.get(picked).ok_or_else(|| {
                        BuildError::UnboundVariable {
                            node: node_name.clone(),
                            variable: format!("<option {}>", picked),
                        }
                    })?;

                    let slot = self
                        .find_creator_slot(out, &entry.name)
                        .ok_or_else(|| BuildError::UnboundVariable {
                            node: node_name,
                            variable: entry.name.clone(),
                        })?;

                    let output_ordinal = if is_setter { 1 } else { 0 };
                    let output = out.nodes[node_idx].outputs[output_ordinal];
                    out.pins[output].value_index = slot;
                }
                NodeKind::CallCustomEvent => {
                    let picker = out.nodes[node_idx].inputs[1];
                    let picked = out.pins[picker].picked_option;
                    let node_name = out.nodes[node_idx].name.clone();
                    if picked == 0 {
                        return Err(BuildError::UnboundEvent {
                            node: node_name,
                            event: "<none>".to_string(),
                        });
                    }
                    let events: Vec<&Node> = self
                        .graph
                        .nodes()
                        .iter()
                        .filter(|n| n.kind == NodeKind::CreateCustomEvent)
                        .collect();
                    let event = events.get(picked - 1).ok_or_else(|| {
                        BuildError::UnboundEvent {
                            node: node_name.clone(),
                            event: format!("<option {}>", picked),
                        }
                    })?;
                    let target = out
                        .nodes
                        .iter()
                        .position(|n| {
                            n.kind == NodeKind::CreateCustomEvent && n.name == event.name
                        })
                        .ok_or_else(|| BuildError::UnboundEvent {
                            node: node_name,
                            event: event.name.clone(),
                        })?;
                    out.pins[picker].next_node = Some(target);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The value slot of the first variable-creating node with this name.
    fn find_creator_slot(&self, out: &CompiledGraph, name: &str) -> Option<usize> {
        let node_idx = out
            .nodes
            .iter()
            .position(|n| n.kind.creates_variable() && n.name == name)?;
        let output = *out.nodes[node_idx].outputs.first()?;
        Some(out.pins[output].value_index)
    }

    /// Pass 4: apply links.
    fn apply_links(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        for link in self.graph.links() {
            let from = *self.pin_index.get(&link.from).ok_or_else(|| {
                BuildError::UnresolvedPin {
                    node: "<link>".to_string(),
                    pin: link.from,
                }
            })?;
            let to = *self.pin_index.get(&link.to).ok_or_else(|| {
                BuildError::UnresolvedPin {
                    node: "<link>".to_string(),
                    pin: link.to,
                }
            })?;

            if out.pins[from].kind == PinKind::Flow {
                out.pins[from].next_node = Some(out.pins[to].node);
            } else {
                out.pins[to].value_index = out.pins[from].value_index;
            }
        }
        Ok(())
    }

    /// Pass 5: materialize scene components and resolve sprite pickers.
    fn materialize_scene(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        for node_idx in 0..out.nodes.len() {
            let kind = out.nodes[node_idx].kind;
            if !kind.creates_component() {
                continue;
            }
            let name = out.nodes[node_idx].name.clone();

            let component = match kind {
                NodeKind::CreateSprite => {
                    let path = self.input_string(out, node_idx, 0);
                    if path.is_empty() {
                        return Err(BuildError::TextureLoad {
                            node: name,
                            path: String::new(),
                            message: "no texture file set".to_string(),
                        });
                    }
                    let texture = Texture::load(&self.project.resolve(&path)).map_err(
                        |message| BuildError::TextureLoad {
                            node: name.clone(),
                            path: path.clone(),
                            message,
                        },
                    )?;
                    let texture_size = texture.size();
                    let width = self.input_number(out, node_idx, 1, texture_size.x);
                    let height = self.input_number(out, node_idx, 2, texture_size.y);
                    let layer = self.input_layer(out, node_idx, 3);
                    let hitbox = self
                        .input_hitbox(out, node_idx, 4)
                        .unwrap_or_else(|| Hitbox::rect(texture_size));
                    SceneComponent::Sprite(Sprite {
                        position: Vec2::ZERO,
                        size: Vec2::new(width, height),
                        rotation: 0.0,
                        layer,
                        hitbox,
                        texture: Some(texture),
                        visible: true,
                    })
                }
                NodeKind::CreateRectProp => {
                    let width = self.input_number(out, node_idx, 0, 50.0);
                    let height = self.input_number(out, node_idx, 1, 50.0);
                    let color = self.input_color(out, node_idx, 2);
                    let layer = self.input_layer(out, node_idx, 3);
                    let size = Vec2::new(width, height);
                    SceneComponent::Prop(Prop {
                        position: Vec2::ZERO,
                        size,
                        rotation: 0.0,
                        layer,
                        hitbox: Hitbox::rect(size),
                        shape: PropShape::Rect,
                        color,
                        visible: true,
                    })
                }
                _ => {
                    let radius = self.input_number(out, node_idx, 0, 25.0);
                    let color = self.input_color(out, node_idx, 1);
                    let layer = self.input_layer(out, node_idx, 2);
                    SceneComponent::Prop(Prop {
                        position: Vec2::ZERO,
                        size: Vec2::new(radius * 2.0, radius * 2.0),
                        rotation: 0.0,
                        layer,
                        hitbox: Hitbox::circle(radius),
                        shape: PropShape::Circle,
                        color,
                        visible: true,
                    })
                }
            };

            let index = out.scene.push(component);
            let output = out.nodes[node_idx].outputs[0];
            out.pins[output].component = Some(index);
            let slot = out.pins[output].value_index;
            // Slot writes cannot fail here; the slot was allocated above.
            let _ = out.values.set(slot, Value::Sprite(Some(index)));
        }

        self.resolve_sprite_pickers(out)
    }

    /// Resolves every `SpriteVariable` picker to a component by name.
    fn resolve_sprite_pickers(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        let sprite_names: Vec<String> = self
            .graph
            .variables()
            .iter()
            .filter(|v| v.kind == VariableKind::Sprite)
            .map(|v| v.name.clone())
            .collect();

        for pin_idx in 0..out.pins.len() {
            if out.pins[pin_idx].kind != PinKind::SpriteVariable {
                continue;
            }
            let picked = out.pins[pin_idx].picked_option;
            let node_name = out.nodes[out.pins[pin_idx].node].name.clone();
            if picked == 0 {
                return Err(BuildError::UnboundSprite {
                    node: node_name,
                    sprite: "<none>".to_string(),
                });
            }
            let sprite_name = sprite_names.get(picked - 1).ok_or_else(|| {
                BuildError::UnboundSprite {
                    node: node_name.clone(),
                    sprite: format!("<option {}>", picked),
                }
            })?;

            let creator = out
                .nodes
                .iter()
                .position(|n| n.kind.creates_component() && n.name == *sprite_name)
                .ok_or_else(|| BuildError::UnboundSprite {
                    node: node_name,
                    sprite: sprite_name.clone(),
                })?;
            let creator_output = out.nodes[creator].outputs[0];
            out.pins[pin_idx].component = out.pins[creator_output].component;
            out.pins[pin_idx].value_index = out.pins[creator_output].value_index;
        }
        Ok(())
    }

    /// Pass 6: seed variable slots from their creation inputs, so a
    /// literal wired into a creation node takes effect at build time.
    fn seed_variables(&self, out: &mut CompiledGraph) {
        for node_idx in 0..out.nodes.len() {
            let kind = out.nodes[node_idx].kind;
            if !kind.creates_variable() || kind.creates_component() {
                continue;
            }
            let output = out.nodes[node_idx].outputs[0];
            let slot = out.pins[output].value_index;
            let input = out.nodes[node_idx].inputs[0];
            let source = out.pins[input].value_index;
            if source != slot {
                if let Ok(value) = out.values.get(source).cloned() {
                    let _ = out.values.set(slot, value);
                }
            }
        }
    }

    /// Pass 7: entry-point and cycle validation.
    fn validate(&self, out: &mut CompiledGraph) -> Result<(), BuildError> {
        let ticks: Vec<usize> = out
            .nodes
            .iter()
            .positions(|n| n.kind == NodeKind::Tick)
            .collect();
        if ticks.len() > 1 {
            return Err(BuildError::DuplicateEntryPoint { count: ticks.len() });
        }
        out.tick = ticks.first().copied();

        self.reject_flow_cycles(out)
    }

    /// Depth-first search with temporary marks over the resolved flow
    /// edges (including call-event targets). Any back edge means a chain
    /// re-enters itself without a Loop node mediating it, which would
    /// recurse forever at run time.
    fn reject_flow_cycles(&self, out: &CompiledGraph) -> Result<(), BuildError> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;
        let mut color = vec![WHITE; out.nodes.len()];

        fn successors(out: &CompiledGraph, node: usize) -> Vec<usize> {
            let mut next = Vec::new();
            for &pin_idx in out.nodes[node].outputs.iter() {
                let pin = &out.pins[pin_idx];
                if pin.kind == PinKind::Flow {
                    if let Some(n) = pin.next_node {
                        next.push(n);
                    }
                }
            }
            for &pin_idx in out.nodes[node].inputs.iter() {
                let pin = &out.pins[pin_idx];
                if pin.kind == PinKind::Event {
                    if let Some(n) = pin.next_node {
                        next.push(n);
                    }
                }
            }
            next
        }

        fn visit(
            out: &CompiledGraph,
            node: usize,
            color: &mut [u8],
        ) -> Result<(), BuildError> {
            color[node] = GRAY;
            for next in successors(out, node) {
                match color[next] {
                    GRAY => {
                        return Err(BuildError::FlowCycle {
                            node: out.nodes[next].name.clone(),
                        });
                    }
                    WHITE => visit(out, next, color)?,
                    _ => {}
                }
            }
            color[node] = BLACK;
            Ok(())
        }

        for node in 0..out.nodes.len() {
            if color[node] == WHITE {
                visit(out, node, &mut color)?;
            }
        }
        Ok(())
    }

    // Input readers used during scene materialization. Unlinked inputs
    // resolve to the error sentinel and fall back to the given default.

    fn input_number(&self, out: &CompiledGraph, node: usize, ordinal: usize, default: f32) -> f32 {
        let pin = out.nodes[node].inputs[ordinal];
        match out.values.get(out.pins[pin].value_index) {
            Ok(Value::Number(n)) => *n as f32,
            _ => default,
        }
    }

    fn input_string(&self, out: &CompiledGraph, node: usize, ordinal: usize) -> String {
        let pin = out.nodes[node].inputs[ordinal];
        match out.values.get(out.pins[pin].value_index) {
            Ok(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn input_color(&self, out: &CompiledGraph, node: usize, ordinal: usize) -> Color {
        let pin = out.nodes[node].inputs[ordinal];
        match out.values.get(out.pins[pin].value_index) {
            Ok(Value::Color(c)) => *c,
            _ => Color::WHITE,
        }
    }

    fn input_layer(&self, out: &CompiledGraph, node: usize, ordinal: usize) -> Layer {
        let pin = out.nodes[node].inputs[ordinal];
        Layer::from_option(out.pins[pin].picked_option)
    }

    fn input_hitbox(&self, out: &CompiledGraph, node: usize, ordinal: usize) -> Option<Hitbox> {
        let pin = out.nodes[node].inputs[ordinal];
        out.pins[pin].hitbox.clone()
    }
}

fn default_value(kind: PinKind) -> Value {
    match kind {
        PinKind::Number => Value::Number(0.0),
        PinKind::String => Value::String(String::new()),
        PinKind::Bool => Value::Bool(false),
        PinKind::Color => Value::Color(Color::WHITE),
        PinKind::Sprite => Value::Sprite(None),
        _ => Value::Null,
    }
}
