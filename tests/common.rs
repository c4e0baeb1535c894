//! Common test utilities for building graphs and reading results.
use karakuri::prelude::*;

/// Places a number literal with the given text.
#[allow(dead_code)]
pub fn literal_number(graph: &mut GraphContext, text: &str) -> NodeId {
    let node = graph.add_node(NodeKind::LiteralNumber);
    let field = graph.node(node).unwrap().inputs[0];
    graph.set_pin_text(field, text).unwrap();
    node
}

/// Places a string literal with the given text.
#[allow(dead_code)]
pub fn literal_string(graph: &mut GraphContext, text: &str) -> NodeId {
    let node = graph.add_node(NodeKind::LiteralString);
    let field = graph.node(node).unwrap().inputs[0];
    graph.set_pin_text(field, text).unwrap();
    node
}

/// Places a bool literal.
#[allow(dead_code)]
pub fn literal_bool(graph: &mut GraphContext, value: bool) -> NodeId {
    let node = graph.add_node(NodeKind::LiteralBool);
    let field = graph.node(node).unwrap().inputs[0];
    graph
        .set_pin_text(field, if value { "true" } else { "false" })
        .unwrap();
    node
}

/// Places a color literal from hex text.
#[allow(dead_code)]
pub fn literal_color(graph: &mut GraphContext, hex: &str) -> NodeId {
    let node = graph.add_node(NodeKind::LiteralColor);
    let field = graph.node(node).unwrap().inputs[0];
    graph.set_pin_text(field, hex).unwrap();
    node
}

/// Links output `from_ordinal` of one node into input `to_ordinal` of
/// another.
#[allow(dead_code)]
pub fn link(
    graph: &mut GraphContext,
    from: NodeId,
    from_ordinal: usize,
    to: NodeId,
    to_ordinal: usize,
) -> LinkId {
    let out = graph.node(from).unwrap().outputs[from_ordinal];
    let input = graph.node(to).unwrap().inputs[to_ordinal];
    graph.create_link(out, input).unwrap()
}

/// Places a named `CreateNumber` variable, optionally seeded from a
/// literal.
#[allow(dead_code)]
pub fn number_variable(graph: &mut GraphContext, name: &str, seed: Option<&str>) -> NodeId {
    let node = graph.add_node(NodeKind::CreateNumber);
    graph.rename_node(node, name).unwrap();
    if let Some(text) = seed {
        let literal = literal_number(graph, text);
        link(graph, literal, 0, node, 0);
    }
    node
}

/// Index of a named variable in the graph's variable table, as dropdown
/// pins store it.
#[allow(dead_code)]
pub fn variable_option(graph: &GraphContext, name: &str) -> usize {
    graph
        .variables()
        .iter()
        .position(|v| v.name == name)
        .expect("variable not in table")
}

/// Index of a named sprite variable within the sprite-picker option list
/// (1-based; 0 is the none sentinel).
#[allow(dead_code)]
pub fn sprite_option(graph: &GraphContext, name: &str) -> usize {
    graph
        .variables()
        .iter()
        .filter(|v| v.kind == VariableKind::Sprite)
        .position(|v| v.name == name)
        .expect("sprite not in table")
        + 1
}

/// Places a `SetVariable` node targeting `variable`, with its value input
/// wired from `source` node's output `source_ordinal`.
#[allow(dead_code)]
pub fn set_variable(
    graph: &mut GraphContext,
    variable: &str,
    source: NodeId,
    source_ordinal: usize,
) -> NodeId {
    let node = graph.add_node(NodeKind::SetVariable);
    let picker = graph.node(node).unwrap().inputs[1];
    let option = variable_option(graph, variable);
    graph.set_pin_option(picker, option).unwrap();
    link(graph, source, source_ordinal, node, 2);
    node
}

/// Places a rect prop sized by literals. Layer stays at its dropdown
/// default (no collision) unless changed afterwards.
#[allow(dead_code)]
pub fn rect_prop(graph: &mut GraphContext, name: &str, width: &str, height: &str) -> NodeId {
    let node = graph.add_node(NodeKind::CreateRectProp);
    graph.rename_node(node, name).unwrap();
    let w = literal_number(graph, width);
    let h = literal_number(graph, height);
    link(graph, w, 0, node, 0);
    link(graph, h, 0, node, 1);
    node
}

/// The value of a named variable after a build or a frame.
#[allow(dead_code)]
pub fn variable_value(values: &ValueStore, name: &str) -> Value {
    let index = values
        .variable_slots()
        .into_iter()
        .find(|&i| values.slot(i).map(|s| s.name.as_str()) == Some(name))
        .expect("variable slot not found");
    values.get(index).unwrap().clone()
}

/// Compiles against an empty project root.
#[allow(dead_code)]
pub fn build(graph: &GraphContext) -> Result<CompiledGraph, BuildError> {
    compile(graph, &Project::new("."))
}

/// Compiles and wraps in a runtime with default settings.
#[allow(dead_code)]
pub fn build_runtime(graph: &GraphContext) -> Runtime {
    build_runtime_with(graph, Settings::default())
}

#[allow(dead_code)]
pub fn build_runtime_with(graph: &GraphContext, settings: Settings) -> Runtime {
    let compiled = build(graph).expect("build failed");
    Runtime::new(compiled, Project::new("."), settings).expect("runtime refused the build")
}
