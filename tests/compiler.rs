//! Tests for the build pipeline: slot assignment, variable binding,
//! literal parsing and validation.
mod common;
use common::*;
use karakuri::prelude::*;

#[test]
fn literal_seeds_variable_at_build_time() {
    let mut graph = GraphContext::new();
    number_variable(&mut graph, "X", Some("42"));

    let compiled = build(&graph).unwrap();
    assert_eq!(variable_value(compiled.values(), "X"), Value::Number(42.0));
}

#[test]
fn unlinked_variable_keeps_its_default() {
    let mut graph = GraphContext::new();
    number_variable(&mut graph, "X", None);

    let compiled = build(&graph).unwrap();
    assert_eq!(variable_value(compiled.values(), "X"), Value::Number(0.0));
}

#[test]
fn set_variable_output_aliases_the_variable_slot() {
    let mut graph = GraphContext::new();
    let x = number_variable(&mut graph, "X", None);
    let seven = literal_number(&mut graph, "7");
    let setter = set_variable(&mut graph, "X", seven, 0);
    let getter = graph.add_node(NodeKind::GetVariable);
    let picker = graph.node(getter).unwrap().inputs[0];
    graph
        .set_pin_option(picker, variable_option(&graph, "X"))
        .unwrap();

    let compiled = build(&graph).unwrap();

    let creator_out = graph.node(x).unwrap().outputs[0];
    let setter_out = graph.node(setter).unwrap().outputs[1];
    let getter_out = graph.node(getter).unwrap().outputs[0];
    let slot_of = |pin: PinId| {
        compiled
            .pins()
            .iter()
            .find(|p| p.source == pin)
            .unwrap()
            .value_index
    };

    assert_eq!(slot_of(setter_out), slot_of(creator_out));
    assert_eq!(slot_of(getter_out), slot_of(creator_out));
}

#[test]
fn compilation_is_deterministic() {
    let mut graph = GraphContext::new();
    number_variable(&mut graph, "X", Some("1"));
    number_variable(&mut graph, "Y", Some("2"));
    let tick = graph.add_node(NodeKind::Tick);
    let add = graph.add_node(NodeKind::Add);
    let one = literal_number(&mut graph, "1");
    link(&mut graph, one, 0, add, 1);
    link(&mut graph, one, 0, add, 2);
    link(&mut graph, tick, 0, add, 0);
    let setter = set_variable(&mut graph, "Y", add, 1);
    link(&mut graph, add, 0, setter, 0);
    rect_prop(&mut graph, "P", "10", "10");

    let first = build(&graph).unwrap();
    let second = build(&graph).unwrap();

    for (a, b) in first.pins().iter().zip(second.pins().iter()) {
        assert_eq!(a.value_index, b.value_index);
        assert_eq!(a.next_node, b.next_node);
        assert_eq!(a.component, b.component);
    }
}

#[test]
fn renaming_rebinds_by_name() {
    let mut graph = GraphContext::new();
    let x = number_variable(&mut graph, "X", Some("5"));
    let getter = graph.add_node(NodeKind::GetVariable);
    let picker = graph.node(getter).unwrap().inputs[0];
    graph
        .set_pin_option(picker, variable_option(&graph, "X"))
        .unwrap();

    // Rename the creation node; the picker option index is unchanged and
    // the getter follows the new name through the rebuilt table.
    graph.rename_node(x, "Lives").unwrap();

    let compiled = build(&graph).unwrap();
    let creator_out = graph.node(x).unwrap().outputs[0];
    let getter_out = graph.node(getter).unwrap().outputs[0];
    let slot_of = |pin: PinId| {
        compiled
            .pins()
            .iter()
            .find(|p| p.source == pin)
            .unwrap()
            .value_index
    };
    assert_eq!(slot_of(getter_out), slot_of(creator_out));
}

#[test]
fn unselected_variable_fails_the_build() {
    let mut graph = GraphContext::new();
    number_variable(&mut graph, "X", None);
    graph.add_node(NodeKind::GetVariable);

    match build(&graph) {
        Err(BuildError::NoVariableSelected { .. }) => {}
        other => panic!("expected NoVariableSelected, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn dangling_variable_option_fails_the_build() {
    let mut graph = GraphContext::new();
    number_variable(&mut graph, "X", None);
    let getter = graph.add_node(NodeKind::GetVariable);
    let picker = graph.node(getter).unwrap().inputs[0];
    graph.set_pin_option(picker, 9).unwrap();

    assert!(matches!(
        build(&graph),
        Err(BuildError::UnboundVariable { .. })
    ));
}

#[test]
fn invalid_number_literal_fails_the_build() {
    let mut graph = GraphContext::new();
    literal_number(&mut graph, "not a number");

    assert!(matches!(
        build(&graph),
        Err(BuildError::InvalidLiteral { expected: "number", .. })
    ));
}

#[test]
fn bool_literal_is_string_equality_with_true() {
    let mut graph = GraphContext::new();
    let node = graph.add_node(NodeKind::LiteralBool);
    let field = graph.node(node).unwrap().inputs[0];
    graph.set_pin_text(field, "TRUE").unwrap();

    let compiled = build(&graph).unwrap();
    let out = graph.node(node).unwrap().outputs[0];
    let slot = compiled
        .pins()
        .iter()
        .find(|p| p.source == out)
        .unwrap()
        .value_index;
    // Anything but exactly "true" parses as false.
    assert_eq!(compiled.values().get(slot).unwrap(), &Value::Bool(false));
}

#[test]
fn color_literal_parses_hex_rgba() {
    let mut graph = GraphContext::new();
    let color = literal_color(&mut graph, "#10203040");
    let compiled = build(&graph).unwrap();

    let out = graph.node(color).unwrap().outputs[0];
    let slot = compiled
        .pins()
        .iter()
        .find(|p| p.source == out)
        .unwrap()
        .value_index;
    assert_eq!(
        compiled.values().get(slot).unwrap(),
        &Value::Color(Color { r: 0x10, g: 0x20, b: 0x30, a: 0x40 })
    );
}

#[test]
fn two_tick_nodes_fail_the_build() {
    let mut graph = GraphContext::new();
    graph.add_node(NodeKind::Tick);
    graph.add_node(NodeKind::Tick);

    assert!(matches!(
        build(&graph),
        Err(BuildError::DuplicateEntryPoint { count: 2 })
    ));
}

#[test]
fn flow_cycle_fails_the_build() {
    let mut graph = GraphContext::new();
    let tick = graph.add_node(NodeKind::Tick);
    let value = literal_number(&mut graph, "0");
    let first = graph.add_node(NodeKind::PrintValue);
    let second = graph.add_node(NodeKind::PrintValue);
    link(&mut graph, value, 0, first, 1);
    link(&mut graph, value, 0, second, 1);
    link(&mut graph, tick, 0, first, 0);
    link(&mut graph, first, 0, second, 0);
    // The chain re-enters itself without a Loop node.
    link(&mut graph, second, 0, first, 0);

    assert!(matches!(build(&graph), Err(BuildError::FlowCycle { .. })));
}

#[test]
fn special_getters_bind_to_fixed_slots() {
    let mut graph = GraphContext::new();
    let mouse = graph.add_node(NodeKind::MousePosition);
    let screen = graph.add_node(NodeKind::ScreenSize);

    let compiled = build(&graph).unwrap();
    let slot_of = |node: NodeId, ordinal: usize| {
        let pin = graph.node(node).unwrap().outputs[ordinal];
        compiled
            .pins()
            .iter()
            .find(|p| p.source == pin)
            .unwrap()
            .value_index
    };

    assert_eq!(slot_of(mouse, 0), 1);
    assert_eq!(slot_of(mouse, 1), 2);
    assert_eq!(slot_of(screen, 0), 3);
    assert_eq!(slot_of(screen, 1), 4);
}

#[test]
fn rect_prop_materializes_a_component() {
    let mut graph = GraphContext::new();
    let prop = rect_prop(&mut graph, "Wall", "30", "40");

    let compiled = build(&graph).unwrap();
    assert_eq!(compiled.scene().len(), 1);

    let component = compiled.scene().get(0).unwrap();
    assert_eq!(component.size(), Vec2::new(30.0, 40.0));
    assert!(matches!(
        component,
        SceneComponent::Prop(Prop { shape: PropShape::Rect, .. })
    ));

    let out = graph.node(prop).unwrap().outputs[0];
    let pin = compiled.pins().iter().find(|p| p.source == out).unwrap();
    assert_eq!(pin.component, Some(0));
    assert_eq!(
        compiled.values().get(pin.value_index).unwrap(),
        &Value::Sprite(Some(0))
    );
    assert_eq!(variable_value(compiled.values(), "Wall"), Value::Sprite(Some(0)));
}

#[test]
fn missing_texture_fails_the_build() {
    let mut graph = GraphContext::new();
    let sprite = graph.add_node(NodeKind::CreateSprite);
    graph.rename_node(sprite, "Hero").unwrap();
    let path = literal_string(&mut graph, "no-such-texture.png");
    link(&mut graph, path, 0, sprite, 0);

    assert!(matches!(
        build(&graph),
        Err(BuildError::TextureLoad { .. })
    ));
}

#[test]
fn sprite_picker_resolves_component_by_name() {
    let mut graph = GraphContext::new();
    rect_prop(&mut graph, "A", "10", "10");
    rect_prop(&mut graph, "B", "10", "10");
    let mover = graph.add_node(NodeKind::SetSpritePosition);
    let picker = graph.node(mover).unwrap().inputs[1];
    graph
        .set_pin_option(picker, sprite_option(&graph, "B"))
        .unwrap();

    let compiled = build(&graph).unwrap();
    let pin = compiled.pins().iter().find(|p| p.source == picker).unwrap();
    assert_eq!(pin.component, Some(1));
}

#[test]
fn build_snapshot_goes_stale_on_edit() {
    let mut graph = GraphContext::new();
    graph.add_node(NodeKind::Tick);
    let compiled = build(&graph).unwrap();
    assert!(!compiled.is_stale(&graph));

    let node = literal_number(&mut graph, "1");
    assert!(compiled.is_stale(&graph));
    graph.remove_node(node).unwrap();
    // Deleting the edit does not un-stale the build; revisions only move
    // forward.
    assert!(compiled.is_stale(&graph));
}
