//! Small-surface tests: value formatting, checked access, settings.
use karakuri::prelude::*;

#[test]
fn numbers_display_with_two_decimals() {
    assert_eq!(Value::Number(42.0).to_string(), "42.00");
    assert_eq!(Value::Number(1.0 / 3.0).to_string(), "0.33");
}

#[test]
fn colors_display_as_space_separated_rgba() {
    let color = Color { r: 1, g: 2, b: 3, a: 255 };
    assert_eq!(Value::Color(color).to_string(), "1 2 3 255");
}

#[test]
fn color_hex_parsing_accepts_rgb_and_rgba() {
    assert_eq!(
        Color::from_hex("#ff0000"),
        Some(Color { r: 255, g: 0, b: 0, a: 255 })
    );
    assert_eq!(
        Color::from_hex("10203040"),
        Some(Color { r: 0x10, g: 0x20, b: 0x30, a: 0x40 })
    );
    assert_eq!(Color::from_hex("xyz"), None);
    assert_eq!(Color::from_hex("12345"), None);
}

#[test]
fn cross_variant_reads_are_typed_errors() {
    let value = Value::Bool(true);
    match value.as_number("Add") {
        Err(RuntimeError::TypeMismatch { operation, expected, found }) => {
            assert_eq!(operation, "Add");
            assert_eq!(expected, "Number");
            assert_eq!(found, Value::Bool(true));
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert!(Value::Null.as_bool("Branch").is_err());
    assert!(Value::Sprite(None).as_component("Set Position").is_err());
}

#[test]
fn sprite_values_stringify_through_the_scene() {
    let mut scene = Scene::new();
    let index = scene.push(SceneComponent::Prop(Prop {
        position: Vec2::new(1.5, 2.5),
        size: Vec2::new(10.0, 10.0),
        rotation: 90.0,
        layer: Layer::Both,
        hitbox: Hitbox::rect(Vec2::new(10.0, 10.0)),
        shape: PropShape::Rect,
        color: Color::WHITE,
        visible: true,
    }));

    let summary = scene.describe(index).unwrap();
    assert!(summary.contains("visible"));
    assert!(summary.contains("1.50"));
    assert!(summary.contains("90.00"));
}

#[test]
fn key_actions_follow_dropdown_order() {
    assert_eq!(KeyAction::from_option(0), KeyAction::Pressed);
    assert_eq!(KeyAction::from_option(1), KeyAction::Released);
    assert_eq!(KeyAction::from_option(2), KeyAction::Down);
    assert_eq!(KeyAction::from_option(3), KeyAction::Up);
}

#[test]
fn layers_follow_dropdown_order() {
    assert!(!Layer::from_option(0).fires_events());
    assert!(!Layer::from_option(0).blocks());
    assert!(Layer::from_option(1).fires_events());
    assert!(!Layer::from_option(1).blocks());
    assert!(!Layer::from_option(2).fires_events());
    assert!(Layer::from_option(2).blocks());
    assert!(Layer::from_option(3).fires_events());
    assert!(Layer::from_option(3).blocks());
}

#[test]
fn settings_round_trip_through_json() {
    let settings = Settings {
        infinite_loop_protection: false,
        loop_iteration_cap: 250,
        show_hitboxes: true,
    };
    let path = std::env::temp_dir().join("karakuri-settings-test.json");
    settings.save(&path).unwrap();
    let loaded = Settings::from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, settings);
}

#[test]
fn default_settings_protect_loops() {
    let settings = Settings::default();
    assert!(settings.infinite_loop_protection);
    assert_eq!(settings.loop_iteration_cap, 1000);
    assert!(!settings.show_hitboxes);
}
