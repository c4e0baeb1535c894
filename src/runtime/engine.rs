//! The flow walker and per-kind dispatch.
//!
//! Execution is a walk over flow-pin chains: executing from a node's
//! output flow pin follows its resolved successor, applies that node's
//! effects, then continues into the successor's own primary flow output.
//! The chain itself is walked iteratively; `Branch` arms, `Loop` bodies
//! and custom-event calls recurse, so call depth is bounded by nesting
//! depth rather than chain length.
//!
//! Per-node problems (type mismatches, dead components, unexpected kinds)
//! are logged and the walk continues at the node's successor; they never
//! abort the frame.

use super::Runtime;
use crate::error::RuntimeError;
use crate::graph::NodeKind;
use crate::scene::{check_collisions, Force, SceneComponent, Texture};
use crate::value::{Value, SLOT_ERROR};

impl Runtime {
    /// Walks the chain hanging off one output flow pin.
    pub(crate) fn walk_from(&mut self, node: usize, ordinal: usize) {
        let mut next = self.graph.flow_successor(node, ordinal);
        while let Some(current) = next {
            next = self.execute(current);
        }
    }

    /// Executes one node and returns the node the chain continues at.
    fn execute(&mut self, node: usize) -> Option<usize> {
        match self.dispatch(node) {
            Ok(next) => next,
            Err(error) => {
                let name = self.graph.nodes[node].name.clone();
                self.log_error(format!("node '{}': {}", name, error));
                self.graph.flow_successor(node, 0)
            }
        }
    }

    fn dispatch(&mut self, node: usize) -> Result<Option<usize>, RuntimeError> {
        match self.graph.nodes[node].kind {
            NodeKind::Branch => {
                let condition = self.in_bool(node, 1, "Branch")?;
                self.walk_from(node, if condition { 0 } else { 1 });
                Ok(None)
            }

            // After the body finishes, control returns to the loop's
            // caller; the "done" output (ordinal 0) is never followed
            // implicitly. This asymmetry with Branch is inherited
            // behavior.
            NodeKind::Loop => {
                let cap = self.settings.loop_iteration_cap;
                let protection = self.settings.infinite_loop_protection;
                let mut iterations: u32 = 0;
                loop {
                    if !self.in_bool(node, 1, "Loop")? {
                        break;
                    }
                    if iterations >= cap {
                        if protection {
                            let name = self.graph.nodes[node].name.clone();
                            self.log_error(format!(
                                "loop '{}' aborted after {} iterations",
                                name, cap
                            ));
                            break;
                        }
                        if !self.unbounded_warned {
                            self.unbounded_warned = true;
                            let name = self.graph.nodes[node].name.clone();
                            self.log_warning(format!(
                                "loop '{}' passed {} iterations with protection disabled",
                                name, cap
                            ));
                        }
                    }
                    self.walk_from(node, 1);
                    iterations += 1;
                }
                Ok(None)
            }

            NodeKind::SetVariable => {
                let source = self.in_slot(node, 2);
                let target = self
                    .graph
                    .output_pin(node, 1)
                    .map(|p| p.value_index)
                    .unwrap_or(SLOT_ERROR);
                let value = self.values.get(source)?.clone();
                self.values.set(target, value)?;
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::Add => self.binary_number(node, "Add", |a, b| a + b),
            NodeKind::Subtract => self.binary_number(node, "Subtract", |a, b| a - b),
            NodeKind::Multiply => self.binary_number(node, "Multiply", |a, b| a * b),
            // Division by zero is not special-cased; IEEE inf/NaN flows
            // through like any other number.
            NodeKind::Divide => self.binary_number(node, "Divide", |a, b| a / b),
            // Modulo truncates both operands to integers first.
            NodeKind::Modulo => self.binary_number(node, "Modulo", |a, b| a.trunc() % b.trunc()),

            NodeKind::Greater => self.binary_compare(node, "Greater", |a, b| a > b),
            NodeKind::Less => self.binary_compare(node, "Less", |a, b| a < b),

            NodeKind::Equals => {
                let result = self.in_value(node, 1)? == self.in_value(node, 2)?;
                self.write_out(node, 1, Value::Bool(result))?;
                Ok(self.graph.flow_successor(node, 0))
            }
            NodeKind::NotEquals => {
                let result = self.in_value(node, 1)? != self.in_value(node, 2)?;
                self.write_out(node, 1, Value::Bool(result))?;
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::And => self.binary_bool(node, "And", |a, b| a && b),
            NodeKind::Or => self.binary_bool(node, "Or", |a, b| a || b),
            NodeKind::Not => {
                let value = self.in_bool(node, 1, "Not")?;
                self.write_out(node, 1, Value::Bool(!value))?;
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::PrintValue => {
                let slot = self.in_slot(node, 1);
                let text = self.values.stringify(slot, &self.scene);
                let name = self
                    .values
                    .slot(slot)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                self.log_info(format!("{} = {}", name, text));
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::SetSpritePosition => {
                let component = self.in_sprite(node, 1, "Set Position")?;
                let x = self.in_number(node, 2, "Set Position")?;
                let y = self.in_number(node, 3, "Set Position")?;
                if let Some(c) = self.scene.get_mut(component) {
                    c.set_position(crate::scene::Vec2::new(x as f32, y as f32));
                }
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::GetSpritePosition => {
                let component = self.in_sprite(node, 1, "Get Position")?;
                let position = self
                    .scene
                    .get(component)
                    .map(SceneComponent::position)
                    .ok_or(RuntimeError::UnknownComponent(component))?;
                self.write_out(node, 1, Value::Number(position.x as f64))?;
                self.write_out(node, 2, Value::Number(position.y as f64))?;
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::SetSpriteTexture => {
                let component = self.in_sprite(node, 1, "Set Texture")?;
                let path = self.in_value(node, 2)?.as_str("Set Texture")?.to_string();
                match Texture::load(&self.project.resolve(&path)) {
                    Ok(texture) => {
                        if let Some(SceneComponent::Sprite(sprite)) =
                            self.scene.get_mut(component)
                        {
                            sprite.texture = Some(texture);
                        }
                    }
                    Err(message) => {
                        self.log_error(format!(
                            "could not load texture '{}': {}",
                            path, message
                        ));
                    }
                }
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::SetSpriteVisibility => {
                let component = self.in_sprite(node, 1, "Set Visibility")?;
                let visible = self.in_bool(node, 2, "Set Visibility")?;
                if let Some(c) = self.scene.get_mut(component) {
                    c.set_visible(visible);
                }
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::ForceSprite => {
                let component = self.in_sprite(node, 1, "Force Sprite")?;
                let speed = self.in_number(node, 2, "Force Sprite")? as f32;
                let angle = self.in_number(node, 3, "Force Sprite")? as f32;
                let duration = self.in_number(node, 4, "Force Sprite")? as f32;
                self.scene.apply_force(Force {
                    node,
                    component,
                    speed,
                    angle,
                    remaining: duration,
                });
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::CheckCollision => {
                let component = self.in_sprite(node, 1, "Check Collision")?;
                let outcome = check_collisions(&self.scene, component);
                self.write_out(node, 1, Value::Bool(outcome.fires_event()))?;
                Ok(self.graph.flow_successor(node, 0))
            }

            NodeKind::CallCustomEvent => {
                let target = self.graph.input_pin(node, 1).and_then(|p| p.next_node);
                match target {
                    Some(event) => self.walk_from(event, 0),
                    None => {
                        let name = self.graph.nodes[node].name.clone();
                        self.log_error(format!("node '{}': event target missing", name));
                    }
                }
                Ok(self.graph.flow_successor(node, 0))
            }

            // Everything else has no business inside a flow chain. Treat
            // it as a no-op and keep walking where structurally possible.
            other => {
                let name = self.graph.nodes[node].name.clone();
                self.log_error(format!(
                    "node '{}' ({:?}) cannot execute in a flow chain; skipped",
                    name, other
                ));
                Ok(self.graph.flow_successor(node, 0))
            }
        }
    }

    fn binary_number<F>(
        &mut self,
        node: usize,
        op: &'static str,
        f: F,
    ) -> Result<Option<usize>, RuntimeError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let a = self.in_number(node, 1, op)?;
        let b = self.in_number(node, 2, op)?;
        self.write_out(node, 1, Value::Number(f(a, b)))?;
        Ok(self.graph.flow_successor(node, 0))
    }

    fn binary_compare<F>(
        &mut self,
        node: usize,
        op: &'static str,
        f: F,
    ) -> Result<Option<usize>, RuntimeError>
    where
        F: Fn(f64, f64) -> bool,
    {
        let a = self.in_number(node, 1, op)?;
        let b = self.in_number(node, 2, op)?;
        self.write_out(node, 1, Value::Bool(f(a, b)))?;
        Ok(self.graph.flow_successor(node, 0))
    }

    fn binary_bool<F>(
        &mut self,
        node: usize,
        op: &'static str,
        f: F,
    ) -> Result<Option<usize>, RuntimeError>
    where
        F: Fn(bool, bool) -> bool,
    {
        let a = self.in_bool(node, 1, op)?;
        let b = self.in_bool(node, 2, op)?;
        self.write_out(node, 1, Value::Bool(f(a, b)))?;
        Ok(self.graph.flow_successor(node, 0))
    }

    /// The value slot an input pin reads from. Unresolved pins fall back
    /// to the error sentinel, whose `Null` value surfaces as a type
    /// mismatch at the read site.
    fn in_slot(&self, node: usize, ordinal: usize) -> usize {
        self.graph
            .input_pin(node, ordinal)
            .map(|p| p.value_index)
            .unwrap_or(SLOT_ERROR)
    }

    fn in_value(&self, node: usize, ordinal: usize) -> Result<&Value, RuntimeError> {
        self.values.get(self.in_slot(node, ordinal))
    }

    fn in_number(&self, node: usize, ordinal: usize, op: &str) -> Result<f64, RuntimeError> {
        self.in_value(node, ordinal)?.as_number(op)
    }

    fn in_bool(&self, node: usize, ordinal: usize, op: &str) -> Result<bool, RuntimeError> {
        self.in_value(node, ordinal)?.as_bool(op)
    }

    /// Resolves a sprite-picker input to a live component index.
    fn in_sprite(&self, node: usize, ordinal: usize, op: &str) -> Result<usize, RuntimeError> {
        let component = self
            .graph
            .input_pin(node, ordinal)
            .and_then(|p| p.component);
        match component {
            Some(c) if c < self.scene.len() => Ok(c),
            Some(c) => Err(RuntimeError::UnknownComponent(c)),
            None => Err(RuntimeError::TypeMismatch {
                operation: op.to_string(),
                expected: "Sprite",
                found: Value::Sprite(None),
            }),
        }
    }

    fn write_out(&mut self, node: usize, ordinal: usize, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .graph
            .output_pin(node, ordinal)
            .map(|p| p.value_index)
            .unwrap_or(SLOT_ERROR);
        self.values.set(slot, value)
    }
}
