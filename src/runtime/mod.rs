//! The per-frame interpreter.
//!
//! A [`Runtime`] takes exclusive ownership of one build's runtime graph,
//! value store and scene, and executes it frame by frame until the host
//! stops it. Teardown is dropping the runtime; that discards all in-flight
//! state and releases every texture the build loaded.

mod engine;

use crate::compiler::CompiledGraph;
use crate::error::RuntimeError;
use crate::graph::{GraphContext, NodeKind};
use crate::log::{LogEntry, LogLevel, LogQueue};
use crate::project::Project;
use crate::scene::{Scene, Vec2};
use crate::settings::Settings;
use crate::value::{
    Value, ValueStore, SLOT_MOUSE_X, SLOT_MOUSE_Y, SLOT_SCREEN_H, SLOT_SCREEN_W,
};
use ahash::AHashSet;
use itertools::Itertools;

/// What a key must be doing for an `OnKey` chain to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pressed,
    Released,
    Down,
    Up,
}

impl KeyAction {
    /// Dropdown option order used by `DropdownAction` pins.
    pub fn from_option(option: usize) -> KeyAction {
        match option {
            0 => KeyAction::Pressed,
            1 => KeyAction::Released,
            2 => KeyAction::Down,
            _ => KeyAction::Up,
        }
    }

    fn satisfied(self, key: &str, input: &FrameInput) -> bool {
        match self {
            KeyAction::Pressed => input.keys_pressed.contains(key),
            KeyAction::Released => input.keys_released.contains(key),
            KeyAction::Down => input.keys_down.contains(key),
            KeyAction::Up => !input.keys_down.contains(key),
        }
    }
}

/// Everything the host hands the interpreter for one frame.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub mouse: Vec2,
    /// Viewport size; feeds the screen width/height special slots.
    pub viewport: Vec2,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub keys_down: AHashSet<String>,
    pub keys_pressed: AHashSet<String>,
    pub keys_released: AHashSet<String>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            mouse: Vec2::ZERO,
            viewport: Vec2::new(1280.0, 720.0),
            dt: 1.0 / 60.0,
            keys_down: AHashSet::new(),
            keys_pressed: AHashSet::new(),
            keys_released: AHashSet::new(),
        }
    }
}

/// The executing side of one build.
pub struct Runtime {
    graph: CompiledGraph,
    values: ValueStore,
    scene: Scene,
    project: Project,
    settings: Settings,
    log: LogQueue,
    frame: u64,
    started: bool,
    halted: bool,
    /// The protection-off warning fires once per run, not once per loop.
    unbounded_warned: bool,
}

impl Runtime {
    /// Takes ownership of a build. Fails with [`RuntimeError::NoEntryPoint`]
    /// when the graph has no Tick node, since nothing would ever execute.
    pub fn new(
        mut compiled: CompiledGraph,
        project: Project,
        settings: Settings,
    ) -> Result<Runtime, RuntimeError> {
        if compiled.tick.is_none() {
            return Err(RuntimeError::NoEntryPoint);
        }
        let values = std::mem::take(&mut compiled.values);
        let scene = std::mem::take(&mut compiled.scene);
        Ok(Runtime {
            graph: compiled,
            values,
            scene,
            project,
            settings,
            log: LogQueue::new(),
            frame: 0,
            started: false,
            halted: false,
            unbounded_warned: false,
        })
    }

    /// Executes one frame: Start chains on the first call, then the Tick
    /// chain, key event chains, and the force pass. Returns `false` once
    /// execution has halted and the host should return to edit mode.
    pub fn run_frame(&mut self, input: &FrameInput) -> bool {
        if self.halted {
            return false;
        }
        self.frame += 1;

        // The special slots mirror host state; refresh before any chain
        // can read them.
        let _ = self.values.set(SLOT_MOUSE_X, Value::Number(input.mouse.x as f64));
        let _ = self.values.set(SLOT_MOUSE_Y, Value::Number(input.mouse.y as f64));
        let _ = self.values.set(SLOT_SCREEN_W, Value::Number(input.viewport.x as f64));
        let _ = self.values.set(SLOT_SCREEN_H, Value::Number(input.viewport.y as f64));

        if !self.started {
            self.started = true;
            for node in self.nodes_of_kind(NodeKind::Start) {
                self.walk_from(node, 0);
            }
        }

        if let Some(tick) = self.graph.tick {
            self.walk_from(tick, 0);
        }

        for node in self.nodes_of_kind(NodeKind::OnKey) {
            let Some(key_pin) = self.graph.input_pin(node, 0) else {
                continue;
            };
            let key = key_pin.text.clone();
            let action = self
                .graph
                .input_pin(node, 1)
                .map(|p| KeyAction::from_option(p.picked_option))
                .unwrap_or(KeyAction::Pressed);
            if action.satisfied(&key, input) {
                self.walk_from(node, 0);
            }
        }

        self.scene.integrate_forces(input.dt);

        !self.halted
    }

    /// Like [`Runtime::run_frame`], but first verifies this build is still
    /// current for the given source graph.
    pub fn run_frame_checked(
        &mut self,
        source: &GraphContext,
        input: &FrameInput,
    ) -> Result<bool, RuntimeError> {
        if self.graph.is_stale(source) {
            return Err(RuntimeError::StaleBuild);
        }
        Ok(self.run_frame(input))
    }

    /// Stops execution; the next `run_frame` returns `false` immediately.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn log(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Drains the accumulated log for the host's log panel.
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        self.log.drain()
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<usize> {
        self.graph.nodes.iter().positions(|n| n.kind == kind).collect()
    }

    pub(crate) fn log_error(&mut self, message: impl Into<String>) {
        self.log.push(LogLevel::Error, self.frame, message);
    }

    pub(crate) fn log_warning(&mut self, message: impl Into<String>) {
        self.log.push(LogLevel::Warning, self.frame, message);
    }

    pub(crate) fn log_info(&mut self, message: impl Into<String>) {
        self.log.push(LogLevel::Info, self.frame, message);
    }
}
