//! Link records: directed edges from output pins to input pins.

use super::pin::PinId;
use serde::{Deserialize, Serialize};

/// Unique, graph-scoped link identifier. Never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(pub u64);

/// A directed edge `output pin -> input pin`.
///
/// Flow links order execution; data links make the input pin mirror the
/// output pin's value slot after compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from: PinId,
    pub to: PinId,
}
