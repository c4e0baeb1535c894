//! Binary persistence for the authoring graph.
//!
//! The file carries the id counters and the raw node/pin/link arrays. The
//! derived variable table is never written; loading re-derives it from the
//! variable-producing nodes it finds.

use super::{GraphContext, Link, Node, Pin};
use crate::error::PersistError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// The on-disk record of one graph.
#[derive(Serialize, Deserialize, Debug)]
pub struct GraphFile {
    pub next_node_id: u64,
    pub next_pin_id: u64,
    pub next_link_id: u64,
    pub nodes: Vec<Node>,
    pub pins: Vec<Pin>,
    pub links: Vec<Link>,
}

impl GraphFile {
    pub fn capture(graph: &GraphContext) -> Self {
        let (next_node_id, next_pin_id, next_link_id) = graph.counters();
        Self {
            next_node_id,
            next_pin_id,
            next_link_id,
            nodes: graph.nodes().to_vec(),
            pins: graph.pins().to_vec(),
            links: graph.links().to_vec(),
        }
    }

    /// Reconstructs a live graph, re-deriving the variable table.
    pub fn restore(self) -> GraphContext {
        GraphContext::from_parts(
            self.nodes,
            self.pins,
            self.links,
            self.next_node_id,
            self.next_pin_id,
            self.next_link_id,
        )
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        encode_to_vec(self, standard()).map_err(|e| PersistError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        decode_from_slice(bytes, standard())
            .map(|(file, _)| file)
            .map_err(|e| PersistError::Decode(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let mut file = fs::File::open(path).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }
}
