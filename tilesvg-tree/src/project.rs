// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::scene::calc_node_bbox;
use crate::{ModelType, Node, NodeKind, Rect, Tile, TileDef};

/// The root aggregate.
///
/// Owns tiles, the flat ID registry used to resolve `use` references
/// and the default-name counters.
#[derive(Debug)]
pub struct Project {
    /// Display name.
    pub name: String,
    tiles: Vec<Node>,
    items: HashMap<String, Node>,
    counters: HashMap<ModelType, usize>,
}

impl Default for Project {
    fn default() -> Self {
        Project::new()
    }
}

impl Project {
    /// Creates an empty project.
    pub fn new() -> Self {
        let mut project = Project {
            name: String::new(),
            tiles: Vec::new(),
            items: HashMap::new(),
            counters: HashMap::new(),
        };
        project.name = project.next_name(ModelType::Project);
        project
    }

    /// Returns the next default name for a model type, like `"group 3"`.
    pub fn next_name(&mut self, kind: ModelType) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{} {}", kind, counter)
    }

    /// Wraps `kind` into a node and registers it.
    ///
    /// A node without a name gets a default one.
    pub fn create(&mut self, mut kind: NodeKind) -> Node {
        if kind.name().is_empty() {
            let name = self.next_name(kind.model_type());
            kind.set_name(name);
        }

        log::debug!("New {} {}", kind.model_type(), kind.id());
        let id = kind.id().to_string();
        let node = Node::new(kind);
        self.items.insert(id, node.clone());
        node
    }

    /// Creates a blank tile and appends it to the project.
    pub fn make_tile(&mut self, x: f64, y: f64, width: f64, height: f64) -> Node {
        let tile = self.create(NodeKind::Tile(Tile::new(TileDef {
            bounds: Rect::new(x, y, width, height),
            name: String::new(),
        })));
        self.append_tile(tile.clone());
        tile
    }

    /// Appends a root tile.
    pub fn append_tile(&mut self, tile: Node) {
        if !matches!(*tile.borrow(), NodeKind::Tile(_)) {
            log::warn!("Only tiles can be appended to a project. Ignored.");
            return;
        }

        self.tiles.push(tile);
    }

    /// Looks up a registered node by its generated ID.
    pub fn find(&self, id: &str) -> Option<Node> {
        self.items.get(id).cloned()
    }

    /// Returns root tiles.
    pub fn tiles(&self) -> &[Node] {
        &self.tiles
    }

    /// Returns the number of registered nodes.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the union of all root tile bounds.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.tiles
            .iter()
            .filter_map(|tile| match *tile.borrow() {
                NodeKind::Tile(ref t) => Some(t.bounds()),
                _ => None,
            })
            .reduce(|b1, b2| b1.union(&b2))
    }

    /// Calculates node's bounding box, resolving `use` references.
    pub fn node_bbox(&self, node: &Node) -> Option<Rect> {
        calc_node_bbox(node, &|id| self.find(id), 0)
    }
}
