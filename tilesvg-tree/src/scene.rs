// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::transform::{transforms_to_matrix, TransformList};
use crate::{Matrix, PaintServer, PathDef, Rect, Style};

/// Alias for `rctree::Node<NodeKind>`.
pub type Node = rctree::Node<NodeKind>;

/// Nested `use` elements deeper than this are not resolved when calculating
/// a bounding box. Protects against reference cycles.
const USE_DEPTH_LIMIT: usize = 32;

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A model type.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ModelType {
    Project,
    Tile,
    Group,
    Path,
    Use,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ModelType::Project => "project",
            ModelType::Tile => "tile",
            ModelType::Group => "group",
            ModelType::Path => "path",
            ModelType::Use => "use",
        };
        write!(f, "{}", name)
    }
}

/// A stable node identity.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Key {
    /// Node type.
    pub kind: ModelType,
    /// Generated once at creation, never reassigned.
    pub id: String,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Node's kind.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum NodeKind {
    Tile(Tile),
    Group(Group),
    Path(Path),
    Use(Use),
}

impl NodeKind {
    /// Returns node's key.
    pub fn key(&self) -> Key {
        Key {
            kind: self.model_type(),
            id: self.id().to_string(),
        }
    }

    /// Returns node's generated ID.
    pub fn id(&self) -> &str {
        match self {
            NodeKind::Tile(ref e) => e.id.as_str(),
            NodeKind::Group(ref e) => e.id.as_str(),
            NodeKind::Path(ref e) => e.id.as_str(),
            NodeKind::Use(ref e) => e.id.as_str(),
        }
    }

    /// Returns node's display name.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Tile(ref e) => e.def.name.as_str(),
            NodeKind::Group(ref e) => e.def.name.as_str(),
            NodeKind::Path(ref e) => e.def.name.as_str(),
            NodeKind::Use(ref e) => e.def.name.as_str(),
        }
    }

    /// Sets node's display name.
    pub fn set_name(&mut self, name: String) {
        match self {
            NodeKind::Tile(ref mut e) => e.def.name = name,
            NodeKind::Group(ref mut e) => e.def.name = name,
            NodeKind::Path(ref mut e) => e.def.name = name,
            NodeKind::Use(ref mut e) => e.def.name = name,
        }
    }

    /// Returns node's model type.
    pub fn model_type(&self) -> ModelType {
        match self {
            NodeKind::Tile(_) => ModelType::Tile,
            NodeKind::Group(_) => ModelType::Group,
            NodeKind::Path(_) => ModelType::Path,
            NodeKind::Use(_) => ModelType::Use,
        }
    }

    /// Returns node's style, for node kinds that have one.
    pub fn style(&self) -> Option<&Style> {
        match self {
            NodeKind::Tile(_) => None,
            NodeKind::Group(ref e) => e.def.style.as_ref(),
            NodeKind::Path(ref e) => e.def.style.as_ref(),
            NodeKind::Use(ref e) => e.def.style.as_ref(),
        }
    }

    /// Checks that the node can have children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Tile(_) | NodeKind::Group(_))
    }
}

/// A tile definition.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TileDef {
    /// Tile position and size on the project plane.
    pub bounds: Rect,
    /// Display name.
    pub name: String,
}

/// An independently bounded canvas.
///
/// Created for every `svg` element.
#[derive(Clone, Debug)]
pub struct Tile {
    /// Generated ID.
    pub id: String,
    /// Tile state.
    pub def: TileDef,
    paint_servers: Vec<PaintServer>,
}

impl Tile {
    /// Creates a tile with a new ID.
    pub fn new(def: TileDef) -> Self {
        Tile {
            id: generate_id(),
            def,
            paint_servers: Vec::new(),
        }
    }

    /// Moves and resizes the tile.
    pub fn place(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.def.bounds = Rect::new(x, y, width, height);
    }

    /// Returns the tile bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.def.bounds
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn left(&self) -> f64 {
        self.def.bounds.left()
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn top(&self) -> f64 {
        self.def.bounds.top()
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn right(&self) -> f64 {
        self.def.bounds.right()
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.def.bounds.bottom()
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn width(&self) -> f64 {
        self.def.bounds.width
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn height(&self) -> f64 {
        self.def.bounds.height
    }

    /// Returns the tile content area, which always starts at the origin.
    pub fn view_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }

    /// Registers a paint server.
    ///
    /// A server with the same ID is replaced.
    pub fn add_paint_server(&mut self, server: PaintServer) {
        match self.paint_servers.iter_mut().find(|ps| ps.id() == server.id()) {
            Some(existing) => {
                log::warn!("Duplicated paint server '{}'. Replaced.", server.id());
                *existing = server;
            }
            None => self.paint_servers.push(server),
        }
    }

    /// Returns a paint server by its document ID.
    pub fn paint_server(&self, id: &str) -> Option<&PaintServer> {
        self.paint_servers.iter().find(|ps| ps.id() == id)
    }

    /// Returns all paint servers in declaration order.
    pub fn paint_servers(&self) -> &[PaintServer] {
        &self.paint_servers
    }
}

/// A group definition.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct GroupDef {
    /// Display name. The element `id` when it has one.
    pub name: String,

    /// Element's own `transform`.
    ///
    /// Already baked into descendant paths, kept for reference.
    pub transforms: TransformList,

    /// Presentation attributes, if any were set.
    pub style: Option<Style>,
}

/// A group.
///
/// `g` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Group {
    pub id: String,
    pub def: GroupDef,
}

impl Group {
    /// Creates a group with a new ID.
    pub fn new(def: GroupDef) -> Self {
        Group {
            id: generate_id(),
            def,
        }
    }
}

/// A path.
///
/// `path`, `polygon` and `polyline` elements in SVG.
/// Coordinates are absolute, with all ancestor transforms applied.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Path {
    pub id: String,
    pub def: PathDef,
}

impl Path {
    /// Creates a path with a new ID.
    pub fn new(def: PathDef) -> Self {
        Path {
            id: generate_id(),
            def,
        }
    }
}

/// A `use` definition.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct UseDef {
    /// Display name.
    pub name: String,

    /// Referenced node ID, without the `#`.
    ///
    /// A document ID after parsing, replaced with the generated one when
    /// the reference can be resolved.
    pub href: String,

    /// Accumulated ancestor transform followed by the element's own ones.
    pub transforms: TransformList,

    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
    #[allow(missing_docs)]
    pub width: Option<f64>,
    #[allow(missing_docs)]
    pub height: Option<f64>,

    /// Presentation attributes, if any were set.
    pub style: Option<Style>,
}

/// A reference to another node.
///
/// `use` element in SVG. Always a leaf.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Use {
    pub id: String,
    pub def: UseDef,
}

impl Use {
    /// Creates a use with a new ID.
    pub fn new(def: UseDef) -> Self {
        Use {
            id: generate_id(),
            def,
        }
    }

    /// Returns the matrix that maps the referenced node into place.
    ///
    /// `x` and `y` are an extra translation after the transform list.
    pub fn matrix(&self) -> Matrix {
        transforms_to_matrix(&self.def.transforms).translate(self.def.x, self.def.y)
    }
}

/// Additional `Node` methods.
pub trait NodeExt {
    /// Returns node's key.
    fn key(&self) -> Key;

    /// Appends `kind` as a node child.
    ///
    /// The new node is not registered in any project.
    /// Use [`Project::create`](crate::Project::create) for that.
    fn append_kind(&self, kind: NodeKind) -> Node;

    /// Calls a closure for each direct child.
    fn each<F: FnMut(&Node)>(&self, f: F);

    /// Returns the number of direct children.
    fn count(&self) -> usize;

    /// Returns the nearest tile, including the node itself.
    fn tile(&self) -> Option<Node>;

    /// Calculates node's bounding box.
    ///
    /// `use` nodes are skipped, since resolving them requires a project.
    /// See [`Project::node_bbox`](crate::Project::node_bbox).
    fn calculate_bbox(&self) -> Option<Rect>;
}

impl NodeExt for Node {
    #[inline]
    fn key(&self) -> Key {
        self.borrow().key()
    }

    #[inline]
    fn append_kind(&self, kind: NodeKind) -> Node {
        let new_node = Node::new(kind);
        self.append(new_node.clone());
        new_node
    }

    fn each<F: FnMut(&Node)>(&self, mut f: F) {
        for child in self.children() {
            f(&child);
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.children().count()
    }

    fn tile(&self) -> Option<Node> {
        self.ancestors()
            .find(|n| matches!(*n.borrow(), NodeKind::Tile(_)))
    }

    #[inline]
    fn calculate_bbox(&self) -> Option<Rect> {
        calc_node_bbox(self, &|_| None, 0)
    }
}

/// Calculates a bounding box, resolving `use` references with `resolve`.
pub(crate) fn calc_node_bbox(
    node: &Node,
    resolve: &dyn Fn(&str) -> Option<Node>,
    depth: usize,
) -> Option<Rect> {
    match *node.borrow() {
        NodeKind::Tile(ref tile) => Some(tile.bounds()),
        NodeKind::Path(ref path) => path.def.bbox(),
        NodeKind::Group(_) => {
            let mut bbox: Option<Rect> = None;
            for child in node.children() {
                if let Some(c_bbox) = calc_node_bbox(&child, resolve, depth) {
                    bbox = Some(match bbox {
                        Some(b) => b.union(&c_bbox),
                        None => c_bbox,
                    });
                }
            }

            bbox
        }
        NodeKind::Use(ref u) => {
            if depth >= USE_DEPTH_LIMIT {
                log::warn!("'use' nesting is too deep. Bounding box is ignored.");
                return None;
            }

            let target = resolve(&u.def.href)?;
            let bbox = calc_node_bbox(&target, resolve, depth + 1)?;
            Some(u.matrix().apply_rect(bbox))
        }
    }
}
