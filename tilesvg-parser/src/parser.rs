// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, HashSet};

use tilesvg_tree::transform::{parse_transforms, transforms_to_matrix, TransformList};
use tilesvg_tree::{
    Attributes, Group, GroupDef, LinearGradient, Matrix, ModelType, Node, NodeKind, OpenOrClosed,
    PaintServer, Path, PathDef, Project, RadialGradient, Rect, Stop, Style, Tile, TileDef,
    Transform, Use, UseDef,
};

use crate::events::{self, SaxHandler};
use crate::shapes;
use crate::{Error, Options};

/// Parses a raw SVG document into a tile.
#[derive(Debug)]
pub struct SvgParser<'a> {
    text: &'a str,
    opt: &'a Options,
}

impl<'a> SvgParser<'a> {
    /// Creates a parser for an SVG string.
    pub fn new(text: &'a str, opt: &'a Options) -> Self {
        SvgParser { text, opt }
    }

    /// Imports the document into `project`.
    ///
    /// Returns the root tile, which is appended to the project.
    /// On error nothing is appended, but nodes created before the failure
    /// stay in the project registry.
    pub fn to_tile(&self, project: &mut Project) -> Result<Node, Error> {
        let doc = roxmltree::Document::parse_with_options(self.text, self.opt.to_xml_options())
            .map_err(|e| match e {
                roxmltree::Error::NodesLimitReached => Error::ElementsLimitReached,
                e => Error::ParsingFailed(e),
            })?;

        let mut importer = Importer::new(project, self.opt);
        events::stream(&doc, &mut importer)?;
        importer.finish()
    }
}

/// An open element.
struct Frame {
    tag: String,
    /// `None` for elements that do not produce a node, like `stop`.
    model: Option<Node>,
    /// Accumulated transform of this element and all its ancestors.
    transform: Matrix,
    text_seen: bool,
}

struct PendingGradient {
    server: PaintServer,
    href: Option<String>,
}

struct Importer<'a> {
    project: &'a mut Project,
    opt: &'a Options,
    frames: Vec<Frame>,
    tiles: Vec<Node>,
    root: Option<Node>,
    skipped: HashSet<String>,
    skip_depth: usize,
    ids: HashMap<String, Node>,
    gradient: Option<PendingGradient>,
    uses: Vec<Node>,
}

impl<'a> SaxHandler for Importer<'a> {
    type Error = Error;

    fn open_tag(&mut self, name: &str, attrs: &Attributes) -> Result<(), Error> {
        if self.skipped.contains(name) {
            self.skip_depth += 1;
            return Ok(());
        }

        log::debug!("Open {} tag.", name);
        match name {
            "svg" => self.open_svg(attrs)?,
            "g" => self.open_group(attrs)?,
            "path" => {
                let d = required(attrs, "path", "d")?;
                self.open_shape(name, PathDef::from_d(d)?, attrs)?;
            }
            "polygon" | "polyline" => {
                let (element, closing) = if name == "polygon" {
                    ("polygon", OpenOrClosed::Closed)
                } else {
                    ("polyline", OpenOrClosed::Open)
                };
                let points = required(attrs, element, "points")?;
                self.open_shape(name, PathDef::from_points(points, closing)?, attrs)?;
            }
            "rect" | "circle" | "ellipse" | "line" => match shapes::convert(name, attrs)? {
                Some(def) => self.open_shape(name, def, attrs)?,
                None => self.push_frame(name, None),
            },
            "use" => self.open_use(attrs)?,
            "linearGradient" | "radialGradient" => {
                self.open_gradient(name, attrs);
                self.push_frame(name, None);
            }
            "stop" => {
                let gradient = self.gradient.as_mut().ok_or(Error::OrphanStop)?;
                gradient.server.push_stop(Stop::from_attributes(attrs)?);
                self.push_frame(name, None);
            }
            "title" => self.push_frame(name, None),
            _ => {
                log::warn!("Skipping unsupported tag '{}'.", name);
                self.skipped.insert(name.to_string());
                self.skip_depth += 1;
            }
        }

        Ok(())
    }

    fn close_tag(&mut self, name: &str) -> Result<(), Error> {
        if self.skipped.contains(name) {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return Ok(());
        }

        log::debug!("Close {} tag.", name);
        if name.to_ascii_lowercase().contains("gradient") {
            self.commit_gradient()?;
        }

        if let Some(frame) = self.frames.pop() {
            if frame.tag == "svg" {
                self.tiles.pop();
            }
        }

        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        let text = text.trim();
        if text.is_empty() || self.skip_depth > 0 {
            return Ok(());
        }

        let len = self.frames.len();
        let frame = match self.frames.last_mut() {
            Some(frame) => frame,
            None => return Ok(()),
        };

        if frame.tag != "title" {
            log::warn!("Unexpected text in '{}'. Ignored.", frame.tag);
            return Ok(());
        }

        // Only the first text node is the title.
        if frame.text_seen {
            return Ok(());
        }
        frame.text_seen = true;

        if !self.opt.use_titles {
            return Ok(());
        }

        let tile = match len.checked_sub(2).map(|i| &self.frames[i]) {
            Some(Frame {
                model: Some(node), ..
            }) if matches!(*node.borrow(), NodeKind::Tile(_)) => node.clone(),
            _ => {
                log::warn!("A title outside of a tile is ignored.");
                return Ok(());
            }
        };

        tile.borrow_mut().set_name(text.to_string());
        Ok(())
    }
}

impl<'a> Importer<'a> {
    fn new(project: &'a mut Project, opt: &'a Options) -> Self {
        Importer {
            project,
            opt,
            frames: Vec::new(),
            tiles: Vec::new(),
            root: None,
            skipped: HashSet::new(),
            skip_depth: 0,
            ids: HashMap::new(),
            gradient: None,
            uses: Vec::new(),
        }
    }

    fn parent_transform(&self) -> Matrix {
        self.frames.last().map(|f| f.transform).unwrap_or_default()
    }

    fn push_frame(&mut self, tag: &str, model: Option<Node>) {
        let transform = self.parent_transform();
        self.push_frame_with(tag, model, transform);
    }

    fn push_frame_with(&mut self, tag: &str, model: Option<Node>, transform: Matrix) {
        self.frames.push(Frame {
            tag: tag.to_string(),
            model,
            transform,
            text_seen: false,
        });
    }

    /// Appends `node` to the nearest container.
    fn attach(&mut self, node: &Node) -> Result<(), Error> {
        let parent = self
            .frames
            .iter()
            .rev()
            .filter_map(|f| f.model.as_ref())
            .find(|m| m.borrow().is_container())
            .cloned();

        match parent {
            Some(parent) => parent.append(node.clone()),
            None => {
                let kind = node.borrow().model_type();
                if kind == ModelType::Tile && self.root.is_none() {
                    self.root = Some(node.clone());
                } else {
                    return Err(Error::EmptyStack(kind));
                }
            }
        }

        Ok(())
    }

    fn register(&mut self, attrs: &Attributes, node: &Node) {
        if let Some(id) = attrs.get("id") {
            if self.ids.contains_key(id) {
                log::warn!("Element '{}' is duplicated. Only the first one is referable.", id);
            } else {
                self.ids.insert(id.clone(), node.clone());
            }
        }
    }

    fn create(&mut self, kind: NodeKind, attrs: &Attributes) -> Result<Node, Error> {
        let node = self.project.create(kind);
        self.attach(&node)?;
        self.register(attrs, &node);
        Ok(node)
    }

    fn open_svg(&mut self, attrs: &Attributes) -> Result<(), Error> {
        let text = required(attrs, "svg", "viewBox")?;
        let numbers = svgtypes::NumberListParser::from(text.as_str())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| Error::InvalidViewBox(text.clone()))?;
        let bounds = Rect::from_slice(&numbers).ok_or_else(|| Error::InvalidViewBox(text.clone()))?;

        let tile = Tile::new(TileDef {
            bounds,
            name: String::new(),
        });
        let node = self.create(NodeKind::Tile(tile), attrs)?;
        self.tiles.push(node.clone());
        self.push_frame("svg", Some(node));
        Ok(())
    }

    fn open_group(&mut self, attrs: &Attributes) -> Result<(), Error> {
        let transforms = local_transforms(attrs)?;
        let transform = self
            .parent_transform()
            .multiply(&transforms_to_matrix(&transforms));

        let def = GroupDef {
            name: attrs.get("id").cloned().unwrap_or_default(),
            transforms,
            style: Style::from_attributes(attrs)?,
        };
        let node = self.create(NodeKind::Group(Group::new(def)), attrs)?;
        self.push_frame_with("g", Some(node), transform);
        Ok(())
    }

    /// Bakes the accumulated transform into the path geometry.
    fn open_shape(&mut self, tag: &str, def: PathDef, attrs: &Attributes) -> Result<(), Error> {
        let transforms = local_transforms(attrs)?;
        let transform = self
            .parent_transform()
            .multiply(&transforms_to_matrix(&transforms));

        let mut def = if transform.is_identity() {
            def
        } else {
            def.transformed(&transform)
        };
        def.style = Style::from_attributes(attrs)?;
        def.name = attrs.get("id").cloned().unwrap_or_default();

        log::debug!("Parsed {} '{}'.", tag, def.to_d());
        let node = self.create(NodeKind::Path(Path::new(def)), attrs)?;
        self.push_frame_with(tag, Some(node), transform);
        Ok(())
    }

    /// Keeps the transform symbolic, since a `use` has no geometry of its own.
    fn open_use(&mut self, attrs: &Attributes) -> Result<(), Error> {
        let href = match attrs.get("xlink:href").or_else(|| attrs.get("href")) {
            Some(link) => match link.strip_prefix('#') {
                Some(id) => id.to_string(),
                None => {
                    log::warn!("'{}' is not a local reference.", link);
                    link.clone()
                }
            },
            None => {
                log::warn!("A 'use' element without a reference.");
                String::new()
            }
        };

        let parent = self.parent_transform();
        let local = local_transforms(attrs)?;
        let transform = parent.multiply(&transforms_to_matrix(&local));

        let mut transforms = TransformList::new();
        if !parent.is_identity() {
            transforms.push(Transform::Matrix(parent));
        }
        transforms.extend(local);

        let def = UseDef {
            name: attrs.get("id").cloned().unwrap_or_default(),
            href,
            transforms,
            x: shapes::optional_number(attrs, "x").unwrap_or(0.0),
            y: shapes::optional_number(attrs, "y").unwrap_or(0.0),
            width: shapes::optional_number(attrs, "width"),
            height: shapes::optional_number(attrs, "height"),
            style: Style::from_attributes(attrs)?,
        };

        let node = self.create(NodeKind::Use(Use::new(def)), attrs)?;
        self.uses.push(node.clone());
        self.push_frame_with("use", Some(node), transform);
        Ok(())
    }

    fn open_gradient(&mut self, name: &str, attrs: &Attributes) {
        if self.gradient.is_some() {
            log::warn!("Nested gradients are not allowed. The outer one is discarded.");
        }

        let server = if name == "linearGradient" {
            PaintServer::Linear(LinearGradient::from_attributes(attrs))
        } else {
            PaintServer::Radial(RadialGradient::from_attributes(attrs))
        };

        let href = attrs
            .get("xlink:href")
            .or_else(|| attrs.get("href"))
            .and_then(|link| link.strip_prefix('#'))
            .map(str::to_string);

        self.gradient = Some(PendingGradient { server, href });
    }

    /// Registers the pending gradient on the current tile.
    fn commit_gradient(&mut self) -> Result<(), Error> {
        let PendingGradient { mut server, href } = match self.gradient.take() {
            Some(g) => g,
            None => return Ok(()),
        };

        if server.id().is_empty() {
            log::warn!("A gradient without an ID is never referenced. Skipped.");
            return Ok(());
        }

        let tile = self.tiles.last().ok_or(Error::EmptyStack(ModelType::Tile))?;
        let mut tile = tile.borrow_mut();
        let tile = match *tile {
            NodeKind::Tile(ref mut tile) => tile,
            _ => return Err(Error::EmptyStack(ModelType::Tile)),
        };

        // A gradient without stops inherits them from the referenced one.
        if server.stops().is_empty() {
            if let Some(linked) = href.as_deref().and_then(|id| tile.paint_server(id)) {
                for stop in linked.stops() {
                    server.push_stop(stop.clone());
                }
            }
        }

        log::debug!(
            "Added {} gradient '{}' with {} stops.",
            server.type_name(),
            server.id(),
            server.stops().len()
        );
        tile.add_paint_server(server);
        Ok(())
    }

    /// Resolves `use` references and returns the root tile.
    fn finish(self) -> Result<Node, Error> {
        let root = self.root.ok_or(Error::NoRootElement)?;

        for node in &self.uses {
            let href = match *node.borrow() {
                NodeKind::Use(ref u) => u.def.href.clone(),
                _ => continue,
            };

            let target = self.ids.get(&href).map(|n| n.borrow().id().to_string());
            match target {
                Some(id) => {
                    if let NodeKind::Use(ref mut u) = *node.borrow_mut() {
                        u.def.href = id;
                    }
                }
                None => log::info!("Unresolved reference '#{}'.", href),
            }
        }

        self.project.append_tile(root.clone());
        Ok(root)
    }
}

fn required<'b>(
    attrs: &'b Attributes,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'b String, Error> {
    attrs
        .get(attribute)
        .ok_or(Error::MissingAttribute { element, attribute })
}

fn local_transforms(attrs: &Attributes) -> Result<TransformList, Error> {
    match attrs.get("transform") {
        Some(text) => Ok(parse_transforms(text)?),
        None => Ok(TransformList::new()),
    }
}
