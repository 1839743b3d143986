// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use tilesvg_parser::{Error, Options, TileLoading};
use tilesvg_tree::{
    ModelType, Node, NodeExt, NodeKind, PaintServer, PathError, Project, StyleError, Transform,
    TransformError, Vector,
};

fn load(svg: &str) -> (Project, Node) {
    let mut project = Project::new();
    let tile = project.load_tile(svg, &Options::default()).unwrap();
    (project, tile)
}

fn load_err(svg: &str) -> Error {
    let mut project = Project::new();
    project.load_tile(svg, &Options::default()).unwrap_err()
}

fn paint_servers(tile: &Node) -> Vec<PaintServer> {
    match *tile.borrow() {
        NodeKind::Tile(ref t) => t.paint_servers().to_vec(),
        _ => unreachable!(),
    }
}

fn paint_server(tile: &Node, id: &str) -> PaintServer {
    match paint_servers(tile).into_iter().find(|s| s.id() == id) {
        Some(server) => server,
        None => panic!("no paint server '{}'", id),
    }
}

fn path_d(node: &Node) -> String {
    match *node.borrow() {
        NodeKind::Path(ref path) => path.def.to_d(),
        _ => unreachable!(),
    }
}

#[test]
fn tile_with_group() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 256 256'>
        <g id='layer'>
            <path d='M 0 0 L 10 10'/>
            <polygon points='0,0 10,0 10,10'/>
            <circle cx='5' cy='5' r='5'/>
        </g>
    </svg>
    ";

    let (project, tile) = load(svg);
    assert_eq!(project.tiles().len(), 1);
    assert_eq!(project.item_count(), 5);

    match *tile.borrow() {
        NodeKind::Tile(ref t) => {
            assert_eq!(t.left(), 0.0);
            assert_eq!(t.top(), 0.0);
            assert_eq!(t.right(), 256.0);
            assert_eq!(t.bottom(), 256.0);
        }
        _ => unreachable!(),
    }

    assert_eq!(tile.count(), 1);
    let group = tile.first_child().unwrap();
    assert_eq!(group.borrow().model_type(), ModelType::Group);
    assert_eq!(group.borrow().name(), "layer");
    assert_eq!(group.count(), 3);
}

#[test]
fn default_names() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'>
        <g/>
        <g/>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(tile.borrow().name(), "tile 1");
    let names: Vec<String> = tile.children().map(|n| n.borrow().name().to_string()).collect();
    assert_eq!(names, vec!["group 1", "group 2"]);
}

#[test]
fn simplify_paths() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path d='M 10 20 L 10 30 Z Z Z'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(path_d(&tile.first_child().unwrap()), "M 10,20 L 10,30 Z");
}

#[test]
fn polyline_is_open() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <polyline points='0,0 10,0 10,10'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(path_d(&tile.first_child().unwrap()), "M 0,0 L 10,0 L 10,10");
}

#[test]
fn transforms_are_baked() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
        <g transform='translate(10 20)'>
            <g transform='scale(2)'>
                <path d='M 0 0 L 1 1' transform='translate(1 0)'/>
            </g>
        </g>
    </svg>
    ";

    let (_, tile) = load(svg);
    let outer = tile.first_child().unwrap();
    match *outer.borrow() {
        NodeKind::Group(ref g) => {
            assert_eq!(g.def.transforms, vec![Transform::Translate { x: 10.0, y: 20.0 }]);
        }
        _ => unreachable!(),
    }

    let path = outer.first_child().unwrap().first_child().unwrap();
    assert_eq!(path_d(&path), "M 12,20 L 14,22");
}

#[test]
fn style_is_attached() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path d='M 0 0 L 1 1' fill='red' stroke='url(#lg1) blue' stroke-width='2.7'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let path = tile.first_child().unwrap();
    let node = path.borrow();
    let style = node.style().unwrap();
    assert_eq!(style.fill.as_ref().unwrap().color.as_deref(), Some("#FF0000"));
    let stroke = style.stroke.as_ref().unwrap();
    assert_eq!(stroke.server.as_deref(), Some("lg1"));
    assert_eq!(stroke.color.as_deref(), Some("#0000FF"));
    assert_eq!(style.stroke_width, Some(2));
}

#[test]
fn unstyled_path() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path d='M 0 0 L 1 1'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert!(tile.first_child().unwrap().borrow().style().is_none());
}

#[test]
fn linear_gradient() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <linearGradient id='lg1' x1='10%' spreadMethod='reflect'>
            <stop offset='0' stop-color='red'/>
            <stop offset='1' stop-color='#00f' stop-opacity='0.5'/>
        </linearGradient>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(tile.count(), 0);

    let server = paint_server(&tile, "lg1");
    assert_eq!(server.type_name(), "linear");
    assert_eq!(server.spread_method().to_string(), "reflect");
    assert_eq!(server.stops().len(), 2);
    assert_eq!(server.stops()[0].color, "#FF0000");
    assert_eq!(server.stops()[1].color, "#0000FF");
    assert_eq!(server.stops()[1].opacity, 0.5);
}

#[test]
fn gradient_inherits_stops() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'
         viewBox='0 0 1 1'>
        <linearGradient id='lg1'>
            <stop offset='0' stop-color='red'/>
            <stop offset='1' stop-color='blue'/>
        </linearGradient>
        <radialGradient id='rg1' xlink:href='#lg1'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let server = paint_server(&tile, "rg1");
    assert_eq!(server.type_name(), "radial");
    assert_eq!(server.stops().len(), 2);
}

#[test]
fn gradient_without_id() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <linearGradient>
            <stop offset='0' stop-color='red'/>
        </linearGradient>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert!(paint_servers(&tile).is_empty());
}

#[test]
fn gradients_belong_to_innermost_tile() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
        <linearGradient id='outer'>
            <stop offset='0' stop-color='red'/>
        </linearGradient>
        <svg viewBox='0 0 10 10'>
            <defs>
                <linearGradient id='inner'>
                    <stop offset='0' stop-color='blue'/>
                </linearGradient>
            </defs>
        </svg>
        <radialGradient id='after'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let ids = |node: &Node| -> Vec<String> {
        paint_servers(node).iter().map(|s| s.id().to_string()).collect()
    };

    let inner = tile.first_child().unwrap();
    assert_eq!(inner.borrow().model_type(), ModelType::Tile);
    assert_eq!(ids(&tile), vec!["outer", "after"]);
    assert_eq!(ids(&inner), vec!["inner"]);
}

#[test]
fn use_is_resolved() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'
         viewBox='0 0 100 100'>
        <path id='p' d='M 0 0 L 1 1'/>
        <use xlink:href='#p' x='10' width='3'/>
        <use href='#p'/>
    </svg>
    ";

    let (project, tile) = load(svg);
    let children: Vec<Node> = tile.children().collect();
    assert_eq!(children.len(), 3);

    let path_id = children[0].borrow().id().to_string();
    for node in &children[1..] {
        match *node.borrow() {
            NodeKind::Use(ref u) => assert_eq!(u.def.href, path_id),
            _ => unreachable!(),
        }
    }

    match *children[1].borrow() {
        NodeKind::Use(ref u) => {
            assert_eq!(u.def.x, 10.0);
            assert_eq!(u.def.y, 0.0);
            assert_eq!(u.def.width, Some(3.0));
            assert_eq!(u.def.height, None);
            assert!(u.def.transforms.is_empty());
        }
        _ => unreachable!(),
    }

    let bbox = project.node_bbox(&children[1]).unwrap();
    assert_eq!(bbox.x, 10.0);
    assert_eq!(bbox.width, 1.0);
}

#[test]
fn use_transforms() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'
         viewBox='0 0 100 100'>
        <g transform='translate(5 0)'>
            <use xlink:href='#p' x='1' y='2' transform='scale(2)'/>
        </g>
        <path id='p' d='M 0 0 L 1 1'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let node = tile.first_child().unwrap().first_child().unwrap();
    match *node.borrow() {
        NodeKind::Use(ref u) => {
            assert_eq!(u.def.transforms.len(), 2);
            assert!(matches!(u.def.transforms[0], Transform::Matrix(_)));
            assert_eq!(u.def.transforms[1], Transform::Scale { x: 2.0, y: None });
            assert_eq!(u.matrix().apply(Vector::new(0.0, 0.0)), Vector::new(7.0, 4.0));
        }
        _ => unreachable!(),
    };
}

#[test]
fn unresolved_use() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <use href='#missing'/>
    </svg>
    ";

    let (project, tile) = load(svg);
    let node = tile.first_child().unwrap();
    match *node.borrow() {
        NodeKind::Use(ref u) => assert_eq!(u.def.href, "missing"),
        _ => unreachable!(),
    }
    assert_eq!(project.node_bbox(&node), None);
}

#[test]
fn duplicated_id() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path id='a' d='M 0 0 L 1 1'/>
        <path id='a' d='M 0 0 L 2 2'/>
        <use href='#a'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let first_id = tile.first_child().unwrap().borrow().id().to_string();
    match *tile.last_child().unwrap().borrow() {
        NodeKind::Use(ref u) => assert_eq!(u.def.href, first_id),
        _ => unreachable!(),
    };
}

#[test]
fn nested_svg() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
        <svg viewBox='10 10 20 20'>
            <path d='M 0 0 L 1 1'/>
        </svg>
        <path d='M 0 0 L 1 1'/>
    </svg>
    ";

    let (project, tile) = load(svg);
    assert_eq!(project.tiles().len(), 1);
    assert_eq!(tile.count(), 2);

    let inner = tile.first_child().unwrap();
    assert_eq!(inner.count(), 1);
    match *inner.borrow() {
        NodeKind::Tile(ref t) => {
            assert_eq!(t.left(), 10.0);
            assert_eq!(t.width(), 20.0);
        }
        _ => unreachable!(),
    }

    let path = inner.first_child().unwrap();
    assert!(path.tile().unwrap() == inner);
}

#[test]
fn title_names_tile() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <title>  Logo  </title>
        <g><title>Not a tile</title></g>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(tile.borrow().name(), "Logo");
    assert_eq!(tile.first_child().unwrap().borrow().name(), "group 1");
}

#[test]
fn titles_disabled() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <title>Logo</title>
    </svg>
    ";

    let opt = Options {
        use_titles: false,
        ..Options::default()
    };
    let mut project = Project::new();
    let tile = project.load_tile(svg, &opt).unwrap();
    assert_eq!(tile.borrow().name(), "tile 1");
}

#[test]
fn unknown_tags_are_skipped() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg'
         xmlns:ink='http://www.inkscape.org/namespaces/inkscape' viewBox='0 0 1 1'>
        <defs>
            <path d='M 0 0 L 1 1'/>
            <desc>Text</desc>
        </defs>
        <ink:layer>Text</ink:layer>
        <defs/>
        <g/>
    </svg>
    ";

    let (_, tile) = load(svg);
    let kinds: Vec<ModelType> = tile.children().map(|n| n.borrow().model_type()).collect();
    assert_eq!(kinds, vec![ModelType::Path, ModelType::Group]);
}

#[test]
fn invalid_shapes_are_skipped() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <rect width='0' height='10'/>
        <rect width='10' height='10'/>
    </svg>
    ";

    let (_, tile) = load(svg);
    assert_eq!(tile.count(), 1);
}

#[test]
fn missing_view_box() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg'/>";
    assert!(matches!(
        load_err(svg),
        Error::MissingAttribute {
            element: "svg",
            attribute: "viewBox"
        }
    ));
}

#[test]
fn invalid_view_box() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10'/>";
    assert!(matches!(load_err(svg), Error::InvalidViewBox(_)));

    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 a b'/>";
    assert!(matches!(load_err(svg), Error::InvalidViewBox(_)));
}

#[test]
fn missing_path_data() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path/>
    </svg>
    ";
    assert!(matches!(
        load_err(svg),
        Error::MissingAttribute {
            element: "path",
            attribute: "d"
        }
    ));

    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <polygon/>
    </svg>
    ";
    assert!(matches!(
        load_err(svg),
        Error::MissingAttribute {
            element: "polygon",
            attribute: "points"
        }
    ));
}

#[test]
fn invalid_attributes() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path d='M 0 0 X 1 1'/>
    </svg>
    ";
    assert!(matches!(load_err(svg), Error::InvalidPath(PathError::InvalidData(_))));

    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <g transform='spin(45)'/>
    </svg>
    ";
    assert!(matches!(
        load_err(svg),
        Error::InvalidTransform(TransformError::UnknownFunction(_))
    ));

    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <g fill='url(image.png)'/>
    </svg>
    ";
    assert!(matches!(
        load_err(svg),
        Error::InvalidStyle(StyleError::NotALocalReference(_))
    ));
}

#[test]
fn orphan_stop() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <stop offset='0'/>
    </svg>
    ";
    assert!(matches!(load_err(svg), Error::OrphanStop));

    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <stop offset='0' stop-color='nope'/>
    </svg>
    ";
    assert!(matches!(load_err(svg), Error::OrphanStop));
}

#[test]
fn content_outside_of_tile() {
    let svg = "<g xmlns='http://www.w3.org/2000/svg'/>";
    assert!(matches!(load_err(svg), Error::EmptyStack(ModelType::Group)));

    let svg = "<title xmlns='http://www.w3.org/2000/svg'>Text</title>";
    assert!(matches!(load_err(svg), Error::NoRootElement));
}

#[test]
fn failed_import_appends_nothing() {
    let svg = "
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'>
        <path/>
    </svg>
    ";

    let mut project = Project::new();
    assert!(project.load_tile(svg, &Options::default()).is_err());
    assert!(project.tiles().is_empty());
}

#[test]
fn nodes_limit() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'><g/><g/><g/><g/></svg>";
    let opt = Options {
        nodes_limit: 3,
        ..Options::default()
    };

    let mut project = Project::new();
    assert!(matches!(
        project.load_tile(svg, &opt),
        Err(Error::ElementsLimitReached)
    ));
}

#[test]
fn malformed_xml() {
    assert!(matches!(load_err("<svg>"), Error::ParsingFailed(_)));
}

#[test]
fn svgz() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 5 5'><g/></svg>";
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(svg.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let mut project = Project::new();
    let tile = project.load_tile_data(&data, &Options::default()).unwrap();
    assert_eq!(tile.count(), 1);
}

#[test]
fn invalid_data() {
    let mut project = Project::new();
    assert!(matches!(
        project.load_tile_data(&[0x1f, 0x8b, 0x00, 0x00], &Options::default()),
        Err(Error::MalformedGZip)
    ));
    assert!(matches!(
        project.load_tile_data(&[0xff, 0xfe, 0xfd], &Options::default()),
        Err(Error::NotAnUtf8Str)
    ));
}

#[test]
fn multiple_documents() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 10'/>";
    let mut project = Project::new();
    project.load_tile(svg, &Options::default()).unwrap();
    let second = project.load_tile(svg, &Options::default()).unwrap();

    assert_eq!(project.tiles().len(), 2);
    assert_eq!(second.borrow().name(), "tile 2");
    let bbox = project.bounding_box().unwrap();
    assert_eq!(bbox.width, 10.0);
}
