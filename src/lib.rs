// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`tilesvg` is an SVG import core for a tile-based vector editor.

It combines [`tilesvg_parser`], which streams SVG documents into tiles,
and [`tilesvg_tree`], the editable scene model.

```
use tilesvg::{Options, Project, TileLoading};

let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 256 256'><g/></svg>";
let mut project = Project::new();
let tile = project.load_tile(svg, &Options::default()).unwrap();
assert_eq!(tile.children().count(), 1);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use tilesvg_parser::{decompress_svgz, Error, Options, SvgParser, TileLoading};
pub use tilesvg_tree::*;

pub use tilesvg_parser;
pub use tilesvg_tree;
