// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`tilesvg-tree` is the editable scene representation used by `tilesvg`.

It contains the 2D affine algebra, the SVG `transform` list codec,
path definitions with inferred Bézier vertex kinds, presentation styles,
paint servers and the `Project` → `Tile` → `Group`/`Path`/`Use` scene graph.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::derivable_impls)]

mod error;
mod geom;
mod paint_server;
pub mod path;
mod project;
mod scene;
pub mod style;
pub mod transform;

pub use rctree;
pub use strict_num::ApproxEqUlps;

pub use crate::error::*;
pub use crate::geom::*;
pub use crate::paint_server::*;
pub use crate::path::{OpenOrClosed, PathDef, Subpath, Vertex, VertexKind};
pub use crate::project::Project;
pub use crate::scene::*;
pub use crate::style::{Attributes, Paint, Style};
pub use crate::transform::{Transform, TransformList};
