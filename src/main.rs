// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use tilesvg::transform::transforms_to_string;
use tilesvg::{Node, NodeExt, NodeKind, Project, Rect, Style, TileLoading};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            let level = if args.verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            };
            log::set_max_level(level);
        }
    }

    let svg_data = timed(args.perf, "Reading", || -> Result<Vec<u8>, &str> {
        if let InputFrom::File(ref file) = args.in_svg {
            std::fs::read(file).map_err(|_| "failed to open the provided file")
        } else {
            use std::io::Read;
            let mut buf = Vec::new();
            let stdin = std::io::stdin();
            let mut handle = stdin.lock();
            handle
                .read_to_end(&mut buf)
                .map_err(|_| "failed to read stdin")?;
            Ok(buf)
        }
    })?;

    let mut project = Project::new();
    let tile = timed(args.perf, "SVG Parsing", || {
        project
            .load_tile_data(&svg_data, &args.opt)
            .map_err(|e| e.to_string())
    })?;

    print_node(&project, &tile, 0, args.bbox);
    Ok(())
}

const HELP: &str = "\
tilesvg imports an SVG file into a tile and prints the resulting scene.

USAGE:
  tilesvg [OPTIONS] <in-svg>  # from file
  tilesvg [OPTIONS] -         # from stdin

  tilesvg in.svg
  tilesvg --bbox in.svgz

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

      --no-titles               Do not use 'title' elements as tile names
      --bbox                    Prints bounding boxes

      --perf                    Prints performance stats
      --quiet                   Disables warnings
      --verbose                 Enables parser tracing

ARGS:
  <in-svg>                      Input file
";

#[derive(Debug)]
struct CliArgs {
    no_titles: bool,
    bbox: bool,
    perf: bool,
    quiet: bool,
    verbose: bool,
    input: String,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        no_titles: input.contains("--no-titles"),
        bbox: input.contains("--bbox"),
        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),
        verbose: input.contains("--verbose"),
        input: input.free_from_str()?,
    })
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom {
    Stdin,
    File(path::PathBuf),
}

struct Args {
    in_svg: InputFrom,
    opt: tilesvg::Options,
    bbox: bool,
    perf: bool,
    quiet: bool,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let in_svg = if args.input == "-" {
        InputFrom::Stdin
    } else {
        InputFrom::File(args.input.into())
    };

    if args.quiet && args.verbose {
        println!("Warning: --verbose has no effect when --quiet is set.");
    }

    let opt = tilesvg::Options {
        use_titles: !args.no_titles,
        ..tilesvg::Options::default()
    };

    Ok(Args {
        in_svg,
        opt,
        bbox: args.bbox,
        perf: args.perf,
        quiet: args.quiet,
        verbose: args.verbose,
    })
}

fn print_node(project: &Project, node: &Node, depth: usize, with_bbox: bool) {
    let indent = "  ".repeat(depth);
    let mut line = match *node.borrow() {
        NodeKind::Tile(ref tile) => {
            format!(
                "tile '{}' {},{} {}x{}",
                tile.def.name,
                tile.left(),
                tile.top(),
                tile.width(),
                tile.height()
            )
        }
        NodeKind::Group(ref group) => {
            let mut s = format!("group '{}'", group.def.name);
            push_transforms(&mut s, &transforms_to_string(&group.def.transforms));
            push_style(&mut s, group.def.style.as_ref());
            s
        }
        NodeKind::Path(ref path) => {
            let mut s = format!("path '{}' d='{}'", path.def.name, path.def.to_d());
            push_style(&mut s, path.def.style.as_ref());
            s
        }
        NodeKind::Use(ref u) => {
            let mut s = format!("use '{}' href='#{}'", u.def.name, u.def.href);
            push_transforms(&mut s, &transforms_to_string(&u.def.transforms));
            if u.def.x != 0.0 || u.def.y != 0.0 {
                s.push_str(&format!(" x={} y={}", u.def.x, u.def.y));
            }
            push_style(&mut s, u.def.style.as_ref());
            s
        }
    };

    if with_bbox {
        match project.node_bbox(node) {
            Some(bbox) => line.push_str(&format!(" bbox={}", format_rect(&bbox))),
            None => line.push_str(" bbox=none"),
        }
    }

    println!("{}{}", indent, line);

    if let NodeKind::Tile(ref tile) = *node.borrow() {
        for server in tile.paint_servers() {
            println!(
                "{}  {} gradient '{}' units={} spread={} stops={}",
                indent,
                server.type_name(),
                server.id(),
                server.units(),
                server.spread_method(),
                server.stops().len()
            );
        }
    }

    node.each(|child| print_node(project, child, depth + 1, with_bbox));
}

fn push_transforms(s: &mut String, transforms: &str) {
    if !transforms.is_empty() {
        s.push_str(&format!(" transform='{}'", transforms));
    }
}

fn push_style(s: &mut String, style: Option<&Style>) {
    if let Some(style) = style {
        for (name, value) in style.to_attributes() {
            s.push_str(&format!(" {}='{}'", name, value));
        }
    }
}

fn format_rect(r: &Rect) -> String {
    fn round_len(v: f64) -> f64 {
        (v * 1000.0).round() / 1000.0
    }

    format!(
        "{},{},{},{}",
        round_len(r.x),
        round_len(r.y),
        round_len(r.width),
        round_len(r.height)
    )
}

static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
