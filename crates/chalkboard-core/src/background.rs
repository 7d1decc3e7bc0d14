//! Guide patterns painted beneath the drawing.
//!
//! The geometry depends only on the pattern and the surface size, never on
//! what is already painted.

use crate::color::Rgba8;
use crate::config::Background;
use crate::surface::{Pen, Surface, SurfaceSize};
use kurbo::{BezPath, Circle, Line, Point, Shape};

/// Spacing of grid and graph minor lines.
pub const GRID_SIZE: u32 = 20;
/// Spacing of ruled lines.
pub const LINE_HEIGHT: u32 = 30;
/// Spacing of the dot lattice.
pub const DOT_SPACING: u32 = 20;
/// Radius of each lattice dot.
pub const DOT_RADIUS: f64 = 1.0;
/// Graph paper draws a major line every this many minor lines.
pub const GRAPH_MAJOR_EVERY: u32 = 5;

/// Minor guide color (Tailwind gray-200).
pub const GUIDE_COLOR: Rgba8 = Rgba8::rgb(0xE5, 0xE7, 0xEB);
/// Major graph line color (Tailwind gray-300).
pub const GUIDE_MAJOR_COLOR: Rgba8 = Rgba8::rgb(0xD1, 0xD5, 0xDB);

const MINOR_WIDTH: f64 = 0.5;
const MAJOR_WIDTH: f64 = 1.0;
const PATH_TOLERANCE: f64 = 0.01;

/// A single guide element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuideMark {
    Line(Line),
    Dot(Circle),
}

/// How a layer's marks are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidePaint {
    Stroke(Pen),
    Fill(Rgba8),
}

/// Marks painted together in one call.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLayer {
    pub paint: GuidePaint,
    pub marks: Vec<GuideMark>,
}

impl GuideLayer {
    /// Combine all marks into one path.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for mark in &self.marks {
            match mark {
                GuideMark::Line(line) => {
                    path.move_to(line.p0);
                    path.line_to(line.p1);
                }
                GuideMark::Dot(circle) => {
                    path.extend(circle.path_elements(PATH_TOLERANCE));
                }
            }
        }
        path
    }
}

/// Multiples of `step` from `first` up to and including `limit`.
fn ticks(first: u32, step: u32, limit: u32) -> impl Iterator<Item = f64> {
    (first..=limit).step_by(step as usize).map(f64::from)
}

fn grid_lines(size: SurfaceSize, spacing: u32) -> Vec<GuideMark> {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let vertical = ticks(0, spacing, size.width)
        .map(|x| GuideMark::Line(Line::new(Point::new(x, 0.0), Point::new(x, h))));
    let horizontal = ticks(0, spacing, size.height)
        .map(|y| GuideMark::Line(Line::new(Point::new(0.0, y), Point::new(w, y))));
    vertical.chain(horizontal).collect()
}

/// Compute the guide layers for `pattern` on a surface of `size`, in paint order.
pub fn guide_layers(pattern: Background, size: SurfaceSize) -> Vec<GuideLayer> {
    let minor = GuidePaint::Stroke(Pen::hairline(GUIDE_COLOR, MINOR_WIDTH));
    let w = f64::from(size.width);

    match pattern {
        Background::Blank => Vec::new(),
        Background::Grid => vec![GuideLayer {
            paint: minor,
            marks: grid_lines(size, GRID_SIZE),
        }],
        Background::Lines => vec![GuideLayer {
            paint: minor,
            marks: ticks(LINE_HEIGHT, LINE_HEIGHT, size.height)
                .map(|y| GuideMark::Line(Line::new(Point::new(0.0, y), Point::new(w, y))))
                .collect(),
        }],
        Background::Dots => {
            let mut marks = Vec::new();
            for x in ticks(DOT_SPACING, DOT_SPACING, size.width) {
                for y in ticks(DOT_SPACING, DOT_SPACING, size.height) {
                    marks.push(GuideMark::Dot(Circle::new(Point::new(x, y), DOT_RADIUS)));
                }
            }
            vec![GuideLayer {
                paint: GuidePaint::Fill(GUIDE_COLOR),
                marks,
            }]
        }
        Background::Graph => vec![
            GuideLayer {
                paint: minor,
                marks: grid_lines(size, GRID_SIZE),
            },
            GuideLayer {
                paint: GuidePaint::Stroke(Pen::hairline(GUIDE_MAJOR_COLOR, MAJOR_WIDTH)),
                marks: grid_lines(size, GRID_SIZE * GRAPH_MAJOR_EVERY),
            },
        ],
    }
}

/// Fill the surface white and overlay `pattern`.
pub fn apply_background<S: Surface + ?Sized>(surface: &mut S, pattern: Background) {
    let Some(size) = surface.size() else {
        log::trace!("Skipping {} background on uninitialized surface", pattern.name());
        return;
    };

    surface.fill(Rgba8::WHITE);
    for layer in guide_layers(pattern, size) {
        let path = layer.to_path();
        match layer.paint {
            GuidePaint::Stroke(pen) => surface.stroke_path(&path, &pen),
            GuidePaint::Fill(color) => surface.fill_path(&path, color),
        }
    }
}
