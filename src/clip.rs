// MIT/Apache2 License

use crate::{layout::LayoutConstants, util::approx_eq};
use euclid::default::{Box2D, Point2D};
use log::warn;
use lyon_path::{
    builder::{BorderRadii, PathBuilder as _},
    Path, Winding,
};
use std::iter::FromIterator;
use tinyvec::TinyVec;

/// Most clip specifications are at most this many operations long.
pub const MAX_CLIP_OPS: usize = 4;
/// Most compound clip paths are at most this many shapes long.
pub const MAX_PATH_SHAPES: usize = 2;

/// A list of clip operations, inline up to [`MAX_CLIP_OPS`].
pub type ClipOps = TinyVec<[ClipOp; MAX_CLIP_OPS]>;
/// A list of compound-path shapes, inline up to [`MAX_PATH_SHAPES`].
pub type ClipShapes = TinyVec<[ClipShape; MAX_PATH_SHAPES]>;

/// One closed contour inside a compound clip path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ClipShape {
    /// A full circle.
    Circle {
        center: Point2D<f32>,
        radius: f32,
        winding: Winding,
    },
    /// An axis-aligned rectangle.
    Rect { rect: Box2D<f32>, winding: Winding },
}

impl Default for ClipShape {
    #[inline]
    fn default() -> Self {
        ClipShape::Rect {
            rect: Box2D::zero(),
            winding: Winding::Positive,
        }
    }
}

/// A single clip operation.
///
/// Operations apply left to right against the surface's current clip region:
/// intersections narrow it, subtractions carve pieces out of it, and compound
/// paths are resolved to one region first and then intersected or subtracted
/// whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOp {
    /// Establish the base clip rectangle for a panel.
    ///
    /// Within a fresh save scope the current region is the full surface, so
    /// this coincides with an intersection; it is kept distinct because it
    /// documents intent and because hosts with a replace-capable clip API
    /// may map it directly.
    SetRect(Box2D<f32>),
    /// Narrow the region to its overlap with a rectangle.
    IntersectRect(Box2D<f32>),
    /// Carve a rectangle out of the region.
    SubtractRect(Box2D<f32>),
    /// Carve a compound path out of the region.
    SubtractPath(ClipShapes),
    /// Narrow the region to the union of the path's shapes.
    UnionPath(ClipShapes),
    /// Narrow the region to a rounded rectangle.
    RoundRect {
        rect: Box2D<f32>,
        radius_x: f32,
        radius_y: f32,
    },
}

impl Default for ClipOp {
    #[inline]
    fn default() -> Self {
        ClipOp::SetRect(Box2D::zero())
    }
}

/// An ordered sequence of clip operations.
///
/// A `ClipSpec` is a pure description: building one performs no drawing, and
/// applying one to an already-clipped region a second time leaves the region
/// unchanged, since every operation only narrows or re-narrows what is
/// already there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipSpec {
    ops: ClipOps,
}

impl ClipSpec {
    /// The operations, in application order.
    #[inline]
    pub fn ops(&self) -> &[ClipOp] {
        &self.ops
    }

    /// Whether this spec changes the clip at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The full panel bounds.
    pub fn plain(c: &LayoutConstants) -> ClipSpec {
        let mut ops = ClipOps::default();
        ops.push(ClipOp::SetRect(c.panel_bounds()));
        ClipSpec { ops }
    }

    /// An annular frame: a double-inset rectangle with a quadruple-inset
    /// rectangle carved out of its middle.
    pub fn frame(c: &LayoutConstants) -> ClipSpec {
        let mut ops = ClipOps::default();
        ops.push(ClipOp::SetRect(c.inset_bounds(2.0)));
        ops.push(ClipOp::SubtractRect(c.inset_bounds(4.0)));
        ClipSpec { ops }
    }

    /// The panel with a disc carved out of its bottom-left corner.
    pub fn cutout(c: &LayoutConstants) -> ClipSpec {
        let mut shapes = ClipShapes::default();
        shapes.push(ClipShape::Circle {
            center: Point2D::new(c.circle_radius, c.panel_height - c.circle_radius),
            radius: c.circle_radius,
            winding: Winding::Positive,
        });
        let mut ops = ClipOps::default();
        ops.push(ClipOp::SubtractPath(shapes));
        ClipSpec { ops }
    }

    /// The panel shrunk by `small_rect_offset` on the right and bottom edges
    /// only; the left and top edges stay put.
    pub fn shrunk(c: &LayoutConstants) -> ClipSpec {
        let bounds = c.panel_bounds();
        let mut ops = ClipOps::default();
        ops.push(ClipOp::SetRect(bounds));
        ops.push(ClipOp::IntersectRect(Box2D::new(
            bounds.min,
            Point2D::new(
                bounds.max.x - c.small_rect_offset,
                bounds.max.y - c.small_rect_offset,
            ),
        )));
        ClipSpec { ops }
    }

    /// The union of a disc in the top-left corner and a vertical bar through
    /// the panel's horizontal center.
    pub fn combined(c: &LayoutConstants) -> ClipSpec {
        let mut shapes = ClipShapes::default();
        shapes.push(ClipShape::Circle {
            center: Point2D::new(
                c.rect_inset + c.circle_radius,
                c.rect_inset + c.circle_radius,
            ),
            radius: c.circle_radius,
            winding: Winding::Positive,
        });
        shapes.push(ClipShape::Rect {
            rect: Box2D::new(
                Point2D::new(
                    c.panel_width / 2.0 - c.circle_radius,
                    c.rect_inset + c.circle_radius,
                ),
                Point2D::new(
                    c.panel_width / 2.0 + c.circle_radius,
                    c.panel_height - c.rect_inset,
                ),
            ),
            winding: Winding::Positive,
        });
        let mut ops = ClipOps::default();
        ops.push(ClipOp::UnionPath(shapes));
        ClipSpec { ops }
    }

    /// A rounded rectangle over the single-inset panel bounds, with corner
    /// radii of a quarter of the panel width.
    pub fn rounded(c: &LayoutConstants) -> ClipSpec {
        let mut ops = ClipOps::default();
        ops.push(ClipOp::RoundRect {
            rect: c.inset_bounds(1.0),
            radius_x: c.panel_width / 4.0,
            radius_y: c.panel_width / 4.0,
        });
        ClipSpec { ops }
    }

    /// The double-inset interior of the panel, with nothing carved out;
    /// everything the panel normally draws near its edges falls outside this
    /// clip.
    pub fn double_inset(c: &LayoutConstants) -> ClipSpec {
        let mut ops = ClipOps::default();
        ops.push(ClipOp::SetRect(c.inset_bounds(2.0)));
        ClipSpec { ops }
    }
}

impl FromIterator<ClipOp> for ClipSpec {
    fn from_iter<I: IntoIterator<Item = ClipOp>>(iter: I) -> Self {
        ClipSpec {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<ClipOp> for ClipSpec {
    fn extend<I: IntoIterator<Item = ClipOp>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

/// A reusable geometry builder for compound clip paths.
///
/// One `ScratchPath` is shared across every panel of a render pass. Callers
/// must call [`rewind`](ScratchPath::rewind) before staging new geometry;
/// staged shapes otherwise accumulate across panels. Rewinding clears the
/// staged shapes but keeps their allocation.
#[derive(Debug, Default)]
pub struct ScratchPath {
    staged: Vec<Staged>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Staged {
    Circle {
        center: Point2D<f32>,
        radius: f32,
        winding: Winding,
    },
    Rect {
        rect: Box2D<f32>,
        winding: Winding,
    },
    Rounded {
        rect: Box2D<f32>,
        radius: f32,
        winding: Winding,
    },
}

impl ScratchPath {
    /// Clear all staged shapes, keeping the allocation for reuse.
    #[inline]
    pub fn rewind(&mut self) {
        self.staged.clear();
    }

    /// The number of staged shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Whether nothing is staged.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Stage one compound-path shape.
    pub fn stage_shape(&mut self, shape: &ClipShape) {
        match *shape {
            ClipShape::Circle {
                center,
                radius,
                winding,
            } => self.staged.push(Staged::Circle {
                center,
                radius,
                winding,
            }),
            ClipShape::Rect { rect, winding } => self.staged.push(Staged::Rect { rect, winding }),
        }
    }

    /// Stage a rounded rectangle.
    ///
    /// Closed rounded contours only support circular corners, so when the two
    /// radii differ the horizontal radius wins.
    pub fn stage_rounded(&mut self, rect: &Box2D<f32>, radius_x: f32, radius_y: f32) {
        if !approx_eq(radius_x, radius_y) {
            warn!(
                "elliptical corner radii ({}, {}) are unsupported; using {}",
                radius_x, radius_y, radius_x
            );
        }
        self.staged.push(Staged::Rounded {
            rect: *rect,
            radius: radius_x,
            winding: Winding::Positive,
        });
    }

    /// Build a path from the staged shapes.
    pub fn build(&self) -> Path {
        let mut builder = Path::builder();
        for staged in &self.staged {
            match *staged {
                Staged::Circle {
                    center,
                    radius,
                    winding,
                } => builder.add_circle(center, radius, winding),
                Staged::Rect { rect, winding } => builder.add_rectangle(&rect, winding),
                Staged::Rounded {
                    rect,
                    radius,
                    winding,
                } => builder.add_rounded_rectangle(&rect, &BorderRadii::new(radius), winding),
            }
        }
        builder.build()
    }
}
