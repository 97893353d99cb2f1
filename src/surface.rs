// MIT/Apache2 License

use crate::{
    color::Color,
    error::{Error, NSOpType},
    region::EdgeType,
};
use euclid::default::{Box2D, Point2D};
use lyon_geom::LineSegment;
use lyon_path::{FillRule, Path};

/// Features that are enabled on a [`Surface`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceFeatures {
    /// Text labels can be drawn. Surfaces without this feature keep the
    /// default `draw_text`, which reports `NotSupported`; renderers are
    /// expected to skip labels instead of calling it.
    pub text: bool,
    /// Shape edges are antialiased rather than snapped to pixels. Probes
    /// against such a surface should use [`EdgeType::AntiAliased`].
    pub antialiasing: bool,
}

/// Horizontal alignment of a text label relative to its origin.
///
/// The alignment names the side of the *text* that sits at the origin, not
/// the side of the origin the text goes: right-aligned text extends to the
/// left of its origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Something that can be drawn upon, through a transform and a clip.
///
/// `Surface`s are usually windows, images, or other buffers containing pixels
/// that can be modified through system drawing APIs. The trait provides a
/// common vocabulary over the given system API:
///
/// * A stateful paint: `set_stroke` and `set_line_width` control outlines,
///   `set_fill` controls filled shapes and text, `set_text_size` and
///   `set_text_align` control labels.
/// * A transform/clip stack: `save` snapshots the current transform and clip
///   region, `restore` reinstates the most recent snapshot. `translate` and
///   `skew` compose onto the current transform; the `clip_*` family narrows
///   or carves the current clip region in the transformed space. The stack
///   discipline is strictly nested; use [`with_state`](Surface::with_state)
///   and the pairing can never go wrong.
/// * Draw calls, which only ever touch the current clip region. Drawing at
///   coordinates outside the clip is not an error; those parts simply do
///   not appear.
/// * A [quick-reject](Surface::quick_reject) probe: a fast, conservative
///   "is this certainly invisible" test against the current clip, useful for
///   skipping whole objects without writing intersection logic by hand.
///
/// Hosts whose clip API distinguishes legacy difference/intersect operations
/// from modern `clipOut`-style calls should resolve that choice once when the
/// adapter is constructed; both expressions must narrow the region
/// identically, and the adapter, not the renderer, owns that equivalence.
pub trait Surface {
    /// Get an enumeration of the features that this `Surface` is capable of.
    fn features(&self) -> SurfaceFeatures;

    /// Set the solid color used to draw outlines.
    fn set_stroke(&mut self, color: Color) -> crate::Result;
    /// Set the solid color used to fill shapes and text.
    fn set_fill(&mut self, color: Color) -> crate::Result;
    /// Set the width of the lines that outlines are drawn in.
    fn set_line_width(&mut self, width: f32) -> crate::Result;

    /// Set the text size used for labels.
    #[inline]
    fn set_text_size(&mut self, size: f32) -> crate::Result {
        let _ = size;
        Ok(())
    }
    /// Set the alignment used for labels.
    #[inline]
    fn set_text_align(&mut self, align: TextAlign) -> crate::Result {
        let _ = align;
        Ok(())
    }

    /// Flood the current clip region with a color.
    fn draw_color(&mut self, color: Color) -> crate::Result;

    /// Snapshot the current transform and clip onto the state stack.
    fn save(&mut self) -> crate::Result;
    /// Reinstate the most recent snapshot.
    ///
    /// Restoring with an empty stack is a caller bug and reports
    /// [`Error::UnbalancedRestore`].
    fn restore(&mut self) -> crate::Result;

    /// Compose a translation onto the current transform.
    fn translate(&mut self, tx: f32, ty: f32) -> crate::Result;
    /// Compose a shear onto the current transform: x gains `sx` per unit of
    /// y, and y gains `sy` per unit of x.
    fn skew(&mut self, sx: f32, sy: f32) -> crate::Result;

    /// Narrow the clip region to its overlap with a rectangle.
    fn clip_rect(&mut self, rect: &Box2D<f32>) -> crate::Result;
    /// Carve a rectangle out of the clip region.
    fn clip_out_rect(&mut self, rect: &Box2D<f32>) -> crate::Result;
    /// Narrow the clip region to its overlap with a closed path.
    fn clip_path(&mut self, path: &Path, rule: FillRule) -> crate::Result;
    /// Carve a closed path out of the clip region.
    fn clip_out_path(&mut self, path: &Path, rule: FillRule) -> crate::Result;

    /// Draw a single line with the stroke color.
    fn draw_line(&mut self, line: LineSegment<f32>) -> crate::Result;

    /// Fill in a rectangle with the fill color.
    fn fill_rectangle(&mut self, rect: &Box2D<f32>) -> crate::Result;

    /// Draw the outline of a rectangle.
    #[inline]
    fn draw_rectangle(&mut self, rect: &Box2D<f32>) -> crate::Result {
        let (min, max) = (rect.min, rect.max);
        let tr = Point2D::new(max.x, min.y);
        let bl = Point2D::new(min.x, max.y);
        self.draw_line(LineSegment { from: min, to: tr })?;
        self.draw_line(LineSegment { from: tr, to: max })?;
        self.draw_line(LineSegment { from: max, to: bl })?;
        self.draw_line(LineSegment { from: bl, to: min })
    }

    /// Fill in a circle with the fill color.
    fn fill_circle(&mut self, center: Point2D<f32>, radius: f32) -> crate::Result;

    /// Draw a text label with the fill color, with its baseline at `origin`
    /// and its horizontal position governed by the current alignment.
    #[inline]
    fn draw_text(&mut self, text: &str, origin: Point2D<f32>) -> crate::Result {
        let _ = (text, origin);
        Err(Error::NotSupported(NSOpType::Text))
    }

    /// Whether a rectangle, taken through the current transform, is certainly
    /// outside the current clip region.
    ///
    /// `true` means the rectangle cannot produce any visible pixels. `false`
    /// is not a promise of visibility; partial overlaps still need the
    /// caller's own checking.
    fn quick_reject(&self, rect: &Box2D<f32>, edge: EdgeType) -> crate::Result<bool>;

    /// Run `f` between a save/restore pair.
    ///
    /// The restore happens whether or not `f` succeeds, so callers that only
    /// scope their state through this method can never unbalance the stack.
    #[inline]
    fn with_state<F, R>(&mut self, f: F) -> crate::Result<R>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> crate::Result<R>,
    {
        self.save()?;
        let result = f(self);
        let restored = self.restore();
        let value = result?;
        restored?;
        Ok(value)
    }
}

impl<'a, S: Surface + ?Sized> Surface for &'a mut S {
    #[inline]
    fn features(&self) -> SurfaceFeatures {
        (**self).features()
    }
    #[inline]
    fn set_stroke(&mut self, color: Color) -> crate::Result {
        (**self).set_stroke(color)
    }
    #[inline]
    fn set_fill(&mut self, color: Color) -> crate::Result {
        (**self).set_fill(color)
    }
    #[inline]
    fn set_line_width(&mut self, width: f32) -> crate::Result {
        (**self).set_line_width(width)
    }
    #[inline]
    fn set_text_size(&mut self, size: f32) -> crate::Result {
        (**self).set_text_size(size)
    }
    #[inline]
    fn set_text_align(&mut self, align: TextAlign) -> crate::Result {
        (**self).set_text_align(align)
    }
    #[inline]
    fn draw_color(&mut self, color: Color) -> crate::Result {
        (**self).draw_color(color)
    }
    #[inline]
    fn save(&mut self) -> crate::Result {
        (**self).save()
    }
    #[inline]
    fn restore(&mut self) -> crate::Result {
        (**self).restore()
    }
    #[inline]
    fn translate(&mut self, tx: f32, ty: f32) -> crate::Result {
        (**self).translate(tx, ty)
    }
    #[inline]
    fn skew(&mut self, sx: f32, sy: f32) -> crate::Result {
        (**self).skew(sx, sy)
    }
    #[inline]
    fn clip_rect(&mut self, rect: &Box2D<f32>) -> crate::Result {
        (**self).clip_rect(rect)
    }
    #[inline]
    fn clip_out_rect(&mut self, rect: &Box2D<f32>) -> crate::Result {
        (**self).clip_out_rect(rect)
    }
    #[inline]
    fn clip_path(&mut self, path: &Path, rule: FillRule) -> crate::Result {
        (**self).clip_path(path, rule)
    }
    #[inline]
    fn clip_out_path(&mut self, path: &Path, rule: FillRule) -> crate::Result {
        (**self).clip_out_path(path, rule)
    }
    #[inline]
    fn draw_line(&mut self, line: LineSegment<f32>) -> crate::Result {
        (**self).draw_line(line)
    }
    #[inline]
    fn fill_rectangle(&mut self, rect: &Box2D<f32>) -> crate::Result {
        (**self).fill_rectangle(rect)
    }
    #[inline]
    fn draw_rectangle(&mut self, rect: &Box2D<f32>) -> crate::Result {
        (**self).draw_rectangle(rect)
    }
    #[inline]
    fn fill_circle(&mut self, center: Point2D<f32>, radius: f32) -> crate::Result {
        (**self).fill_circle(center, radius)
    }
    #[inline]
    fn draw_text(&mut self, text: &str, origin: Point2D<f32>) -> crate::Result {
        (**self).draw_text(text, origin)
    }
    #[inline]
    fn quick_reject(&self, rect: &Box2D<f32>, edge: EdgeType) -> crate::Result<bool> {
        (**self).quick_reject(rect, edge)
    }
}
