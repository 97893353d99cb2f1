// MIT/Apache2 License

use crate::error::{Error, Result};
use euclid::default::{Box2D, Point2D};

/// The translation origin of one panel, in device space.
pub type GridOrigin = Point2D<f32>;

/// The named scalar lengths that drive panel layout and panel content.
///
/// These are host configuration: loaded once, validated once, and treated as
/// read-only for every render pass afterwards. The defaults reproduce the
/// dimensions of the classic clipping demonstration (90×90 panels on an
/// 8-unit gutter).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutConstants {
    /// Width of one panel.
    pub panel_width: f32,
    /// Height of one panel.
    pub panel_height: f32,
    /// The gutter between panels, and the base unit for interior insets.
    pub rect_inset: f32,
    /// How far the shrunken clip pulls in the right and bottom edges.
    pub small_rect_offset: f32,
    /// Radius of both the clipped-out disc and the green content circle.
    pub circle_radius: f32,
    /// Baseline height of the panel label, from the panel top.
    pub text_offset: f32,
    /// Label text size.
    pub text_size: f32,
    /// Width of stroked lines.
    pub stroke_width: f32,
}

impl Default for LayoutConstants {
    #[inline]
    fn default() -> Self {
        Self {
            panel_width: 90.0,
            panel_height: 90.0,
            rect_inset: 8.0,
            small_rect_offset: 40.0,
            circle_radius: 30.0,
            text_offset: 20.0,
            text_size: 18.0,
            stroke_width: 4.0,
        }
    }
}

impl LayoutConstants {
    /// Check every invariant on the constants.
    ///
    /// All lengths must be finite and strictly positive, and the panel must
    /// be large enough to hold the deepest interior inset twice over, so
    /// that no clip rectangle ever inverts.
    pub fn validate(&self) -> Result {
        let named = [
            ("panel_width", self.panel_width),
            ("panel_height", self.panel_height),
            ("rect_inset", self.rect_inset),
            ("small_rect_offset", self.small_rect_offset),
            ("circle_radius", self.circle_radius),
            ("text_offset", self.text_offset),
            ("text_size", self.text_size),
            ("stroke_width", self.stroke_width),
        ];
        for &(name, value) in named.iter() {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::BadConstant { name, value });
            }
        }

        // the deepest inset used by any clip is 4 * rect_inset per side
        let deepest = 8.0 * self.rect_inset;
        if self.panel_width <= deepest {
            return Err(Error::BadConstant {
                name: "panel_width",
                value: self.panel_width,
            });
        }
        if self.panel_height <= deepest {
            return Err(Error::BadConstant {
                name: "panel_height",
                value: self.panel_height,
            });
        }

        // the shrunken clip must leave the panel center visible
        if self.small_rect_offset >= self.panel_width.min(self.panel_height) / 2.0 {
            return Err(Error::BadConstant {
                name: "small_rect_offset",
                value: self.small_rect_offset,
            });
        }

        Ok(())
    }

    /// The translation origin of the panel in the given grid cell.
    ///
    /// Column `col` starts at `col * (inset + width) + inset` and row `row`
    /// at `row * (inset + height) + inset`, so origins grow monotonically
    /// with their indices and adjacent panels never overlap.
    #[inline]
    #[must_use]
    pub fn origin(&self, col: u32, row: u32) -> GridOrigin {
        Point2D::new(
            col as f32 * (self.rect_inset + self.panel_width) + self.rect_inset,
            row as f32 * (self.rect_inset + self.panel_height) + self.rect_inset,
        )
    }

    /// The panel-local clip bounds, from the panel's top-left corner.
    #[inline]
    #[must_use]
    pub fn panel_bounds(&self) -> Box2D<f32> {
        Box2D::new(
            Point2D::zero(),
            Point2D::new(self.panel_width, self.panel_height),
        )
    }

    /// The panel bounds pulled in by `factor * rect_inset` on every side.
    #[inline]
    #[must_use]
    pub fn inset_bounds(&self, factor: f32) -> Box2D<f32> {
        let inset = factor * self.rect_inset;
        Box2D::new(
            Point2D::new(inset, inset),
            Point2D::new(self.panel_width - inset, self.panel_height - inset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn origins_match_the_grid_formula() {
        let c = LayoutConstants::default();
        assert_relative_eq!(c.origin(0, 0).x, 8.0);
        assert_relative_eq!(c.origin(0, 0).y, 8.0);
        assert_relative_eq!(c.origin(1, 0).x, 106.0);
        assert_relative_eq!(c.origin(0, 2).y, 204.0);
    }

    #[test]
    fn origins_are_monotonic_and_disjoint() {
        let c = LayoutConstants::default();
        for col in 0..4u32 {
            for row in 0..6u32 {
                let here = c.origin(col, row);
                let right = c.origin(col + 1, row);
                let below = c.origin(col, row + 1);
                assert!(right.x > here.x);
                assert!(below.y > here.y);
                // the next panel starts past this panel's far edge
                assert!(right.x >= here.x + c.panel_width);
                assert!(below.y >= here.y + c.panel_height);
            }
        }
    }

    #[test]
    fn default_constants_validate() {
        assert!(LayoutConstants::default().validate().is_ok());
    }

    #[test]
    fn bad_constants_are_rejected() {
        let mut c = LayoutConstants::default();
        c.stroke_width = 0.0;
        assert!(c.validate().is_err());

        let mut c = LayoutConstants::default();
        c.panel_width = -90.0;
        assert!(c.validate().is_err());

        // a panel too small for the deepest inset
        let mut c = LayoutConstants::default();
        c.panel_height = 7.0 * c.rect_inset;
        assert!(c.validate().is_err());

        // an offset that would swallow the panel center
        let mut c = LayoutConstants::default();
        c.small_rect_offset = 60.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn inset_bounds_pull_in_every_side() {
        let c = LayoutConstants::default();
        let b = c.inset_bounds(2.0);
        assert_relative_eq!(b.min.x, 16.0);
        assert_relative_eq!(b.min.y, 16.0);
        assert_relative_eq!(b.max.x, 74.0);
        assert_relative_eq!(b.max.y, 74.0);
    }
}
