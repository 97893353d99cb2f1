// MIT/Apache2 License

use crate::intensity::Intensity;

/// A four-element color.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color {
    r: Intensity,
    g: Intensity,
    b: Intensity,
    a: Intensity,
}

impl Color {
    pub const WHITE: Color = unsafe { Color::new_unchecked(1.0, 1.0, 1.0, 1.0) };
    pub const BLACK: Color = unsafe { Color::new_unchecked(0.0, 0.0, 0.0, 1.0) };
    pub const GRAY: Color = unsafe { Color::new_unchecked(0.53, 0.53, 0.53, 1.0) };
    pub const DARK_GRAY: Color = unsafe { Color::new_unchecked(0.27, 0.27, 0.27, 1.0) };
    pub const RED: Color = unsafe { Color::new_unchecked(1.0, 0.0, 0.0, 1.0) };
    pub const GREEN: Color = unsafe { Color::new_unchecked(0.0, 1.0, 0.0, 1.0) };
    pub const BLUE: Color = unsafe { Color::new_unchecked(0.0, 0.0, 1.0, 1.0) };

    /// Create a new color.
    ///
    /// # Safety
    ///
    /// Behavior is undefined if any of the elements are NaN or outside of the
    /// range [0, 1].
    #[inline]
    pub const unsafe fn new_unchecked(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: Intensity::new_unchecked(r),
            g: Intensity::new_unchecked(g),
            b: Intensity::new_unchecked(b),
            a: Intensity::new_unchecked(a),
        }
    }

    /// Creates a new color. This function returns `None` if any of the
    /// elements are NaN or out of range.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Option<Self> {
        Some(Self {
            r: Intensity::new(r)?,
            g: Intensity::new(g)?,
            b: Intensity::new(b)?,
            a: Intensity::new(a)?,
        })
    }

    /// Gets the red element.
    #[inline]
    pub fn red(self) -> f32 {
        self.r.into_inner()
    }

    /// Gets the green element.
    #[inline]
    pub fn green(self) -> f32 {
        self.g.into_inner()
    }

    /// Gets the blue element.
    #[inline]
    pub fn blue(self) -> f32 {
        self.b.into_inner()
    }

    /// Gets the alpha element.
    #[inline]
    pub fn alpha(self) -> f32 {
        self.a.into_inner()
    }

    /// Scale to four bytes, in RGBA order.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            self.r.scale_u8(),
            self.g.scale_u8(),
            self.b.scale_u8(),
            self.a.scale_u8(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_scale() {
        assert_eq!(Color::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::BLACK.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(Color::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::BLUE.to_rgba8(), [0, 0, 255, 255]);
    }

    #[test]
    fn rejects_nan_channels() {
        assert!(Color::new(f32::NAN, 0.0, 0.0, 1.0).is_none());
        assert!(Color::new(0.2, 0.4, 0.6, 0.8).is_some());
    }
}
