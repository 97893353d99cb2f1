// MIT/Apache2 License

use ordered_float::NotNan;

/// A scalar confined to the range from zero to one, used for the channels of a
/// color. This type is essentially a wrapper around an `f32`, but with two
/// invariants:
///
/// * The inner value will always be between `0.0` and `1.0`.
/// * The inner value will never be `NaN`.
///
/// The second invariant is what makes `Intensity` (and therefore
/// [`Color`](crate::Color)) orderable and hashable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Intensity {
    inner: NotNan<f32>,
}

impl Intensity {
    /// Zero intensity.
    pub const ZERO: Intensity = unsafe { Intensity::new_unchecked(0.0) };
    /// Full intensity.
    pub const FULL: Intensity = unsafe { Intensity::new_unchecked(1.0) };

    /// Create a new `Intensity`, without checking the inner value.
    ///
    /// # Safety
    ///
    /// Behavior is undefined if `inner` is not a number, or outside of the
    /// range [0, 1].
    #[inline]
    pub const unsafe fn new_unchecked(inner: f32) -> Self {
        Self {
            inner: NotNan::unchecked_new(inner),
        }
    }

    /// Create a new `Intensity`. If the inner value does not meet the
    /// invariants mentioned above, this function returns `None`.
    #[inline]
    pub fn new(inner: f32) -> Option<Self> {
        if inner.is_nan() || inner < 0.0 || inner > 1.0 {
            None
        } else {
            Some(unsafe { Self::new_unchecked(inner) })
        }
    }

    /// Get the inner value of the `Intensity`.
    #[inline]
    pub fn into_inner(self) -> f32 {
        self.inner.into_inner()
    }

    /// Scale this value onto the full range of a `u8`.
    #[inline]
    pub fn scale_u8(self) -> u8 {
        (self.into_inner() * 255.0 + 0.5) as u8
    }
}

impl From<Intensity> for f32 {
    #[inline]
    fn from(i: Intensity) -> f32 {
        i.into_inner()
    }
}
