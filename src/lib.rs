// MIT/Apache2 License

//! Canvas clipping demonstrations over an abstract drawing surface.
//!
//! This crate lays out a two-column grid of example panels, each of which
//! establishes a different clip region (a plain rectangle, a frame, a
//! punched-out disc, an asymmetric shrink, a compound path, a rounded
//! rectangle) before drawing the same content through it, plus a pair of
//! transformed text labels and a quick-reject probe. The drawing itself goes
//! through the [`Surface`] trait, so anything that can translate, clip, and
//! fill can show the panels; a software [`Pixmap`] implementation is
//! included for tests, headless rendering, and anyone without a window to
//! draw in.

mod error;

pub mod clip;
pub mod color;
pub mod intensity;
pub mod layout;
pub mod pixmap;
pub mod region;
pub mod scene;
pub mod surface;

pub(crate) mod util;

pub use clip::*;
pub use color::*;
pub use error::*;
pub use intensity::*;
pub use layout::*;
pub use pixmap::*;
pub use region::*;
pub use scene::*;
pub use surface::*;
