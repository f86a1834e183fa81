//! Track catalog: the immutable, ordered playlist.
//!
//! The catalog is built once at startup by scanning a music directory and
//! is never mutated afterwards. Tracks are identified by their position in
//! the catalog; all navigation is index arithmetic.

mod describe;
mod model;
mod scan;

pub use model::*;
pub use scan::scan;
