//! Wire models shared between the extraction pipeline and the HTTP layer.

mod archive;

pub use archive::*;
