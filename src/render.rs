//! Spread composition and JPEG output.

pub mod compose;
pub mod encode;
pub mod pipeline;

pub use encode::encode_jpeg;
pub use pipeline::{DrawnCard, RenderOpts, SpreadImage, SpreadRenderer, SpreadRequest};
