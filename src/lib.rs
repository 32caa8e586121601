//! Ninepatcher generates 9-patch PNG assets (rounded rectangles with
//! stretch guides) from a declarative configuration.
//!
//! The interesting part is the raster core: a sparse [`Canvas`] with
//! color-stack alpha blending, the Wu-style circle rasterizer in
//! [`raster`], and the per-image assembly in [`render`]. Config loading
//! and PNG encoding are thin glue around it.
#![forbid(unsafe_code)]

pub mod canvas;
pub mod color;
pub mod encode_png;
pub mod error;
pub mod model;
pub mod raster;
pub mod render;

pub use canvas::{Canvas, FrameRgba};
pub use color::{Color, ColorValue};
pub use encode_png::write_png;
pub use error::{NinePatchError, NinePatchResult};
pub use model::{GeneratorConfig, ImageConfig, load_config_file, strip_jsonc_comments};
pub use render::{GenerateSummary, generate, render_patch};
