//! Image rendering for flood overlays.
//!
//! - Mask to RGBA colouring
//! - RGBA PNG encoding

pub mod error;
pub mod overlay;
pub mod png;

pub use error::{RenderError, RenderResult};
pub use overlay::{render_mask, render_overlay_png, Color, MASK_DRY, MASK_WATER};
pub use png::create_png;
