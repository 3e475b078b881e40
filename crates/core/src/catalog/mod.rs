//! Collection policies for the product catalog.
//!
//! Each submodule defines the patch type clients submit for one nested
//! collection, the snapshot of a persisted live child, and the validator
//! that runs the reconcile rules in the collection's declared order.

pub mod color;
pub mod image;
pub mod material;

pub use color::{validate_colors, ColorPatch, ColorState, OptionPatch, OptionState};
pub use image::{validate_images, ImagePatch, ImageState};
pub use material::{validate_materials, MaterialPatch, MaterialState};
