// ABOUTME: Validated domain types shared by lifecycle operations.
// ABOUTME: Container names and image references are checked before any builder sees them.

mod container_name;
mod image_ref;

pub use container_name::{ContainerName, ContainerNameError};
pub use image_ref::{ImageRef, ParseImageRefError};
