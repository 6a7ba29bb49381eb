//! Conversion Pipeline
//!
//! ```text
//! ContainerRecord ──runlike──▸ docker run … ──composerize──▸ manifest
//! ```
//!
//! Each stage finishes completely before the next one starts.

mod manifest;
mod tools;

pub use manifest::{compose_manifest, derive_run_command, render_manifest, PROJECT_NAME_PLACEHOLDER};
pub use tools::{ConversionTools, ExternalTools, ToolError};
