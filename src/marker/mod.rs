//! The freehand stroke marker.
//!
//! Everything here is independent of the editor: a [`PenMarker`] is driven
//! through plain method calls and renders through a [`DrawingSurface`],
//! which `World` implements. The editor owns markers in its document and
//! forwards pointer input to them.

pub mod base;
pub mod path;
pub mod pen;
pub mod settings;
pub mod state;
pub mod stroke;
pub mod style;
pub mod surface;
pub mod visual;

#[cfg(test)]
mod tests;

pub use base::{MarkerBase, MarkerStage};
pub use path::{PathMode, flatten_path, generate_path, path_data};
pub use pen::{DrawPhase, PenMarker};
pub use settings::MarkerSettings;
pub use state::{MarkerState, PenMarkerState};
pub use style::{StyleChange, ToolboxPanel};
pub use surface::{DrawingSurface, ElementAttributes, HandleShape, MarkerGroup, PathShape};
