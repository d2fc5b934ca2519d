//! Centralized constants used across the application.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1400.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Canvas size used for a new document when the config has none
pub const DEFAULT_CANVAS_WIDTH: f32 = 1024.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 768.0;

/// Smallest canvas edge accepted by the resize dialog
pub const MIN_CANVAS_EDGE: f32 = 16.0;

/// Stroke width for markers created with default settings.
/// Must be one of the default width options.
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;

/// Radius of point edit handles, in canvas units
pub const DEFAULT_HANDLE_RADIUS: f32 = 5.0;

/// Extra width of the invisible hit-test path over the visible stroke
pub const DEFAULT_HIT_PADDING: f32 = 8.0;

/// Flattening tolerance when turning curves into gizmo line segments
pub const FLATTEN_TOLERANCE: f64 = 0.25;

/// Current document file format version
pub const DOCUMENT_VERSION: u32 = 1;

/// Maximum number of recent documents to remember in config
pub const MAX_RECENT_DOCUMENTS: usize = 5;
