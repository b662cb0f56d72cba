pub mod distance;
pub mod error;
pub mod geometry;
pub mod utils;

// Re-exports für einfache Verwendung
pub use distance::{DistanceMeasure, MeasureKey};
pub use error::{VoronoiError, VoronoiResult};
pub use geometry::DistanceFieldMesh;
