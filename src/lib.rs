// ./src/lib.rs
//! Diskrete Voronoi-Diagramme über Punkt- und Strecken-Sites, berechnet
//! durch Rastern von Distanzfeldern mit Tiefentest.

pub mod debug;
pub mod math;
pub mod render;
pub mod voronoi;

// Öffentliche API
pub mod prelude {
    pub use super::{
        debug::svg_export::export_sites_svg,
        math::{DistanceMeasure, VoronoiError, VoronoiResult},
        render::MarkerStyle,
        voronoi::{
            Canvas, CoverageBound, Diagram, DiagramOptions, Endpoint, FidelityReport, Precision,
            Site, SiteColor, SiteGeometry, SiteId, SiteKind,
        },
    };
}
