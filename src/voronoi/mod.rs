pub mod controller;
pub mod diagram;
pub mod factory;
pub mod handles;
pub mod node;
pub mod options;
pub mod reference;
pub mod registry;
pub mod sites;

// Re-exports für einfache Verwendung
pub use diagram::Diagram;
pub use factory::{DistanceFieldFactory, DistanceFieldTemplate, TemplateKey};
pub use handles::{EndpointHandle, LineHandle, PointHandle};
pub use node::{NodePart, SiteNode};
pub use options::{Canvas, CoverageBound, DiagramOptions, Precision, SiteColor};
pub use reference::{FidelityReport, ReferenceDiagram};
pub use registry::SiteRegistry;
pub use sites::{Endpoint, Site, SiteGeometry, SiteId, SiteKind};
