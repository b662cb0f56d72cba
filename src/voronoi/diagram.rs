// src/voronoi/diagram.rs

use super::factory::DistanceFieldFactory;
use super::handles::{LineHandle, PointHandle};
use super::options::{Canvas, CoverageBound, DiagramOptions, Precision, SiteColor};
use super::reference::{FidelityReport, ReferenceDiagram};
use super::registry::SiteRegistry;
use super::sites::{Site, SiteGeometry, SiteId, SiteKind};
use super::node::SiteNode;
use crate::math::distance::DistanceMeasure;
use crate::math::error::VoronoiResult;
use crate::render::compositor::Compositor;
use crate::render::markers::MarkerLayer;
use crate::render::raster::Framebuffer;
use bevy::log::{debug, info};
use bevy::math::Vec2;

/// Diskretes Voronoi-Diagramm über Punkt- und Strecken-Sites.
///
/// Jede Site wird als 3D-Distanzfeld (Kegel bzw. Dach mit Kappen) in die
/// Szene gelegt; der Tiefentest des Rasterizers entscheidet pro Pixel, welche
/// Site am nächsten ist.
///
/// ```
/// use dm_voronoi::prelude::*;
///
/// let mut diagram = Diagram::new(DiagramOptions::new().with_precision(32));
/// let red = diagram.point(100.0, 100.0, "red");
/// diagram.point(400.0, 400.0, "blue");
/// diagram.render();
/// assert_eq!(diagram.site_at(50, 50), Some(red));
/// ```
#[derive(Debug)]
pub struct Diagram {
    pub(super) canvas: Canvas,
    pub(super) precision: Precision,
    pub(super) measure: DistanceMeasure,
    pub(super) coverage: CoverageBound,
    pub(super) registry: SiteRegistry,
    pub(super) factory: DistanceFieldFactory,
    pub(super) compositor: Compositor,
    pub(super) markers: MarkerLayer,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramOptions::default())
    }
}

impl Diagram {
    pub fn new(options: DiagramOptions) -> Self {
        let options = options.sanitized();
        let canvas = options.resolve_canvas();
        let precision = Precision::clamped(options.precision);
        let measure = options.distance_measure;
        let max_distance = options.coverage.radius(canvas);

        // Templates der aktuellen Präzision gleich anlegen
        let mut factory = DistanceFieldFactory::new();
        factory.template(SiteKind::Point, precision, &measure);
        factory.template(SiteKind::Line, precision, &measure);
        let depth_range = max_distance * factory.max_depth();

        info!(
            "Created {}x{} diagram (precision {}, {:?} distance).",
            canvas.width,
            canvas.height,
            precision.get(),
            measure
        );

        Self {
            canvas,
            precision,
            measure,
            coverage: options.coverage,
            registry: SiteRegistry::new(max_distance),
            factory,
            compositor: Compositor::new(canvas.width, canvas.height, depth_range),
            markers: MarkerLayer::new(options.markers),
        }
    }

    /// Legt eine Punkt-Site an.
    pub fn point(&mut self, x: f32, y: f32, color: impl Into<SiteColor>) -> SiteId {
        self.add(color.into(), SiteGeometry::Point(Vec2::new(x, y)))
    }

    /// Legt eine Strecken-Site von `a` nach `b` an.
    pub fn line(
        &mut self,
        a: impl Into<Vec2>,
        b: impl Into<Vec2>,
        color: impl Into<SiteColor>,
    ) -> SiteId {
        self.add(
            color.into(),
            SiteGeometry::Line {
                a: a.into(),
                b: b.into(),
            },
        )
    }

    fn add(&mut self, color: SiteColor, geometry: SiteGeometry) -> SiteId {
        let color = color.to_color();
        let kind = match geometry {
            SiteGeometry::Point(_) => SiteKind::Point,
            SiteGeometry::Line { .. } => SiteKind::Line,
        };
        let template = self.factory.template(kind, self.precision, &self.measure);
        let material = self.compositor.material(color);
        let radius = self.registry.max_distance();

        let site = self.registry.insert(color, geometry);
        let id = site.id();
        let node = SiteNode::new(site.geometry(), &template, radius, material);
        self.markers.add(site);
        self.compositor.add(id, node);

        debug!("Added {:?} site {}.", kind, id);
        id
    }

    /// Entfernt eine Site. `false`, wenn die ID nicht (mehr) lebt.
    pub fn remove(&mut self, id: impl Into<SiteId>) -> bool {
        let id = id.into();
        if !self.registry.contains(id) {
            return false;
        }
        self.markers.remove(id);
        self.compositor.remove(id);
        self.registry.remove(id);
        debug!("Removed site {}.", id);
        true
    }

    /// Rastert die Szene. Sichtbare Marker werden vorher aktualisiert.
    pub fn render(&mut self) {
        if self.markers.visible() {
            self.markers.update(self.registry.iter());
        }
        self.compositor.render(&self.markers);
    }

    /// Zugriff auf eine Punkt-Site; `None` für unbekannte IDs oder Strecken.
    pub fn point_mut(&mut self, id: impl Into<SiteId>) -> Option<PointHandle<'_>> {
        let id = id.into();
        let site = self.registry.get_mut(id)?;
        if site.kind() != SiteKind::Point {
            return None;
        }
        let node = self.compositor.node_mut(id)?;
        Some(PointHandle::new(site, node))
    }

    /// Zugriff auf eine Strecken-Site; `None` für unbekannte IDs oder Punkte.
    pub fn line_mut(&mut self, id: impl Into<SiteId>) -> Option<LineHandle<'_>> {
        let id = id.into();
        let site = self.registry.get_mut(id)?;
        if site.kind() != SiteKind::Line {
            return None;
        }
        let node = self.compositor.node_mut(id)?;
        Some(LineHandle::new(site, node))
    }

    /// Ändert die Farbe einer lebenden Site.
    pub fn set_color(&mut self, id: impl Into<SiteId>, color: impl Into<SiteColor>) -> bool {
        let id = id.into();
        let color = color.into().to_color();
        let Some(site) = self.registry.get_mut(id) else {
            return false;
        };
        site.set_color(color);
        let material = self.compositor.material(color);
        if let Some(node) = self.compositor.node_mut(id) {
            node.set_material(material);
        }
        true
    }

    /// Repositioniert die Marker sofort (unabhängig von der Sichtbarkeit).
    pub fn update_markers(&mut self) {
        self.markers.update(self.registry.iter());
    }

    pub fn site(&self, id: impl Into<SiteId>) -> Option<&Site> {
        self.registry.get(id.into())
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> + '_ {
        self.registry.iter()
    }

    pub fn node(&self, id: impl Into<SiteId>) -> Option<&SiteNode> {
        self.compositor.node(id.into())
    }

    /// Site, die Pixel `(x, y)` beim letzten `render()` gewonnen hat.
    pub fn site_at(&self, x: u32, y: u32) -> Option<SiteId> {
        self.compositor.frame().site(x, y)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.compositor.frame().pixel(x, y)
    }

    pub fn frame(&self) -> &Framebuffer {
        self.compositor.frame()
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Der Host ändert hierüber die Größe und ruft danach [`Self::resize`].
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn precision(&self) -> u32 {
        self.precision.get()
    }

    pub fn n_sites(&self) -> usize {
        self.registry.len()
    }

    pub fn max_distance(&self) -> f32 {
        self.registry.max_distance()
    }

    pub fn coverage(&self) -> CoverageBound {
        self.coverage
    }

    pub fn distance_measure(&self) -> &DistanceMeasure {
        &self.measure
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerLayer {
        &mut self.markers
    }

    pub fn factory(&self) -> &DistanceFieldFactory {
        &self.factory
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Vergleicht das zuletzt gerenderte Bild mit dem exakten Diagramm.
    /// Nur jeder `stride`-te Pixel pro Achse wird geprüft.
    pub fn fidelity(&self, tolerance: f32, stride: u32) -> VoronoiResult<FidelityReport> {
        let reference = ReferenceDiagram::new(
            self.registry.iter(),
            self.measure.clone(),
            self.registry.max_distance(),
            self.precision(),
        )?;
        Ok(reference.compare(self.compositor.frame(), tolerance, stride))
    }
}
