// src/voronoi/reference.rs

use super::sites::{Site, SiteGeometry, SiteId, distance_to_segment};
use crate::math::distance::DistanceMeasure;
use crate::math::error::{VoronoiError, VoronoiResult};
use crate::math::geometry::mesh::DistanceFieldMesh;
use crate::render::raster::Framebuffer;
use bevy::log::debug;
use bevy::math::Vec2;
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation};
use std::collections::BTreeMap;

/// Knoten der Referenz-Triangulation: Position + zugehörige Site.
#[derive(Debug, Clone, Copy)]
struct ReferenceVertex {
    id: SiteId,
    position: Point2<f64>,
}

impl HasPosition for ReferenceVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Exaktes Voronoi-Diagramm zum Abgleich mit dem gerasterten Ergebnis.
///
/// Punkt-Sites liegen in einer Delaunay-Triangulation (schnelle
/// Nächster-Nachbar-Suche), Strecken und nicht-euklidische Maße werden
/// direkt ausgewertet.
pub struct ReferenceDiagram {
    points: DelaunayTriangulation<ReferenceVertex>,
    sites: BTreeMap<SiteId, SiteGeometry>,
    measure: DistanceMeasure,
    /// Abstand, bis zu dem die gerasterten Fächer sicher jede Richtung
    /// abdecken (Inkreis des Kegels).
    reach: f32,
}

/// Ergebnis eines Abgleichs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FidelityReport {
    /// Anzahl geprüfter Pixel.
    pub sampled: usize,
    /// Pixel, die keine Site innerhalb des Inkreises ihres Kegels hat.
    pub uncovered: usize,
    /// Abgedeckte Pixel, deren gerenderte Site um mehr als die Toleranz
    /// weiter entfernt ist als die nächste Site.
    pub mismatched: usize,
    /// Größter beobachteter Distanzüberschuss.
    pub max_excess: f32,
}

impl FidelityReport {
    pub fn covered(&self) -> usize {
        self.sampled - self.uncovered
    }

    pub fn mismatch_ratio(&self) -> f32 {
        match self.covered() {
            0 => 0.0,
            n => self.mismatched as f32 / n as f32,
        }
    }
}

impl ReferenceDiagram {
    /// `radius` ist der Abdeckungsradius der Distanzfelder, `precision` die
    /// Anzahl ihrer Randpunkte.
    pub fn new<'a>(
        sites: impl IntoIterator<Item = &'a Site>,
        measure: DistanceMeasure,
        radius: f32,
        precision: u32,
    ) -> VoronoiResult<Self> {
        let sites: BTreeMap<SiteId, SiteGeometry> = sites
            .into_iter()
            .map(|site| (site.id(), *site.geometry()))
            .collect();

        // Absteigend einfügen: bei gleicher Position bleibt die kleinste ID
        let mut points = DelaunayTriangulation::new();
        for (&id, geometry) in sites.iter().rev() {
            if let SiteGeometry::Point(p) = geometry {
                let vertex = ReferenceVertex {
                    id,
                    position: Point2::new(p.x as f64, p.y as f64),
                };
                points
                    .insert(vertex)
                    .map_err(|err| VoronoiError::Reference {
                        reason: format!("site {id} at {p}: {err:?}"),
                    })?;
            }
        }

        debug!(
            "Reference diagram over {} sites ({} triangulated points).",
            sites.len(),
            points.num_vertices()
        );

        Ok(Self {
            points,
            sites,
            measure,
            reach: radius * DistanceFieldMesh::inscribed_radius(precision),
        })
    }

    /// Distanz von `q` zur Site `id` unter dem Maß des Diagramms.
    /// Strecken werden immer euklidisch gemessen.
    pub fn distance_to(&self, id: SiteId, q: Vec2) -> Option<f32> {
        self.sites
            .get(&id)
            .map(|geometry| self.measured(geometry, q))
    }

    fn measured(&self, geometry: &SiteGeometry, q: Vec2) -> f32 {
        match *geometry {
            SiteGeometry::Point(p) => self.measure.distance(p, q),
            SiteGeometry::Line { a, b } => distance_to_segment(q, a, b),
        }
    }

    fn covers(&self, geometry: &SiteGeometry, q: Vec2) -> bool {
        let euclidean = match *geometry {
            SiteGeometry::Point(p) => p.distance(q),
            SiteGeometry::Line { a, b } => distance_to_segment(q, a, b),
        };
        euclidean <= self.reach
    }

    /// Nächste abdeckende Site zu `q` samt Distanz; `None`, wenn keine Site
    /// `q` innerhalb von `reach` erreicht.
    pub fn nearest(&self, q: Vec2) -> Option<(SiteId, f32)> {
        if self.measure.is_euclidean() {
            let from_points = self
                .points
                .nearest_neighbor(Point2::new(q.x as f64, q.y as f64))
                .map(|vertex| {
                    let data = vertex.data();
                    let p = Vec2::new(data.position.x as f32, data.position.y as f32);
                    (data.id, p.distance(q))
                });
            let from_lines = self.sites.iter().filter_map(|(&id, geometry)| match *geometry {
                SiteGeometry::Line { a, b } => Some((id, distance_to_segment(q, a, b))),
                SiteGeometry::Point(_) => None,
            });
            return from_points
                .into_iter()
                .chain(from_lines)
                .filter(|&(_, d)| d <= self.reach)
                .min_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));
        }

        self.sites
            .iter()
            .filter(|(_, geometry)| self.covers(geometry, q))
            .map(|(&id, geometry)| (id, self.measured(geometry, q)))
            .min_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)))
    }

    /// Prüft jeden `stride`-ten Pixel (Pixelmitte) gegen das exakte Diagramm.
    pub fn compare(&self, frame: &Framebuffer, tolerance: f32, stride: u32) -> FidelityReport {
        let stride = stride.max(1) as usize;
        let mut report = FidelityReport::default();

        for y in (0..frame.height()).step_by(stride) {
            for x in (0..frame.width()).step_by(stride) {
                report.sampled += 1;
                let q = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some((_, best)) = self.nearest(q) else {
                    report.uncovered += 1;
                    continue;
                };

                let rendered = frame
                    .site(x, y)
                    .and_then(|id| self.distance_to(id, q));
                match rendered {
                    Some(distance) => {
                        let excess = (distance - best).max(0.0);
                        report.max_excess = report.max_excess.max(excess);
                        if excess > tolerance {
                            report.mismatched += 1;
                        }
                    }
                    None => report.mismatched += 1,
                }
            }
        }

        debug!(
            "Fidelity: {} sampled, {} uncovered, {} mismatched (max excess {:.3}).",
            report.sampled, report.uncovered, report.mismatched, report.max_excess
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::voronoi::options::CoverageBound;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_nearest_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut diagram = Diagram::new(DiagramOptions::new().with_size(300, 300));
        for _ in 0..40 {
            let x = rng.random_range(0.0..300.0);
            let y = rng.random_range(0.0..300.0);
            diagram.point(x, y, "red");
        }
        let reference =
            ReferenceDiagram::new(diagram.sites(), DistanceMeasure::Euclidean, 300.0, 32).unwrap();

        for _ in 0..200 {
            let q = Vec2::new(rng.random_range(0.0..300.0), rng.random_range(0.0..300.0));
            let (_, d) = reference.nearest(q).unwrap();
            let brute = diagram
                .sites()
                .map(|site| site.anchor().distance(q))
                .fold(f32::INFINITY, f32::min);
            assert_abs_diff_eq!(d, brute, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_duplicate_positions_keep_lowest_id() {
        let mut diagram = Diagram::new(DiagramOptions::new().with_size(100, 100));
        let first = diagram.point(50.0, 50.0, "red");
        diagram.point(50.0, 50.0, "blue");
        let reference =
            ReferenceDiagram::new(diagram.sites(), DistanceMeasure::Euclidean, 100.0, 32).unwrap();
        assert_eq!(reference.nearest(Vec2::new(10.0, 10.0)).unwrap().0, first);
    }

    #[test]
    fn test_rendered_points_match_reference() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(200, 200)
                .with_precision(64)
                .with_markers(false),
        );
        for (x, y) in [(20.0, 20.0), (180.0, 20.0), (20.0, 180.0), (180.0, 180.0)] {
            diagram.point(x, y, "black");
        }
        for _ in 0..12 {
            let x = rng.random_range(0.0..200.0);
            let y = rng.random_range(0.0..200.0);
            diagram.point(x, y, [rng.random::<f32>(), rng.random(), rng.random()]);
        }
        diagram.render();

        let report = diagram.fidelity(1.0, 3).unwrap();
        assert_eq!(report.uncovered, 0);
        assert_eq!(report.mismatched, 0);
        assert!(report.max_excess < 1.0);
    }

    #[test]
    fn test_lines_and_points_match_reference() {
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(200, 200)
                .with_precision(64)
                .with_markers(false),
        );
        diagram.line((20.0, 30.0), (150.0, 60.0), "green");
        diagram.line((40.0, 180.0), (40.0, 120.0), "blue");
        diagram.point(160.0, 160.0, "red");
        diagram.point(100.0, 110.0, "yellow");
        diagram.render();

        let report = diagram.fidelity(1.0, 2).unwrap();
        assert_eq!(report.uncovered, 0);
        assert_eq!(report.mismatched, 0);
    }

    #[test]
    fn test_manhattan_cells_follow_measure() {
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(120, 120)
                .with_precision(64)
                .with_markers(false)
                .with_distance_measure(DistanceMeasure::Manhattan),
        );
        diagram.point(30.0, 30.0, "red");
        diagram.point(90.0, 70.0, "blue");
        diagram.render();

        // Rand des Fächers nur an den Stützstellen exakt
        let report = diagram.fidelity(2.0, 2).unwrap();
        assert!(report.mismatch_ratio() < 0.01);
    }

    #[test]
    fn test_coverage_gap_in_far_corner() {
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(500, 500)
                .with_precision(32)
                .with_markers(false),
        );
        let corner = diagram.point(0.0, 0.0, "red");
        diagram.render();
        assert_eq!(diagram.site_at(499, 490), None);
        assert_eq!(diagram.site_at(300, 300), Some(corner));
        let report = diagram.fidelity(1.0, 10).unwrap();
        assert!(report.uncovered > 0);

        diagram.set_coverage(CoverageBound::Diagonal);
        diagram.render();
        assert_eq!(diagram.site_at(499, 490), Some(corner));
    }

    #[test]
    fn test_gap_between_rim_vertices_counts_as_uncovered() {
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(500, 500)
                .with_precision(16)
                .with_markers(false),
        );
        diagram.point(0.0, 0.0, "red");
        diagram.render();

        // Innerhalb des Radius, aber jenseits der Sehne zwischen zwei Randpunkten
        let q = Vec2::new(486.5, 96.5);
        assert!(q.length() <= 500.0);
        assert_eq!(diagram.site_at(486, 96), None);

        let report = diagram.fidelity(1.0, 1).unwrap();
        assert_eq!(report.mismatched, 0);
        assert!(report.uncovered > 0);
        assert_eq!(report.mismatch_ratio(), 0.0);
    }

    #[test]
    fn test_empty_report() {
        let report = FidelityReport::default();
        assert_eq!(report.mismatch_ratio(), 0.0);
    }
}
