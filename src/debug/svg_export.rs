// src/debug/svg_export.rs
use crate::math::error::{VoronoiError, VoronoiResult};
use crate::math::utils::color::rgb8;
use crate::voronoi::{Diagram, Site, SiteGeometry};
use ::svg::{Document, Node};
use ::svg::node::element::{Circle, Line, Polygon, Rectangle};
use bevy::log::info;
use bevy::math::{Vec2, Vec3};
use bevy::render::color::Color;
use bevy::transform::components::Transform;
use std::path::Path;

// ===================================================================================
// HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Baut ein SVG in Canvas-Koordinaten. Die y-Achse wird gespiegelt, da SVG
/// nach unten zählt.
struct SvgBuilder {
    document: Document,
    height: f32,
    stroke_width: f32,
    point_radius: f32,
}

impl SvgBuilder {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let stroke_width = (w + h) / 2.0 * 0.004;
        let point_radius = (w + h) / 2.0 * 0.006;

        let document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "#f0f0f0"),
            );

        Self {
            document,
            height: h,
            stroke_width,
            point_radius,
        }
    }

    fn flip(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.height - p.y)
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: &str) {
        let c = self.flip(center);
        let circle = Circle::new()
            .set("cx", c.x)
            .set("cy", c.y)
            .set("r", radius)
            .set("fill", fill)
            .set("stroke", "#000000")
            .set("stroke-width", self.stroke_width * 0.5);
        self.document.append(circle);
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, stroke: &str) {
        let (a, b) = (self.flip(a), self.flip(b));
        let line = Line::new()
            .set("x1", a.x)
            .set("y1", a.y)
            .set("x2", b.x)
            .set("y2", b.y)
            .set("stroke", stroke)
            .set("stroke-width", self.stroke_width)
            .set("stroke-linecap", "round");
        self.document.append(line);
    }

    fn draw_site(&mut self, site: &Site) {
        let fill = hex(site.color());
        match *site.geometry() {
            SiteGeometry::Point(p) => self.draw_circle(p, self.point_radius, &fill),
            SiteGeometry::Line { a, b } => {
                self.draw_line(a, b, &fill);
                self.draw_circle(a, self.point_radius * 0.6, &fill);
                self.draw_circle(b, self.point_radius * 0.6, &fill);
            }
        }
    }

    /// Marker als gedrehtes Rechteck aus dem Einheitsquadrat.
    fn draw_marker(&mut self, marker: &Transform, fill: &str) {
        let matrix = marker.compute_matrix();
        let points = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]
            .into_iter()
            .map(|(x, y)| {
                let p = self.flip(matrix.transform_point3(Vec3::new(x, y, 0.0)).truncate());
                format!("{:.3},{:.3}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.document
            .append(Polygon::new().set("points", points).set("fill", fill));
    }

    fn finish(self) -> Document {
        self.document
    }
}

fn hex(color: Color) -> String {
    let [r, g, b] = rgb8(color);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// SVG mit allen Sites des Diagramms (Punkte als Kreise, Strecken als Linien)
/// in aufsteigender ID-Reihenfolge, darüber die Marker, falls sichtbar.
pub fn sites_document(diagram: &Diagram) -> Document {
    let canvas = diagram.canvas();
    let mut svg = SvgBuilder::new(canvas.width, canvas.height);

    let mut sites: Vec<&Site> = diagram.sites().collect();
    sites.sort_by_key(|site| site.id());
    for site in sites {
        svg.draw_site(site);
    }

    let markers = diagram.markers();
    if markers.visible() {
        let fill = hex(markers.style().color);
        for (_, marker) in markers.iter() {
            svg.draw_marker(marker, &fill);
        }
    }
    svg.finish()
}

/// Schreibt [`sites_document`] nach `path`.
pub fn export_sites_svg(path: impl AsRef<Path>, diagram: &Diagram) -> VoronoiResult<()> {
    let path = path.as_ref();
    ::svg::save(path, &sites_document(diagram)).map_err(|source| VoronoiError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Debug SVG '{}' was written.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_document_contains_every_site() {
        let mut diagram = Diagram::new(
            DiagramOptions::new()
                .with_size(100, 80)
                .with_markers(false),
        );
        diagram.point(10.0, 20.0, "red");
        diagram.line((0.0, 0.0), (50.0, 50.0), "#00ff00");
        let text = sites_document(&diagram).to_string();

        assert!(text.contains("viewBox=\"0 0 100 80\""));
        assert!(text.contains("#ff0000"));
        assert!(text.contains("#00ff00"));
        // y gespiegelt: 80 - 20
        assert!(text.contains("cy=\"60\""));
        assert_eq!(text.matches("<line").count(), 1);
        assert_eq!(text.matches("<circle").count(), 3);
        assert_eq!(text.matches("<polygon").count(), 0);
    }

    #[test]
    fn test_visible_markers_are_drawn() {
        let mut diagram = Diagram::new(DiagramOptions::new().with_size(100, 100));
        diagram.point(50.0, 50.0, "red");
        diagram.line((10.0, 10.0), (10.0, 90.0), "blue");
        diagram.render();
        let text = sites_document(&diagram).to_string();
        assert_eq!(text.matches("<polygon").count(), 2);
        // Punkt-Marker: 5x5 um (50, 50)
        assert!(text.contains("47.500,52.500 52.500,52.500"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let diagram = Diagram::new(DiagramOptions::new().with_size(10, 10));
        let path = std::env::temp_dir()
            .join("dm_voronoi_missing_dir")
            .join("nested")
            .join("sites.svg");
        let err = export_sites_svg(&path, &diagram).unwrap_err();
        assert!(matches!(err, VoronoiError::Export { .. }));
    }

    #[test]
    fn test_export_writes_file() {
        let mut diagram = Diagram::new(DiagramOptions::new().with_size(10, 10));
        diagram.point(5.0, 5.0, "blue");
        let path = std::env::temp_dir().join("dm_voronoi_sites_test.svg");
        export_sites_svg(&path, &diagram).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("#0000ff"));
        let _ = std::fs::remove_file(&path);
    }
}
