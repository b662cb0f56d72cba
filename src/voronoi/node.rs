// src/voronoi/node.rs

use super::factory::DistanceFieldTemplate;
use super::sites::{SiteGeometry, line_direction};
use crate::math::geometry::DistanceFieldMesh;
use crate::math::utils::{angles::rotation_from_y, constants::PI};
use crate::render::material::ColorMaterial;
use bevy::math::{Mat4, Quat, Vec3};
use bevy::transform::components::Transform;
use std::sync::Arc;

/// Ein Teilnetz eines Knotens: geteiltes Netz + lokale Transformation.
#[derive(Debug, Clone)]
pub struct NodePart {
    pub mesh: Arc<DistanceFieldMesh>,
    pub local: Transform,
}

/// Render-Instanz einer Site: geteiltes Template, eigene Transformation und
/// Material. Genau ein Knoten pro lebender Site.
#[derive(Debug, Clone)]
pub struct SiteNode {
    origin: Transform,
    parts: Vec<NodePart>,
    material: Arc<ColorMaterial>,
    radius: f32,
}

impl SiteNode {
    /// Baut den Knoten für `geometry`. Das Template muss zur Geometrie passen.
    pub fn new(
        geometry: &SiteGeometry,
        template: &DistanceFieldTemplate,
        radius: f32,
        material: Arc<ColorMaterial>,
    ) -> Self {
        let mut node = Self {
            origin: Transform::IDENTITY,
            parts: Self::parts_for(template),
            material,
            radius,
        };
        node.sync(geometry);
        node
    }

    fn parts_for(template: &DistanceFieldTemplate) -> Vec<NodePart> {
        match template {
            DistanceFieldTemplate::Point { cone } => vec![NodePart {
                mesh: cone.clone(),
                local: Transform::IDENTITY,
            }],
            // Reihenfolge: Kappe A, Kappe B, Dach
            DistanceFieldTemplate::Line { ridge, cap } => vec![
                NodePart {
                    mesh: cap.clone(),
                    local: Transform::from_rotation(Quat::from_rotation_z(PI)),
                },
                NodePart {
                    mesh: cap.clone(),
                    local: Transform::IDENTITY,
                },
                NodePart {
                    mesh: ridge.clone(),
                    local: Transform::IDENTITY,
                },
            ],
        }
    }

    /// Tauscht die Netze gegen ein neues Template (z.B. nach Präzisionswechsel).
    pub fn retemplate(&mut self, geometry: &SiteGeometry, template: &DistanceFieldTemplate) {
        self.parts = Self::parts_for(template);
        self.sync(geometry);
    }

    /// Berechnet alle Transformationen aus der aktuellen Geometrie neu und
    /// liefert die neue Ursprungs-Transformation.
    pub fn sync(&mut self, geometry: &SiteGeometry) -> Transform {
        let r = self.radius;
        match *geometry {
            SiteGeometry::Point(position) => {
                self.origin = Transform::from_translation(position.extend(0.0));
                if let Some(cone) = self.parts.first_mut() {
                    cone.local.scale = Vec3::splat(r);
                }
            }
            SiteGeometry::Line { a, b } => {
                let length = a.distance(b);
                let direction = line_direction(a, b);
                // Lokale +y-Achse zeigt von a nach b
                self.origin = Transform::from_translation(a.extend(0.0))
                    .with_rotation(rotation_from_y(direction));

                if let [cap_a, cap_b, ridge] = &mut self.parts[..] {
                    cap_a.local.scale = Vec3::splat(r);
                    cap_b.local.scale = Vec3::splat(r);
                    cap_b.local.translation = Vec3::new(0.0, length, 0.0);
                    ridge.local.scale = Vec3::new(r, length, r);
                    ridge.local.translation = Vec3::new(0.0, length / 2.0, 0.0);
                }
            }
        }
        self.origin
    }

    /// Setzt den Abdeckungsradius (Skalierung der Distanzfelder).
    pub fn set_radius(&mut self, radius: f32, geometry: &SiteGeometry) {
        self.radius = radius;
        self.sync(geometry);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn origin(&self) -> Transform {
        self.origin
    }

    pub fn parts(&self) -> &[NodePart] {
        &self.parts
    }

    pub fn material(&self) -> &Arc<ColorMaterial> {
        &self.material
    }

    pub fn set_material(&mut self, material: Arc<ColorMaterial>) {
        self.material = material;
    }

    /// Weltmatrizen aller Teilnetze.
    pub fn world_parts(&self) -> impl Iterator<Item = (&DistanceFieldMesh, Mat4)> + '_ {
        let origin = self.origin.compute_matrix();
        self.parts
            .iter()
            .map(move |part| (part.mesh.as_ref(), origin * part.local.compute_matrix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::distance::DistanceMeasure;
    use crate::voronoi::factory::DistanceFieldFactory;
    use crate::voronoi::options::Precision;
    use crate::voronoi::sites::SiteKind;
    use approx::assert_abs_diff_eq;
    use bevy::math::Vec2;
    use bevy::render::color::Color;

    fn template(kind: SiteKind) -> DistanceFieldTemplate {
        DistanceFieldFactory::new().template(kind, Precision::default(), &DistanceMeasure::Euclidean)
    }

    fn material() -> Arc<ColorMaterial> {
        Arc::new(ColorMaterial::new(Color::RED))
    }

    #[test]
    fn test_point_node_places_apex_on_site() {
        let geometry = SiteGeometry::Point(Vec2::new(100.0, 50.0));
        let node = SiteNode::new(&geometry, &template(SiteKind::Point), 500.0, material());
        let (mesh, world) = node.world_parts().next().unwrap();
        let apex = world.transform_point3(mesh.vertices[0]);
        assert_abs_diff_eq!(apex.x, 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(apex.y, 50.0, epsilon = 1e-3);
        let rim = world.transform_point3(mesh.vertices[1]);
        assert_abs_diff_eq!(rim.x, 600.0, epsilon = 1e-2);
        assert_abs_diff_eq!(rim.z, -500.0, epsilon = 1e-2);
    }

    #[test]
    fn test_line_node_spans_segment() {
        let geometry = SiteGeometry::Line {
            a: Vec2::new(0.0, 250.0),
            b: Vec2::new(500.0, 250.0),
        };
        let node = SiteNode::new(&geometry, &template(SiteKind::Line), 500.0, material());
        let parts: Vec<_> = node.world_parts().collect();
        assert_eq!(parts.len(), 3);

        // Firstkante des Dachs liegt genau auf der Strecke
        let (ridge, world) = parts[2];
        let bottom = world.transform_point3(ridge.vertices[0]);
        let top = world.transform_point3(ridge.vertices[1]);
        assert_abs_diff_eq!(bottom.x, 0.0, epsilon = 1e-2);
        assert_abs_diff_eq!(top.x, 500.0, epsilon = 1e-2);
        assert_abs_diff_eq!(top.y, 250.0, epsilon = 1e-2);

        // Kappe B sitzt auf b, Kappe A auf a und zeigt von der Strecke weg
        let (cap, world_b) = parts[1];
        let apex_b = world_b.transform_point3(cap.vertices[0]);
        assert_abs_diff_eq!(apex_b.x, 500.0, epsilon = 1e-2);
        let (_, world_a) = parts[0];
        let middle_rim = cap.vertices[cap.vertices.len() / 2];
        assert!(world_a.transform_point3(middle_rim).x < 0.0);
        assert!(world_b.transform_point3(middle_rim).x > 500.0);
    }

    #[test]
    fn test_resync_follows_endpoint_changes() {
        let mut geometry = SiteGeometry::Line {
            a: Vec2::ZERO,
            b: Vec2::new(0.0, 10.0),
        };
        let mut node = SiteNode::new(&geometry, &template(SiteKind::Line), 100.0, material());
        geometry = SiteGeometry::Line {
            a: Vec2::new(5.0, 5.0),
            b: Vec2::new(5.0, -15.0),
        };
        let origin = node.sync(&geometry);
        assert_eq!(origin.translation, Vec3::new(5.0, 5.0, 0.0));
        let down = origin.rotation * Vec3::Y;
        assert_abs_diff_eq!(down.y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(node.parts()[2].local.scale.y, 20.0, epsilon = 1e-5);
    }

    #[test]
    fn test_radius_rescales_every_part() {
        let geometry = SiteGeometry::Line {
            a: Vec2::ZERO,
            b: Vec2::new(30.0, 40.0),
        };
        let mut node = SiteNode::new(&geometry, &template(SiteKind::Line), 100.0, material());
        node.set_radius(250.0, &geometry);
        assert_eq!(node.radius(), 250.0);
        for part in node.parts() {
            assert_abs_diff_eq!(part.local.scale.x, 250.0);
            assert_abs_diff_eq!(part.local.scale.z, 250.0);
        }
    }
}
