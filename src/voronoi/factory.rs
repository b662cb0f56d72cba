// src/voronoi/factory.rs

use super::options::Precision;
use super::sites::SiteKind;
use crate::math::distance::{DistanceMeasure, MeasureKey};
use crate::math::geometry::DistanceFieldMesh;
use bevy::log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache-Schlüssel eines einzelnen Distanzfeld-Netzes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// Kegel bzw. gemessener Fächer einer Punkt-Site.
    Cone {
        precision: u32,
        measure: MeasureKey,
    },
    /// Zeltdach entlang einer Strecke, unabhängig von der Präzision.
    Ridge,
    /// Halbkreis-Kappe hinter einem Streckenendpunkt.
    Cap { precision: u32 },
}

/// Geteilte (Flyweight-)Geometrie für alle Sites mit gleichem Schlüssel.
#[derive(Debug, Clone)]
pub enum DistanceFieldTemplate {
    Point {
        cone: Arc<DistanceFieldMesh>,
    },
    Line {
        ridge: Arc<DistanceFieldMesh>,
        cap: Arc<DistanceFieldMesh>,
    },
}

impl DistanceFieldTemplate {
    pub fn kind(&self) -> SiteKind {
        match self {
            Self::Point { .. } => SiteKind::Point,
            Self::Line { .. } => SiteKind::Line,
        }
    }

    /// Referenzgleichheit aller geteilten Netze.
    pub fn shares_geometry_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point { cone: a }, Self::Point { cone: b }) => Arc::ptr_eq(a, b),
            (
                Self::Line {
                    ridge: ra,
                    cap: ca,
                },
                Self::Line {
                    ridge: rb,
                    cap: cb,
                },
            ) => Arc::ptr_eq(ra, rb) && Arc::ptr_eq(ca, cb),
            _ => false,
        }
    }
}

/// Baut Distanzfeld-Netze und hält sie im Cache, sodass jedes Netz pro
/// Schlüssel höchstens einmal erzeugt wird.
#[derive(Debug, Default)]
pub struct DistanceFieldFactory {
    cache: HashMap<TemplateKey, Arc<DistanceFieldMesh>>,
}

impl DistanceFieldFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liefert das Template für `(kind, precision, measure)`.
    ///
    /// Das Distanzmaß betrifft nur Punkt-Sites; Strecken verwenden immer die
    /// euklidische Geometrie.
    pub fn template(
        &mut self,
        kind: SiteKind,
        precision: Precision,
        measure: &DistanceMeasure,
    ) -> DistanceFieldTemplate {
        match kind {
            SiteKind::Point => DistanceFieldTemplate::Point {
                cone: self.point_mesh(precision, measure),
            },
            SiteKind::Line => DistanceFieldTemplate::Line {
                ridge: self.mesh(TemplateKey::Ridge, || DistanceFieldMesh::tent(2.0, 1.0, 1.0)),
                cap: self.mesh(
                    TemplateKey::Cap {
                        precision: precision.get(),
                    },
                    || DistanceFieldMesh::half_fan(precision.get()),
                ),
            },
        }
    }

    fn point_mesh(
        &mut self,
        precision: Precision,
        measure: &DistanceMeasure,
    ) -> Arc<DistanceFieldMesh> {
        let key = TemplateKey::Cone {
            precision: precision.get(),
            measure: measure.key(),
        };
        // Nur Euklid hat eine geometrische Konstruktion; alles andere wird
        // pro Randpunkt ausgewertet.
        match measure {
            DistanceMeasure::Euclidean => {
                self.mesh(key, || DistanceFieldMesh::cone(precision.get()))
            }
            _ => self.mesh(key, || {
                DistanceFieldMesh::measured_fan(precision.get(), measure)
            }),
        }
    }

    fn mesh(
        &mut self,
        key: TemplateKey,
        build: impl FnOnce() -> DistanceFieldMesh,
    ) -> Arc<DistanceFieldMesh> {
        self.cache
            .entry(key)
            .or_insert_with_key(|key| {
                let mesh = build();
                debug!(
                    "Built distance field mesh {:?} with {} faces.",
                    key,
                    mesh.face_count()
                );
                Arc::new(mesh)
            })
            .clone()
    }

    /// Anzahl der bisher erzeugten Netze.
    pub fn cached_meshes(&self) -> usize {
        self.cache.len()
    }

    /// Größte kodierte Tiefe aller Netze (mindestens 1). Bestimmt zusammen mit
    /// `maxDistance` die Far-Plane der Kamera.
    pub fn max_depth(&self) -> f32 {
        self.cache
            .values()
            .map(|mesh| mesh.max_depth())
            .fold(1.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn precision(n: u32) -> Precision {
        Precision::try_from(n).unwrap()
    }

    #[test]
    fn test_identical_keys_share_one_template() {
        let mut factory = DistanceFieldFactory::new();
        let euclid = DistanceMeasure::Euclidean;
        let first = factory.template(SiteKind::Point, precision(16), &euclid);
        let second = factory.template(SiteKind::Point, precision(16), &euclid);
        assert!(first.shares_geometry_with(&second));
        assert_eq!(factory.cached_meshes(), 1);

        let line_a = factory.template(SiteKind::Line, precision(16), &euclid);
        let line_b = factory.template(SiteKind::Line, precision(16), &euclid);
        assert!(line_a.shares_geometry_with(&line_b));
        assert_eq!(factory.cached_meshes(), 3);
    }

    #[test]
    fn test_distinct_keys_build_distinct_templates() {
        let mut factory = DistanceFieldFactory::new();
        let a = factory.template(SiteKind::Point, precision(16), &DistanceMeasure::Euclidean);
        let b = factory.template(SiteKind::Point, precision(32), &DistanceMeasure::Euclidean);
        let c = factory.template(SiteKind::Point, precision(16), &DistanceMeasure::Manhattan);
        assert!(!a.shares_geometry_with(&b));
        assert!(!a.shares_geometry_with(&c));
        assert!(!a.shares_geometry_with(&factory.template(
            SiteKind::Line,
            precision(16),
            &DistanceMeasure::Euclidean
        )));
    }

    #[test]
    fn test_ridge_is_shared_across_precisions() {
        let mut factory = DistanceFieldFactory::new();
        let euclid = DistanceMeasure::Euclidean;
        let DistanceFieldTemplate::Line { ridge: r8, .. } =
            factory.template(SiteKind::Line, precision(8), &euclid)
        else {
            panic!("expected a line template");
        };
        let DistanceFieldTemplate::Line { ridge: r32, cap } =
            factory.template(SiteKind::Line, precision(32), &euclid)
        else {
            panic!("expected a line template");
        };
        assert!(Arc::ptr_eq(&r8, &r32));
        assert_eq!(r8.face_count(), 4);
        assert_eq!(cap.face_count(), 32);
    }

    #[test]
    fn test_facet_counts() {
        let mut factory = DistanceFieldFactory::new();
        for p in [3, 7, 16, 64] {
            let DistanceFieldTemplate::Point { cone } =
                factory.template(SiteKind::Point, precision(p), &DistanceMeasure::Euclidean)
            else {
                panic!("expected a point template");
            };
            assert_eq!(cone.face_count(), p as usize);
        }
    }

    #[test]
    fn test_max_depth_tracks_measures() {
        let mut factory = DistanceFieldFactory::new();
        factory.template(SiteKind::Point, precision(16), &DistanceMeasure::Euclidean);
        assert_abs_diff_eq!(factory.max_depth(), 1.0, epsilon = 1e-5);
        factory.template(SiteKind::Point, precision(8), &DistanceMeasure::Manhattan);
        assert_abs_diff_eq!(factory.max_depth(), 2.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_unknown_measure_name_uses_measured_fan() {
        let mut factory = DistanceFieldFactory::new();
        let unknown = DistanceMeasure::from_name("hamming");
        let DistanceFieldTemplate::Point { cone } =
            factory.template(SiteKind::Point, precision(12), &unknown)
        else {
            panic!("expected a point template");
        };
        assert_eq!(*cone, DistanceFieldMesh::measured_fan(12, &unknown));
        let euclid = factory.template(SiteKind::Point, precision(12), &DistanceMeasure::Euclidean);
        assert!(!euclid.shares_geometry_with(&DistanceFieldTemplate::Point { cone }));
        assert_abs_diff_eq!(factory.max_depth(), 1.0, epsilon = 1e-5);
    }
}
