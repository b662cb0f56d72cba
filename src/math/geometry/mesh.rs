// src/math/geometry/mesh.rs

use crate::math::distance::DistanceMeasure;
use crate::math::utils::constants::{PI, TAU};
use bevy::math::{Vec2, Vec3};

/// Dreiecksnetz, dessen z-Koordinate die (negative) Distanz zur Site kodiert.
///
/// Der Ursprung des lokalen Koordinatensystems liegt auf der Site selbst (`z = 0`),
/// weiter entfernte Punkte liegen bei `z = -distanz`. Eine Kamera, die von `+z`
/// auf die Ebene schaut, sieht damit immer die nächstgelegene Site zuerst.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFieldMesh {
    pub vertices: Vec<Vec3>,
    /// Dreiecke als Indizes in `vertices`, gegen den Uhrzeigersinn.
    pub triangles: Vec<[u32; 3]>,
}

impl DistanceFieldMesh {
    /// Polygonaler Kegel: Spitze im Ursprung, `precision` Randpunkte auf dem
    /// Einheitskreis bei Tiefe 1.
    ///
    /// Entlang der abgetasteten Richtungen ist die Tiefe exakt die euklidische
    /// Distanz, dazwischen wird linear interpoliert.
    pub fn cone(precision: u32) -> Self {
        Self::closed_fan(precision, |rim| rim.length())
    }

    /// Wie [`Self::cone`], aber die Tiefe jedes Randpunktes wird direkt aus dem
    /// Distanzmaß ausgewertet (`measure(origin, rim)`).
    pub fn measured_fan(precision: u32, measure: &DistanceMeasure) -> Self {
        Self::closed_fan(precision, |rim| measure.distance(Vec2::ZERO, rim))
    }

    /// Halber Fächer (Winkel π) mit `precision` Dreiecken. Bildet die abgerundete
    /// Kappe hinter einem Endpunkt einer Strecke (Halbebene `y >= 0`).
    pub fn half_fan(precision: u32) -> Self {
        Self::triangle_fan(1.0, 1.0, PI, precision)
    }

    /// Offener Dreiecksfächer mit Radius `radius`, Randtiefe `depth` und
    /// Öffnungswinkel `angle` ab der positiven x-Achse.
    pub fn triangle_fan(radius: f32, depth: f32, angle: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let step = angle / segments as f32;

        let mut vertices = Vec::with_capacity(segments as usize + 2);
        vertices.push(Vec3::ZERO);
        for i in 0..=segments {
            let (sin, cos) = (step * i as f32).sin_cos();
            vertices.push(Vec3::new(radius * cos, radius * sin, -depth));
        }

        let triangles = (0..segments).map(|j| [0, j + 1, j + 2]).collect();

        Self {
            vertices,
            triangles,
        }
    }

    /// Zeltdach: der First liegt auf der y-Achse (`z = 0`, Länge `length`,
    /// zentriert um den Ursprung), die Traufen bei `x = ±width/2` und `z = -depth`.
    pub fn tent(width: f32, length: f32, depth: f32) -> Self {
        let half_w = width / 2.0;
        let half_l = length / 2.0;

        // B = 0, T = 1, LB = 2, LT = 3, RB = 4, RT = 5
        let vertices = vec![
            Vec3::new(0.0, -half_l, 0.0),
            Vec3::new(0.0, half_l, 0.0),
            Vec3::new(-half_w, -half_l, -depth),
            Vec3::new(-half_w, half_l, -depth),
            Vec3::new(half_w, -half_l, -depth),
            Vec3::new(half_w, half_l, -depth),
        ];
        let triangles = vec![[0, 3, 2], [0, 1, 3], [0, 4, 5], [0, 5, 1]];

        Self {
            vertices,
            triangles,
        }
    }

    /// Flaches Rechteck in der xy-Ebene, zentriert um den Ursprung.
    pub fn quad(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self {
            vertices: vec![
                Vec3::new(-hw, -hh, 0.0),
                Vec3::new(hw, -hh, 0.0),
                Vec3::new(hw, hh, 0.0),
                Vec3::new(-hw, hh, 0.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    /// Inkreisradius des Einheitskegels mit `precision` Randpunkten. Bis zu
    /// diesem Abstand deckt ein Fächer jede Richtung ab.
    pub fn inscribed_radius(precision: u32) -> f32 {
        (PI / precision.max(3) as f32).cos()
    }

    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    /// Größte kodierte Distanz (Betrag der kleinsten z-Koordinate).
    pub fn max_depth(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| -v.z)
            .fold(0.0, f32::max)
    }

    /// Iteriert über die Eckpunkte jedes Dreiecks.
    pub fn triangle_vertices(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    /// Geschlossener Fächer um den Ursprung; der letzte Rand-Punkt wird nicht
    /// dupliziert, das letzte Dreieck schließt zum ersten Randpunkt.
    fn closed_fan(precision: u32, depth_at: impl Fn(Vec2) -> f32) -> Self {
        let step = TAU / precision as f32;

        let mut vertices = Vec::with_capacity(precision as usize + 1);
        vertices.push(Vec3::ZERO);
        for i in 0..precision {
            let (sin, cos) = (step * i as f32).sin_cos();
            let rim = Vec2::new(cos, sin);
            vertices.push(rim.extend(-depth_at(rim)));
        }

        let triangles = (0..precision)
            .map(|j| [0, j + 1, (j + 1) % precision + 1])
            .collect();

        Self {
            vertices,
            triangles,
        }
    }
}
