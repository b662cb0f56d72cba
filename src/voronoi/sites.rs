// src/voronoi/sites.rs

use crate::math::utils::constants::EPSILON_SQUARED;
use bevy::math::Vec2;
use bevy::render::color::Color;
use std::fmt;

/// Eindeutige, nie wiederverwendete Kennung einer Site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for SiteId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    Point,
    Line,
}

/// Welcher Endpunkt einer Strecke gemeint ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    A,
    B,
}

/// Geometrie einer Site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteGeometry {
    Point(Vec2),
    Line { a: Vec2, b: Vec2 },
}

/// Eine Site des Diagramms: gemeinsame Felder einmal, die Form als Variante.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    id: SiteId,
    color: Color,
    geometry: SiteGeometry,
}

impl Site {
    pub(crate) fn new(id: SiteId, color: Color, geometry: SiteGeometry) -> Self {
        Self {
            id,
            color,
            geometry,
        }
    }

    pub fn id(&self) -> SiteId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn kind(&self) -> SiteKind {
        match self.geometry {
            SiteGeometry::Point(_) => SiteKind::Point,
            SiteGeometry::Line { .. } => SiteKind::Line,
        }
    }

    pub fn geometry(&self) -> &SiteGeometry {
        &self.geometry
    }

    pub(crate) fn geometry_mut(&mut self) -> &mut SiteGeometry {
        &mut self.geometry
    }

    /// Repräsentativer Punkt: Position bzw. Mittelpunkt der Strecke.
    pub fn anchor(&self) -> Vec2 {
        self.geometry.anchor()
    }
}

impl SiteGeometry {
    pub fn anchor(&self) -> Vec2 {
        match *self {
            Self::Point(position) => position,
            Self::Line { a, b } => (a + b) * 0.5,
        }
    }

    /// Länge der Strecke (0 für Punkte).
    pub fn length(&self) -> f32 {
        match *self {
            Self::Point(_) => 0.0,
            Self::Line { a, b } => a.distance(b),
        }
    }

    /// Einheitsvektor von `a` nach `b`. Entartete Strecken zeigen entlang +y.
    pub fn direction(&self) -> Vec2 {
        match *self {
            Self::Point(_) => Vec2::Y,
            Self::Line { a, b } => line_direction(a, b),
        }
    }
}

pub(crate) fn line_direction(a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    if ab.length_squared() < EPSILON_SQUARED {
        Vec2::Y
    } else {
        ab.normalize()
    }
}

/// Exakter euklidischer Abstand eines Punktes zur Strecke `a`–`b`.
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq < EPSILON_SQUARED {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_line_derived_values() {
        let line = SiteGeometry::Line {
            a: Vec2::new(0.0, 0.0),
            b: Vec2::new(3.0, 4.0),
        };
        assert_relative_eq!(line.length(), 5.0);
        assert_abs_diff_eq!(line.direction().x, 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(line.direction().y, 0.8, epsilon = 1e-6);
        assert_eq!(line.anchor(), Vec2::new(1.5, 2.0));
    }

    #[test]
    fn test_degenerate_line_direction() {
        let line = SiteGeometry::Line {
            a: Vec2::new(2.0, 2.0),
            b: Vec2::new(2.0, 2.0),
        };
        assert_eq!(line.direction(), Vec2::Y);
        assert_eq!(line.length(), 0.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_relative_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_relative_eq!(distance_to_segment(Vec2::new(13.0, 4.0), a, b), 5.0);
        assert_relative_eq!(distance_to_segment(Vec2::new(-3.0, 0.0), a, a), 3.0);
    }

    #[test]
    fn test_site_kind_dispatch() {
        let site = Site::new(SiteId(3), Color::RED, SiteGeometry::Point(Vec2::ONE));
        assert_eq!(site.kind(), SiteKind::Point);
        assert_eq!(site.anchor(), Vec2::ONE);
        assert_eq!(site.id().to_string(), "#3");
    }
}
