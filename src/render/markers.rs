// src/render/markers.rs

use crate::math::geometry::DistanceFieldMesh;
use crate::math::utils::angles::rotation_from_y;
use crate::voronoi::sites::{Site, SiteGeometry, SiteId};
use bevy::math::Vec3;
use bevy::render::color::Color;
use bevy::transform::components::Transform;
use std::collections::HashMap;

/// Aussehen der Marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub color: Color,
    /// Kantenlänge eines Punkt-Markers bzw. Breite eines Strecken-Markers.
    pub size: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 5.0,
        }
    }
}

/// Overlay, das für jede Site einen kleinen Marker über allen Distanzfeldern
/// zeichnet. Spiegelt die Mitgliedschaft der Registry.
#[derive(Debug)]
pub struct MarkerLayer {
    markers: HashMap<SiteId, Transform>,
    quad: DistanceFieldMesh,
    style: MarkerStyle,
    visible: bool,
}

impl MarkerLayer {
    pub fn new(visible: bool) -> Self {
        Self {
            markers: HashMap::new(),
            quad: DistanceFieldMesh::quad(1.0, 1.0),
            style: MarkerStyle::default(),
            visible,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    pub fn set_style(&mut self, style: MarkerStyle) {
        self.style = style;
    }

    /// Registriert einen Marker für `site`. Bereits bekannte Sites bleiben unverändert.
    pub fn add(&mut self, site: &Site) {
        let style = self.style;
        self.markers
            .entry(site.id())
            .or_insert_with(|| marker_transform(site.geometry(), style));
    }

    pub fn remove(&mut self, id: SiteId) -> bool {
        self.markers.remove(&id).is_some()
    }

    pub fn contains(&self, id: SiteId) -> bool {
        self.markers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, id: SiteId) -> Option<&Transform> {
        self.markers.get(&id)
    }

    /// Positioniert alle Marker anhand des aktuellen Site-Zustands neu.
    pub fn update<'a>(&mut self, sites: impl IntoIterator<Item = &'a Site>) {
        let style = self.style;
        for site in sites {
            if let Some(marker) = self.markers.get_mut(&site.id()) {
                *marker = marker_transform(site.geometry(), style);
            }
        }
    }

    pub fn quad(&self) -> &DistanceFieldMesh {
        &self.quad
    }

    pub fn iter(&self) -> impl Iterator<Item = (SiteId, &Transform)> + '_ {
        self.markers.iter().map(|(id, marker)| (*id, marker))
    }
}

/// Punkte: Quadrat mit fester Größe. Strecken: Balken mit fester Breite und
/// der Länge der Strecke (mindestens `style.size`), entlang der
/// Streckenrichtung gedreht.
fn marker_transform(geometry: &SiteGeometry, style: MarkerStyle) -> Transform {
    let translation = geometry.anchor().extend(0.0);
    match geometry {
        SiteGeometry::Point(_) => Transform::from_translation(translation)
            .with_scale(Vec3::new(style.size, style.size, 1.0)),
        SiteGeometry::Line { .. } => Transform::from_translation(translation)
            .with_rotation(rotation_from_y(geometry.direction()))
            .with_scale(Vec3::new(style.size, geometry.length().max(style.size), 1.0)),
    }
}
