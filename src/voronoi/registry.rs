// src/voronoi/registry.rs

use super::sites::{Site, SiteGeometry, SiteId};
use bevy::render::color::Color;
use std::collections::HashMap;

/// Besitzt Identität, Farbe und Geometrie aller lebenden Sites.
///
/// IDs stammen aus einem monoton steigenden Zähler und werden nie erneut
/// vergeben, auch nicht nach dem Entfernen einer Site.
#[derive(Debug)]
pub struct SiteRegistry {
    sites: HashMap<SiteId, Site>,
    next_id: u64,
    max_distance: f32,
}

impl SiteRegistry {
    pub fn new(max_distance: f32) -> Self {
        Self {
            sites: HashMap::new(),
            next_id: 0,
            max_distance,
        }
    }

    /// Vergibt die nächste ID und legt die Site an.
    pub fn insert(&mut self, color: Color, geometry: SiteGeometry) -> &Site {
        let id = SiteId(self.next_id);
        self.next_id += 1;
        self.sites
            .entry(id)
            .or_insert_with(|| Site::new(id, color, geometry))
    }

    pub fn remove(&mut self, id: SiteId) -> Option<Site> {
        self.sites.remove(&id)
    }

    pub fn get(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(&id)
    }

    pub fn get_mut(&mut self, id: SiteId) -> Option<&mut Site> {
        self.sites.get_mut(&id)
    }

    pub fn contains(&self, id: SiteId) -> bool {
        self.sites.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> + '_ {
        self.sites.values()
    }

    /// Aktueller Abdeckungsradius der Distanzfelder.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.max_distance = max_distance;
    }
}
