// src/voronoi/controller.rs

use super::diagram::Diagram;
use super::options::{CoverageBound, Precision};
use super::sites::SiteKind;
use bevy::log::info;

impl Diagram {
    /// Übernimmt die aktuelle Größe der Zeichenfläche.
    ///
    /// Der Abdeckungsradius wird neu bestimmt und auf jeden Knoten
    /// angewendet, danach werden Viewport und Projektion angepasst.
    pub fn resize(&mut self) {
        let max_distance = self.coverage.radius(self.canvas);
        self.registry.set_max_distance(max_distance);

        for (id, node) in self.compositor.nodes_mut() {
            if let Some(site) = self.registry.get(id) {
                node.set_radius(max_distance, site.geometry());
            }
        }

        let depth_range = self.depth_range();
        self.compositor
            .resize(self.canvas.width, self.canvas.height, depth_range);
        info!(
            "Resized diagram to {}x{}, max distance {:.1}.",
            self.canvas.width, self.canvas.height, max_distance
        );
    }

    /// Setzt die Größe und ruft [`Self::resize`].
    pub fn resize_to(&mut self, width: u32, height: u32) {
        self.canvas.set_size(width, height);
        self.resize();
    }

    /// Ändert die Anzahl der Fächersegmente. Alle bestehenden Knoten bekommen
    /// die Netze der neuen Präzision.
    pub fn set_precision(&mut self, precision: u32) {
        let precision = Precision::clamped(precision);
        if precision == self.precision {
            return;
        }
        self.precision = precision;

        for (id, node) in self.compositor.nodes_mut() {
            let Some(site) = self.registry.get(id) else {
                continue;
            };
            let template = self.factory.template(site.kind(), precision, &self.measure);
            node.retemplate(site.geometry(), &template);
        }
        // Für neue Sites ohne Verzögerung verfügbar
        self.factory.template(SiteKind::Point, precision, &self.measure);
        self.factory.template(SiteKind::Line, precision, &self.measure);

        let depth_range = self.depth_range();
        self.compositor.set_depth_range(depth_range);
        info!("Precision set to {}.", precision.get());
    }

    pub fn set_coverage(&mut self, coverage: CoverageBound) {
        self.coverage = coverage;
        self.resize();
    }

    /// Größte Tiefe, die ein Distanzfeld bei aktuellem Radius erreicht.
    pub(super) fn depth_range(&self) -> f32 {
        self.registry.max_distance() * self.factory.max_depth()
    }
}
