// src/voronoi/handles.rs

use super::node::SiteNode;
use super::sites::{Endpoint, Site, SiteGeometry, SiteId};
use bevy::math::Vec2;
use bevy::transform::components::Transform;

/// Veränderlicher Zugriff auf eine Punkt-Site.
///
/// Jeder Setter schreibt die Geometrie der Site und synchronisiert sofort
/// den Render-Knoten; zurückgegeben wird dessen neue Ursprungs-Transformation.
#[derive(Debug)]
pub struct PointHandle<'a> {
    site: &'a mut Site,
    node: &'a mut SiteNode,
}

impl<'a> PointHandle<'a> {
    pub(super) fn new(site: &'a mut Site, node: &'a mut SiteNode) -> Self {
        Self { site, node }
    }

    pub fn id(&self) -> SiteId {
        self.site.id()
    }

    pub fn position(&self) -> Vec2 {
        self.site.anchor()
    }

    pub fn x(&self) -> f32 {
        self.position().x
    }

    pub fn y(&self) -> f32 {
        self.position().y
    }

    pub fn set(&mut self, x: f32, y: f32) -> Transform {
        *self.site.geometry_mut() = SiteGeometry::Point(Vec2::new(x, y));
        self.node.sync(self.site.geometry())
    }

    pub fn set_x(&mut self, x: f32) -> Transform {
        let y = self.y();
        self.set(x, y)
    }

    pub fn set_y(&mut self, y: f32) -> Transform {
        let x = self.x();
        self.set(x, y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> Transform {
        let p = self.position() + Vec2::new(dx, dy);
        self.set(p.x, p.y)
    }
}

/// Veränderlicher Zugriff auf eine Strecken-Site.
#[derive(Debug)]
pub struct LineHandle<'a> {
    site: &'a mut Site,
    node: &'a mut SiteNode,
}

impl<'a> LineHandle<'a> {
    pub(super) fn new(site: &'a mut Site, node: &'a mut SiteNode) -> Self {
        Self { site, node }
    }

    pub fn id(&self) -> SiteId {
        self.site.id()
    }

    pub fn endpoints(&self) -> (Vec2, Vec2) {
        endpoints(self.site.geometry())
    }

    pub fn length(&self) -> f32 {
        self.site.geometry().length()
    }

    /// Normierte Richtung von `a` nach `b`.
    pub fn direction(&self) -> Vec2 {
        self.site.geometry().direction()
    }

    pub fn midpoint(&self) -> Vec2 {
        self.site.anchor()
    }

    pub fn set_endpoints(&mut self, a: Vec2, b: Vec2) -> Transform {
        *self.site.geometry_mut() = SiteGeometry::Line { a, b };
        self.node.sync(self.site.geometry())
    }

    pub fn a(&mut self) -> EndpointHandle<'_> {
        self.endpoint(Endpoint::A)
    }

    pub fn b(&mut self) -> EndpointHandle<'_> {
        self.endpoint(Endpoint::B)
    }

    pub fn endpoint(&mut self, endpoint: Endpoint) -> EndpointHandle<'_> {
        EndpointHandle {
            site: &mut *self.site,
            node: &mut *self.node,
            endpoint,
        }
    }
}

/// Ein Endpunkt einer Strecke. Verschieben eines Endpunkts baut die
/// Dach- und Kappen-Transformationen der ganzen Strecke neu auf.
#[derive(Debug)]
pub struct EndpointHandle<'a> {
    site: &'a mut Site,
    node: &'a mut SiteNode,
    endpoint: Endpoint,
}

impl EndpointHandle<'_> {
    pub fn which(&self) -> Endpoint {
        self.endpoint
    }

    pub fn position(&self) -> Vec2 {
        let (a, b) = endpoints(self.site.geometry());
        match self.endpoint {
            Endpoint::A => a,
            Endpoint::B => b,
        }
    }

    pub fn x(&self) -> f32 {
        self.position().x
    }

    pub fn y(&self) -> f32 {
        self.position().y
    }

    pub fn set(&mut self, x: f32, y: f32) -> Transform {
        let (a, b) = endpoints(self.site.geometry());
        let moved = Vec2::new(x, y);
        *self.site.geometry_mut() = match self.endpoint {
            Endpoint::A => SiteGeometry::Line { a: moved, b },
            Endpoint::B => SiteGeometry::Line { a, b: moved },
        };
        self.node.sync(self.site.geometry())
    }

    pub fn set_x(&mut self, x: f32) -> Transform {
        let y = self.y();
        self.set(x, y)
    }

    pub fn set_y(&mut self, y: f32) -> Transform {
        let x = self.x();
        self.set(x, y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> Transform {
        let p = self.position() + Vec2::new(dx, dy);
        self.set(p.x, p.y)
    }
}

fn endpoints(geometry: &SiteGeometry) -> (Vec2, Vec2) {
    match *geometry {
        SiteGeometry::Line { a, b } => (a, b),
        SiteGeometry::Point(p) => (p, p),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use approx::assert_abs_diff_eq;
    use bevy::math::{Vec2, Vec3};

    fn diagram() -> Diagram {
        Diagram::new(
            DiagramOptions::new()
                .with_size(200, 200)
                .with_precision(24)
                .with_markers(false),
        )
    }

    #[test]
    fn test_point_setters_return_origin() {
        let mut diagram = diagram();
        let id = diagram.point(10.0, 20.0, "red");
        let mut handle = diagram.point_mut(id).unwrap();
        assert_eq!(handle.x(), 10.0);
        assert_eq!(handle.set_x(30.0).translation, Vec3::new(30.0, 20.0, 0.0));
        assert_eq!(handle.set_y(5.0).translation, Vec3::new(30.0, 5.0, 0.0));
        assert_eq!(handle.translate(-10.0, 1.0).translation, Vec3::new(20.0, 6.0, 0.0));
        assert_eq!(diagram.node(id).unwrap().origin().translation, Vec3::new(20.0, 6.0, 0.0));
    }

    #[test]
    fn test_endpoint_move_rebuilds_segment() {
        let mut diagram = diagram();
        let id = diagram.line((20.0, 100.0), (120.0, 100.0), "green");
        let mut line = diagram.line_mut(id).unwrap();
        line.b().set(20.0, 180.0);
        assert_abs_diff_eq!(line.length(), 80.0);
        assert_abs_diff_eq!(line.direction().y, 1.0, epsilon = 1e-6);
        assert_eq!(line.midpoint(), Vec2::new(20.0, 140.0));

        let origin = line.a().set_x(60.0);
        assert_eq!(origin.translation, Vec3::new(60.0, 100.0, 0.0));
        assert_eq!(line.endpoints(), (Vec2::new(60.0, 100.0), Vec2::new(20.0, 180.0)));

        let ridge = &diagram.node(id).unwrap().parts()[2];
        assert_abs_diff_eq!(ridge.local.scale.y, (40.0f32 * 40.0 + 80.0 * 80.0).sqrt(), epsilon = 1e-3);
    }

    #[test]
    fn test_moved_line_wins_new_pixels() {
        let mut diagram = diagram();
        let point = diagram.point(100.0, 100.0, "red");
        let line = diagram.line((10.0, 10.0), (10.0, 190.0), "blue");
        diagram.render();
        assert_eq!(diagram.site_at(150, 100), Some(point));

        diagram
            .line_mut(line)
            .unwrap()
            .set_endpoints(Vec2::new(160.0, 10.0), Vec2::new(160.0, 190.0));
        diagram.render();
        assert_eq!(diagram.site_at(150, 100), Some(line));
        assert_eq!(diagram.site_at(90, 100), Some(point));
    }

    #[test]
    fn test_degenerate_line_renders_like_point() {
        let mut diagram = diagram();
        let id = diagram.line((100.0, 100.0), (100.0, 100.0), "blue");
        diagram.render();
        assert_eq!(diagram.site_at(10, 10), Some(id));
        assert_eq!(diagram.site_at(190, 190), Some(id));
    }
}
