// src/render/compositor.rs

use super::camera::OrthographicCamera;
use super::markers::MarkerLayer;
use super::material::{ColorMaterial, MaterialCache};
use super::raster::{DepthTest, Fragment, Framebuffer};
use crate::math::utils::color::rgb8;
use crate::voronoi::node::SiteNode;
use crate::voronoi::sites::SiteId;
use bevy::log::info;
use bevy::math::Mat4;
use bevy::render::color::Color;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rastert die Distanzfelder aller Sites mit "nächste Tiefe gewinnt".
///
/// Da die Tiefe jedes Fragments (näherungsweise) der Distanz zur Site
/// entspricht, ist das Ergebnis des Tiefentests genau die Voronoi-Zerlegung.
/// Knoten werden nach aufsteigender `SiteId` gezeichnet; bei exakt gleicher
/// Tiefe gewinnt damit die kleinste ID.
#[derive(Debug)]
pub struct Compositor {
    camera: OrthographicCamera,
    scene: BTreeMap<SiteId, SiteNode>,
    materials: MaterialCache,
    frame: Framebuffer,
    clear_color: [u8; 4],
}

impl Compositor {
    pub fn new(width: u32, height: u32, depth_range: f32) -> Self {
        Self {
            camera: OrthographicCamera::new(width, height, depth_range),
            scene: BTreeMap::new(),
            materials: MaterialCache::new(),
            frame: Framebuffer::new(width, height),
            clear_color: [0, 0, 0, 255],
        }
    }

    pub fn add(&mut self, id: SiteId, node: SiteNode) {
        self.scene.insert(id, node);
    }

    pub fn remove(&mut self, id: SiteId) -> Option<SiteNode> {
        self.scene.remove(&id)
    }

    pub fn node(&self, id: SiteId) -> Option<&SiteNode> {
        self.scene.get(&id)
    }

    pub fn node_mut(&mut self, id: SiteId) -> Option<&mut SiteNode> {
        self.scene.get_mut(&id)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (SiteId, &mut SiteNode)> + '_ {
        self.scene.iter_mut().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Material für `color`; gleiche Farben teilen eine Instanz.
    pub fn material(&mut self, color: Color) -> Arc<ColorMaterial> {
        self.materials.material(color)
    }

    pub fn materials(&self) -> &MaterialCache {
        &self.materials
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    /// Passt Viewport und Projektion an eine neue Zeichenflächengröße an.
    pub fn resize(&mut self, width: u32, height: u32, depth_range: f32) {
        self.camera.configure(width, height, depth_range);
        self.frame.resize(width, height);
        info!(
            "Compositor viewport set to {}x{}, far plane at {:.1}.",
            width, height, self.camera.far
        );
    }

    /// Nur die Tiefenreichweite ändern (z.B. nach neuem Distanzmaß-Template).
    pub fn set_depth_range(&mut self, depth_range: f32) {
        let (w, h) = (self.frame.width(), self.frame.height());
        self.camera.configure(w, h, depth_range);
    }

    /// Zeichnet die Szene und danach, falls sichtbar, die Marker.
    pub fn render(&mut self, markers: &MarkerLayer) {
        self.frame.clear(self.clear_color);
        let view_projection = self.camera.view_projection();

        for (id, node) in &self.scene {
            let fragment = Fragment {
                rgba: node.material().rgba,
                site: Some(*id),
            };
            for (mesh, model) in node.world_parts() {
                Self::draw_mesh(
                    &mut self.frame,
                    &self.camera,
                    &(view_projection * model),
                    mesh.triangle_vertices(),
                    fragment,
                    DepthTest::Less,
                );
            }
        }

        if markers.visible() {
            let [r, g, b] = rgb8(markers.style().color);
            let fragment = Fragment {
                rgba: [r, g, b, 255],
                site: None,
            };
            for (_, marker) in markers.iter() {
                Self::draw_mesh(
                    &mut self.frame,
                    &self.camera,
                    &(view_projection * marker.compute_matrix()),
                    markers.quad().triangle_vertices(),
                    fragment,
                    DepthTest::Disabled,
                );
            }
        }
    }

    fn draw_mesh(
        frame: &mut Framebuffer,
        camera: &OrthographicCamera,
        mvp: &Mat4,
        triangles: impl Iterator<Item = [bevy::math::Vec3; 3]>,
        fragment: Fragment,
        test: DepthTest,
    ) {
        for triangle in triangles {
            let screen = triangle.map(|vertex| camera.to_screen(mvp, vertex));
            frame.fill_triangle(screen, fragment, test);
        }
    }
}
