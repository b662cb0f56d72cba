// src/render/camera.rs

use bevy::math::{Mat4, Vec3};

/// Abstand der Kamera über der Ebene `z = 0`.
pub const CAMERA_HEIGHT: f32 = 2.0;
pub const NEAR_PLANE: f32 = 1.0;
/// Zusätzlicher Abstand hinter der tiefsten Distanz, damit nichts an der
/// Far-Plane abgeschnitten wird.
pub const DEPTH_EPSILON: f32 = 1.0;

/// Orthografische Kamera, deren Ausschnitt genau der Pixelgröße der
/// Zeichenfläche entspricht und die entlang `-z` blickt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    pub right: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicCamera {
    /// `depth_range` ist die größte Distanz, die ein Distanzfeld kodiert.
    pub fn new(width: u32, height: u32, depth_range: f32) -> Self {
        let mut camera = Self {
            right: 0.0,
            top: 0.0,
            near: NEAR_PLANE,
            far: 0.0,
        };
        camera.configure(width, height, depth_range);
        camera
    }

    pub fn configure(&mut self, width: u32, height: u32, depth_range: f32) {
        self.right = width as f32;
        self.top = height as f32;
        self.far = CAMERA_HEIGHT + depth_range + DEPTH_EPSILON;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-Vec3::new(0.0, 0.0, CAMERA_HEIGHT))
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.right, 0.0, self.top, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Weltpunkt → Bildschirm (`x`, `y` in Pixeln, `z` = Tiefe in [0, 1]).
    pub fn to_screen(&self, view_projection: &Mat4, world: Vec3) -> Vec3 {
        let ndc = view_projection.project_point3(world);
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.right,
            (ndc.y + 1.0) * 0.5 * self.top,
            ndc.z,
        )
    }
}
