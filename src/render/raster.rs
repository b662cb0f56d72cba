// src/render/raster.rs

use crate::voronoi::sites::SiteId;
use bevy::math::Vec3;

/// Farb-, Tiefen- und Site-Puffer.
///
/// Pixel `(x, y)` tastet den Weltpunkt `(x + 0.5, y + 0.5)` ab; y zeigt nach
/// oben, Zeile 0 ist die unterste Zeile.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
    sites: Vec<Option<SiteId>>,
}

/// Was ein Dreieck in den Puffer schreibt.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub rgba: [u8; 4],
    /// `None` für Overlays, die den Site-Puffer nicht verändern.
    pub site: Option<SiteId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// Schreibt nur, wenn die Tiefe strikt kleiner ist. Bei Gleichstand
    /// gewinnt das zuerst gezeichnete Dreieck.
    Less,
    /// Schreibt immer, ohne den Tiefenpuffer zu verändern.
    Disabled,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![[0, 0, 0, 255]; len],
            depth: vec![f32::INFINITY; len],
            sites: vec![None; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, rgba: [u8; 4]) {
        self.color.fill(rgba);
        self.depth.fill(f32::INFINITY);
        self.sites.fill(None);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Site, deren Distanzfeld den Pixel gewonnen hat.
    pub fn site(&self, x: u32, y: u32) -> Option<SiteId> {
        self.index(x, y).and_then(|i| self.sites[i])
    }

    /// RGBA8-Bytes mit der obersten Zeile zuerst (Bild-/Texturkonvention).
    pub fn to_rgba8_top_down(&self) -> Vec<u8> {
        let row = self.width as usize;
        let mut bytes = Vec::with_capacity(self.color.len() * 4);
        if row == 0 {
            return bytes;
        }
        for line in self.color.chunks_exact(row).rev() {
            bytes.extend(line.iter().flatten());
        }
        bytes
    }

    /// Füllt ein Dreieck in Bildschirmkoordinaten (`x`, `y` in Pixeln,
    /// `z` = Tiefe in [0, 1]). Fragmente außerhalb von [0, 1] werden verworfen.
    pub fn fill_triangle(&mut self, triangle: [Vec3; 3], fragment: Fragment, test: DepthTest) {
        let [v0, v1, v2] = triangle;
        let area = edge(v0, v1, v2.x, v2.y);
        if area.abs() <= f32::EPSILON || !area.is_finite() {
            return;
        }

        let min_x = v0.x.min(v1.x).min(v2.x);
        let max_x = v0.x.max(v1.x).max(v2.x);
        let min_y = v0.y.min(v1.y).min(v2.y);
        let max_y = v0.y.max(v1.y).max(v2.y);

        // Pixelzentren innerhalb der Bounding Box
        let x_start = (min_x - 0.5).ceil().max(0.0);
        let x_end = (max_x - 0.5).floor().min(self.width as f32 - 1.0);
        let y_start = (min_y - 0.5).ceil().max(0.0);
        let y_end = (max_y - 0.5).floor().min(self.height as f32 - 1.0);
        if x_start > x_end || y_start > y_end {
            return;
        }

        let inv_area = 1.0 / area;
        for py in y_start as u32..=y_end as u32 {
            let cy = py as f32 + 0.5;
            for px in x_start as u32..=x_end as u32 {
                let cx = px as f32 + 0.5;
                let w0 = edge(v1, v2, cx, cy) * inv_area;
                let w1 = edge(v2, v0, cx, cy) * inv_area;
                let w2 = edge(v0, v1, cx, cy) * inv_area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let i = py as usize * self.width as usize + px as usize;
                match test {
                    DepthTest::Less => {
                        if depth < self.depth[i] {
                            self.depth[i] = depth;
                            self.color[i] = fragment.rgba;
                            if fragment.site.is_some() {
                                self.sites[i] = fragment.site;
                            }
                        }
                    }
                    DepthTest::Disabled => {
                        self.color[i] = fragment.rgba;
                        if fragment.site.is_some() {
                            self.sites[i] = fragment.site;
                        }
                    }
                }
            }
        }
    }
}

/// Vorzeichenbehaftete doppelte Fläche des Dreiecks `(a, b, p)`.
fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}
