// src/render/material.rs

use crate::math::utils::color::rgb8;
use bevy::render::color::Color;
use std::collections::HashMap;
use std::sync::Arc;

/// Unbeleuchtetes Farbmaterial einer Site.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMaterial {
    pub color: Color,
    /// Vorberechneter Pixelwert (RGBA8).
    pub rgba: [u8; 4],
}

impl ColorMaterial {
    pub fn new(color: Color) -> Self {
        let [r, g, b] = rgb8(color);
        Self {
            color,
            rgba: [r, g, b, 255],
        }
    }
}

/// Teilt Materialien zwischen Sites mit identischer Farbe.
#[derive(Debug, Default)]
pub struct MaterialCache {
    materials: HashMap<[u8; 3], Arc<ColorMaterial>>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(&mut self, color: Color) -> Arc<ColorMaterial> {
        self.materials
            .entry(rgb8(color))
            .or_insert_with(|| Arc::new(ColorMaterial::new(color)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
