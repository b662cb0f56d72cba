// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f32 = 1e-6;
    pub const EPSILON_SQUARED: f32 = EPSILON * EPSILON; // Für Vergleiche mit Längen
    pub const TAU: f32 = std::f32::consts::TAU;
    pub const PI: f32 = std::f32::consts::PI;
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    use bevy::math::{Quat, Vec2};

    /// Rotation um die z-Achse, die die lokale +y-Achse auf `direction` dreht.
    /// `direction` muss normiert sein.
    pub fn rotation_from_y(direction: Vec2) -> Quat {
        Quat::from_rotation_z((-direction.x).atan2(direction.y))
    }
}

/// Farb-Hilfsfunktionen
pub mod color {
    use bevy::render::color::Color;

    /// Kanonischer Schlüssel einer Farbe (8 Bit pro Kanal, sRGB).
    /// Zwei Farben mit gleichem Schlüssel teilen sich ein Material.
    pub fn rgb8(color: Color) -> [u8; 3] {
        [
            unit_to_u8(color.r()),
            unit_to_u8(color.g()),
            unit_to_u8(color.b()),
        ]
    }

    pub fn unit_to_u8(value: f32) -> u8 {
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::color::Color;

    #[test]
    fn test_rgb8_rounds_and_clamps() {
        assert_eq!(color::rgb8(Color::rgb(1.0, 0.0, 0.5)), [255, 0, 128]);
        assert_eq!(color::unit_to_u8(1.7), 255);
        assert_eq!(color::unit_to_u8(-0.2), 0);
    }

    #[test]
    fn test_rotation_from_y_stays_in_plane() {
        use bevy::math::{Vec2, Vec3};
        for direction in [Vec2::X, -Vec2::X, -Vec2::Y, Vec2::new(0.6, -0.8)] {
            let rotated = angles::rotation_from_y(direction) * Vec3::Y;
            assert!((rotated.truncate() - direction).length() < 1e-5);
            assert!(rotated.z.abs() < 1e-6);
        }
    }
}
