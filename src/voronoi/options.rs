// src/voronoi/options.rs

use crate::math::distance::DistanceMeasure;
use crate::math::error::{VoronoiError, VoronoiResult};
use bevy::log::warn;
use bevy::render::color::Color;
use serde::{Deserialize, Deserializer, Serialize};

/// Facettenzahl der Distanzfeld-Templates (Randpunkte eines Kegels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Precision(u32);

impl Precision {
    pub const MIN: u32 = 3;
    pub const DEFAULT: u32 = 16;

    /// Nachsichtiger Konstruktor: `0` gilt als fehlende Angabe (Default),
    /// Werte unter [`Self::MIN`] werden angehoben.
    pub fn clamped(requested: u32) -> Self {
        match requested {
            0 => Self(Self::DEFAULT),
            n if n < Self::MIN => {
                warn!(
                    "Precision {} is too small for a distance fan, clamping to {}.",
                    n,
                    Self::MIN
                );
                Self(Self::MIN)
            }
            n => Self(n),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Precision {
    type Error = VoronoiError;

    fn try_from(requested: u32) -> VoronoiResult<Self> {
        if requested < Self::MIN {
            return Err(VoronoiError::InvalidPrecision {
                requested,
                minimum: Self::MIN,
            });
        }
        Ok(Self(requested))
    }
}

/// Zeichenfläche, in die gerendert wird. Der Host ändert die Größe und ruft
/// danach `Diagram::resize` auf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Wie groß der Radius der Distanzfelder gewählt wird.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageBound {
    /// `max(width, height)`. Pixel nahe einer entfernten Ecke können außerhalb
    /// aller Distanzfelder liegen und bleiben dann Hintergrund.
    #[default]
    MaxSide,
    /// Diagonale der Zeichenfläche; deckt jeden sichtbaren Pixel ab.
    Diagonal,
}

impl CoverageBound {
    pub fn radius(self, canvas: Canvas) -> f32 {
        let (w, h) = (canvas.width as f32, canvas.height as f32);
        match self {
            Self::MaxSide => w.max(h),
            Self::Diagonal => w.hypot(h),
        }
    }
}

/// Konstruktionsoptionen eines Diagramms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// Bestehende Zeichenfläche; ohne Angabe wird eine mit `width`×`height` erzeugt.
    #[serde(skip)]
    pub canvas: Option<Canvas>,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub precision: u32,
    /// Anfängliche Sichtbarkeit der Marker.
    pub markers: bool,
    pub distance_measure: DistanceMeasure,
    pub coverage: CoverageBound,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            canvas: None,
            width: 500,
            height: 500,
            precision: Precision::DEFAULT,
            markers: true,
            distance_measure: DistanceMeasure::Euclidean,
            coverage: CoverageBound::MaxSide,
        }
    }
}

impl DiagramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_markers(mut self, visible: bool) -> Self {
        self.markers = visible;
        self
    }

    pub fn with_distance_measure(mut self, measure: DistanceMeasure) -> Self {
        self.distance_measure = measure;
        self
    }

    pub fn with_coverage(mut self, coverage: CoverageBound) -> Self {
        self.coverage = coverage;
        self
    }

    /// Ersetzt fehlende (0) Größen durch die Defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.width == 0 {
            self.width = defaults.width;
        }
        if self.height == 0 {
            self.height = defaults.height;
        }
        self
    }

    /// Zeichenfläche, auf die das Diagramm rendert.
    pub fn resolve_canvas(&self) -> Canvas {
        match self.canvas {
            Some(canvas) => canvas,
            None => Canvas::new(self.width, self.height),
        }
    }
}

/// Liest Zahlen auch aus Strings; alles Unlesbare wird zu 0 (= Default).
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Int(u64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match Lenient::deserialize(deserializer)? {
        Lenient::Int(n) => n.min(u32::MAX as u64) as u32,
        Lenient::Float(f) => float_to_u32(f),
        Lenient::Text(text) => text.trim().parse::<f64>().map_or(0, float_to_u32),
        Lenient::Other(_) => 0,
    };
    Ok(value)
}

fn float_to_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Farbangabe einer Site: CSS-artiger String oder normierte Komponenten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteColor {
    Style(String),
    Rgb { r: f32, g: f32, b: f32 },
}

impl SiteColor {
    pub fn to_color(&self) -> Color {
        match self {
            Self::Rgb { r, g, b } => {
                Color::rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
            }
            Self::Style(style) => parse_style(style).unwrap_or_else(|| {
                warn!("Unrecognized color '{}', using white.", style);
                Color::WHITE
            }),
        }
    }
}

impl From<&str> for SiteColor {
    fn from(style: &str) -> Self {
        Self::Style(style.to_string())
    }
}

impl From<String> for SiteColor {
    fn from(style: String) -> Self {
        Self::Style(style)
    }
}

impl From<[f32; 3]> for SiteColor {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::Rgb { r, g, b }
    }
}

impl From<Color> for SiteColor {
    fn from(color: Color) -> Self {
        Self::Rgb {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }
}

fn parse_style(style: &str) -> Option<Color> {
    let style = style.trim().to_ascii_lowercase();

    if style.starts_with('#') {
        return Color::hex(&style).ok();
    }

    if let Some(inner) = style
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let channels = inner
            .split(',')
            .map(|c| c.trim().parse::<f32>().ok())
            .collect::<Option<Vec<_>>>()?;
        if let [r, g, b] = channels[..] {
            return Some(Color::rgb_u8(
                r.clamp(0.0, 255.0) as u8,
                g.clamp(0.0, 255.0) as u8,
                b.clamp(0.0, 255.0) as u8,
            ));
        }
        return None;
    }

    let [r, g, b] = named_color(&style)?;
    Some(Color::rgb_u8(r, g, b))
}

/// CSS-Grundfarben.
fn named_color(name: &str) -> Option<[u8; 3]> {
    let rgb = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "navy" => [0, 0, 128],
        "orange" => [255, 165, 0],
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::utils::color::rgb8;
    use approx::assert_relative_eq;

    #[test]
    fn test_precision_policy() {
        assert_eq!(Precision::clamped(0).get(), Precision::DEFAULT);
        assert_eq!(Precision::clamped(2).get(), Precision::MIN);
        assert_eq!(Precision::clamped(40).get(), 40);
        assert!(Precision::try_from(2).is_err());
        assert_eq!(Precision::try_from(3).unwrap().get(), 3);
    }

    #[test]
    fn test_coverage_radius() {
        let canvas = Canvas::new(300, 400);
        assert_relative_eq!(CoverageBound::MaxSide.radius(canvas), 400.0);
        assert_relative_eq!(CoverageBound::Diagonal.radius(canvas), 500.0);
    }

    #[test]
    fn test_options_defaults_from_empty_json() {
        let options: DiagramOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.width, 500);
        assert_eq!(options.height, 500);
        assert_eq!(options.precision, 16);
        assert!(options.markers);
        assert!(options.distance_measure.is_euclidean());
        assert_eq!(options.coverage, CoverageBound::MaxSide);
    }

    #[test]
    fn test_malformed_numbers_fall_back_to_defaults() {
        let options: DiagramOptions = serde_json::from_str(
            r#"{ "width": "640", "height": "tall", "precision": null, "distance_measure": "manhattan" }"#,
        )
        .unwrap();
        let options = options.sanitized();
        assert_eq!(options.width, 640);
        assert_eq!(options.height, 500);
        assert_eq!(Precision::clamped(options.precision).get(), 16);
        assert_eq!(options.distance_measure, DistanceMeasure::Manhattan);
    }

    #[test]
    fn test_explicit_canvas_wins_over_size() {
        let options = DiagramOptions::new()
            .with_size(10, 10)
            .with_canvas(Canvas::new(800, 600));
        assert_eq!(options.resolve_canvas(), Canvas::new(800, 600));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(rgb8(SiteColor::from("red").to_color()), [255, 0, 0]);
        assert_eq!(rgb8(SiteColor::from("#00f").to_color()), [0, 0, 255]);
        assert_eq!(rgb8(SiteColor::from("#336699").to_color()), [0x33, 0x66, 0x99]);
        assert_eq!(rgb8(SiteColor::from("rgb(10, 20, 30)").to_color()), [10, 20, 30]);
        assert_eq!(rgb8(SiteColor::from([0.0, 1.0, 0.0]).to_color()), [0, 255, 0]);
        assert_eq!(rgb8(SiteColor::from("not-a-color").to_color()), [255, 255, 255]);
    }

    #[test]
    fn test_color_deserializes_from_string_or_object() {
        let style: SiteColor = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(style, SiteColor::Style("blue".to_string()));
        let rgb: SiteColor = serde_json::from_str(r#"{ "r": 1.0, "g": 0.5, "b": 0.0 }"#).unwrap();
        assert_eq!(rgb8(rgb.to_color()), [255, 128, 0]);
    }
}
