// src/math/distance.rs

use bevy::log::warn;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signatur einer frei definierbaren 2D-Distanzfunktion.
pub type MeasureFn = dyn Fn(Vec2, Vec2) -> f32 + Send + Sync;

/// Distanzmaß, mit dem die Distanzfelder der Punkt-Sites erzeugt werden.
///
/// Alle Maße werden als positiv homogen angenommen (`d(0, s·p) = s·d(0, p)`),
/// damit ein Template mit Einheitsradius auf `maxDistance` skaliert werden kann.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DistanceMeasure {
    /// Euklidische Distanz. Wird geometrisch als Kegel erzeugt.
    #[default]
    Euclidean,
    /// L1-Distanz (Isolinien sind Rauten).
    Manhattan,
    /// Beliebige Funktion, identifiziert über ihren Namen.
    Custom { name: String, function: Arc<MeasureFn> },
}

/// Strukturierter Cache-Schlüssel eines Distanzmaßes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeasureKey {
    Euclidean,
    Manhattan,
    Custom(String),
}

impl DistanceMeasure {
    pub fn custom<S, F>(name: S, function: F) -> Self
    where
        S: Into<String>,
        F: Fn(Vec2, Vec2) -> f32 + Send + Sync + 'static,
    {
        Self::Custom {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        match self {
            Self::Euclidean => a.distance(b),
            Self::Manhattan => (a.x - b.x).abs() + (a.y - b.y).abs(),
            Self::Custom { function, .. } => function(a, b),
        }
    }

    pub fn key(&self) -> MeasureKey {
        match self {
            Self::Euclidean => MeasureKey::Euclidean,
            Self::Manhattan => MeasureKey::Manhattan,
            Self::Custom { name, .. } => MeasureKey::Custom(name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Custom { name, .. } => name,
        }
    }

    pub fn is_euclidean(&self) -> bool {
        matches!(self, Self::Euclidean)
    }

    /// Löst einen Namen auf. Ein unbekannter Name liefert keine eigene
    /// Funktion; er wird als benanntes Maß mit euklidischer Auswertung
    /// übernommen und läuft damit wie jedes [`Self::Custom`] über den pro
    /// Randpunkt ausgewerteten Fächer.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Self::Euclidean,
            "manhattan" => Self::Manhattan,
            other => {
                warn!(
                    "Unknown distance measure '{}', evaluating it per vertex with euclidean distance.",
                    other
                );
                Self::custom(other, |a: Vec2, b: Vec2| a.distance(b))
            }
        }
    }
}

impl fmt::Debug for DistanceMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl PartialEq for DistanceMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl From<String> for DistanceMeasure {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<DistanceMeasure> for String {
    fn from(measure: DistanceMeasure) -> Self {
        measure.name().to_string()
    }
}
