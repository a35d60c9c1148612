//! Sighting payloads and their canonical, UI-facing form.
//!
//! The service returns sightings in two shapes: with the fish data nested
//! under `fish`, or with the fish fields flattened onto the sighting itself.
//! [`FishShape`] settles which one an entry is, once, and every field of
//! [`CanonicalCatch`] is read through an ordered list of [`Source`]s.

use crate::resolve::ImageResolver;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// One backend sighting, kept exactly as received.
pub type RawSighting = Value;

static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// Where the fish fields of a sighting live.
#[derive(Debug, Clone, Copy)]
pub enum FishShape<'a> {
    Nested {
        sighting: &'a Map<String, Value>,
        fish: &'a Map<String, Value>,
    },
    Flat(&'a Map<String, Value>),
}

/// A field location, looked up on the sighting or on its fish object.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Sighting(&'static str),
    Fish(&'static str),
}

use Source::{Fish, Sighting};

const ID_SOURCES: &[Source] = &[Sighting("fishId"), Fish("_id"), Sighting("_id")];
const IMAGE_SOURCES: &[Source] = &[Sighting("imageUrl"), Fish("imageUrl")];
const CREATED_AT_SOURCES: &[Source] = &[
    Fish("createdAt"),
    Sighting("timestamp"),
    Sighting("createdAt"),
];

impl<'a> FishShape<'a> {
    pub fn of(entry: &'a RawSighting) -> Self {
        let Some(sighting) = entry.as_object() else {
            return FishShape::Flat(&EMPTY);
        };
        match sighting.get("fish").and_then(Value::as_object) {
            Some(fish) => FishShape::Nested { sighting, fish },
            None => FishShape::Flat(sighting),
        }
    }

    pub fn sighting(&self) -> &'a Map<String, Value> {
        match *self {
            FishShape::Nested { sighting, .. } => sighting,
            FishShape::Flat(map) => map,
        }
    }

    pub fn fish(&self) -> &'a Map<String, Value> {
        match *self {
            FishShape::Nested { fish, .. } => fish,
            FishShape::Flat(map) => map,
        }
    }

    fn get(&self, source: Source) -> Option<&'a Value> {
        match source {
            Sighting(key) => self.sighting().get(key),
            Fish(key) => self.fish().get(key),
        }
    }

    /// First non-empty text value among `sources`.
    pub fn first_text(&self, sources: &[Source]) -> Option<String> {
        sources.iter().find_map(|&source| self.get(source).and_then(as_text))
    }

    pub fn number(&self, source: Source) -> Option<f64> {
        self.get(source).and_then(as_number)
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The stable record handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCatch {
    pub id: String,
    pub name: String,
    pub family: String,
    pub water_type: String,
    pub region: String,
    pub environment: String,
    pub conservation_status: String,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub depth_range_min: Option<f64>,
    pub depth_range_max: Option<f64>,
    pub ai_accuracy: Option<f64>,
    pub created_at: String,
    pub image_url: String,
    pub raw: RawSighting,
}

impl CanonicalCatch {
    /// Size span as shown on the details page, e.g. `12-30cm`.
    pub fn size_range(&self) -> String {
        format_range(self.min_size, self.max_size, "cm")
    }

    pub fn depth_range(&self) -> String {
        format_range(self.depth_range_min, self.depth_range_max, "m")
    }

    pub fn accuracy_label(&self) -> String {
        match self.ai_accuracy {
            Some(accuracy) => format!("{}%", accuracy),
            None => "-".to_string(),
        }
    }
}

fn format_range(min: Option<f64>, max: Option<f64>, unit: &str) -> String {
    match (min, max) {
        (None, None) => "-".to_string(),
        (Some(min), Some(max)) => format!("{}-{}{}", min, max, unit),
        (Some(min), None) => format!("{}-{}", min, unit),
        (None, Some(max)) => format!("{}{}", max, unit),
    }
}

/// Extract the list of sightings from a `GET /fish/{deviceId}` payload.
///
/// Accepts a bare array or an object with a `data` array; anything else
/// yields an empty list.
pub fn normalize_list(payload: Value) -> Vec<RawSighting> {
    match payload {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Map one sighting to its canonical form. Total over any JSON input.
pub fn to_canonical(entry: RawSighting, resolver: &ImageResolver) -> CanonicalCatch {
    let shape = FishShape::of(&entry);
    let text = |key: &'static str| shape.first_text(&[Fish(key)]).unwrap_or_default();
    let image = shape.first_text(IMAGE_SOURCES).unwrap_or_default();

    CanonicalCatch {
        id: shape.first_text(ID_SOURCES).unwrap_or_default(),
        name: shape
            .first_text(&[Fish("name")])
            .unwrap_or_else(|| "Unknown".to_string()),
        family: text("family"),
        water_type: text("waterType"),
        region: text("region"),
        environment: text("environment"),
        conservation_status: text("conservationStatus"),
        min_size: shape.number(Fish("minSize")),
        max_size: shape.number(Fish("maxSize")),
        depth_range_min: shape.number(Fish("depthRangeMin")),
        depth_range_max: shape.number(Fish("depthRangeMax")),
        ai_accuracy: shape.number(Fish("aiAccuracy")),
        created_at: shape.first_text(CREATED_AT_SOURCES).unwrap_or_default(),
        image_url: if image.is_empty() {
            String::new()
        } else {
            resolver.resolve(&image)
        },
        raw: entry,
    }
}

/// Normalize a whole list payload into canonical catches.
pub fn to_catches(payload: Value, resolver: &ImageResolver) -> Vec<CanonicalCatch> {
    let entries = normalize_list(payload);
    debug!("Normalizing {} sightings", entries.len());
    entries
        .into_iter()
        .map(|entry| to_canonical(entry, resolver))
        .collect()
}
