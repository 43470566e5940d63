//! Location payload handling for attendance logs.
//!
//! The check-in form stores the device position as a GeoJSON
//! `FeatureCollection` holding a single `Point` feature, serialized to a
//! string. Only the first feature is read, and GeoJSON's `[longitude,
//! latitude]` order is swapped into [`Coordinates`] fields by name so the
//! rest of the crate never handles raw pairs.
//!
//! Nothing here returns an error: a payload that cannot be read simply has no
//! coordinates, and the log shows up as [`LocationIndicator::Unavailable`].

use serde::Serialize;
use serde_json::Value;

/// Payloads shorter than this (after trimming) carry no position data.
pub const MIN_PAYLOAD_LEN: usize = 10;

const MAP_BASE_URL: &str = "https://www.google.com/maps";

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// External map link centred on this position (`q=lat,lon`).
    pub fn map_link(&self) -> String {
        format!("{}?q={},{}", MAP_BASE_URL, self.latitude, self.longitude)
    }
}

/// Geofencing classification shown on a staff card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationIndicator {
    OnSite,
    OffSite,
    Unavailable,
}

impl std::fmt::Display for LocationIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationIndicator::OnSite => write!(f, "On site"),
            LocationIndicator::OffSite => write!(f, "Off site"),
            LocationIndicator::Unavailable => write!(f, "No GPS"),
        }
    }
}

/// Extracts the first point from a location payload.
///
/// The payload may be the serialized string the form stores or an already
/// decoded JSON object.
pub fn parse_location(payload: &Value) -> Option<Coordinates> {
    match payload {
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.len() < MIN_PAYLOAD_LEN {
                return None;
            }
            let decoded: Value = serde_json::from_str(raw).ok()?;
            match decoded {
                Value::Object(_) => point_from_collection(&decoded),
                _ => None,
            }
        }
        Value::Object(_) => point_from_collection(payload),
        _ => None,
    }
}

fn point_from_collection(collection: &Value) -> Option<Coordinates> {
    let geometry = collection.get("features")?.as_array()?.first()?.get("geometry")?;
    let coordinates = geometry.get("coordinates")?.as_array()?;

    let longitude = coordinates.first()?.as_f64()?;
    let latitude = coordinates.get(1)?.as_f64()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(Coordinates { latitude, longitude })
}

/// Classifies a log from its optional position and proximity flag.
pub fn classify(coordinates: Option<&Coordinates>, is_near_warehouse: bool) -> LocationIndicator {
    match (coordinates, is_near_warehouse) {
        (None, _) => LocationIndicator::Unavailable,
        (Some(_), true) => LocationIndicator::OnSite,
        (Some(_), false) => LocationIndicator::OffSite,
    }
}
