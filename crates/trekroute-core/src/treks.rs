//! Trek catalogue files: one record per trek with its anchor and itinerary.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::types::{ItineraryStop, TrekAnchor};
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrekRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryStop>,
}

impl TrekRecord {
    /// The trek's anchor, when both coordinates are present.
    #[must_use]
    pub fn anchor(&self) -> Option<TrekAnchor> {
        Some(TrekAnchor {
            name: self.name.clone(),
            country: self.country.clone(),
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrekFileShape {
    Wrapped { treks: Vec<TrekRecord> },
    Bare(Vec<TrekRecord>),
}

/// Load and validate a trek catalogue.
///
/// `.yaml`/`.yml` files are read as YAML, anything else as JSON. The file may
/// be a bare list of treks or an object with a `treks` list.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_treks(path: &Path) -> Result<Vec<TrekRecord>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TrekFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parse_err = |reason: String| ConfigError::TrekFileParse {
        path: path.display().to_string(),
        reason,
    };

    let shape: TrekFileShape = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?
    };

    let treks = match shape {
        TrekFileShape::Wrapped { treks } | TrekFileShape::Bare(treks) => treks,
    };

    validate_treks(&treks)?;
    Ok(treks)
}

fn validate_treks(treks: &[TrekRecord]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for trek in treks {
        if trek.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "trek '{}' has an empty id",
                trek.name
            )));
        }

        if !seen_ids.insert(trek.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate trek id: '{}'",
                trek.id
            )));
        }

        if let (Some(lat), Some(lng)) = (trek.latitude, trek.longitude) {
            if !Coordinate::new(lat, lng).is_valid() {
                return Err(ConfigError::Validation(format!(
                    "trek '{}' has an invalid anchor ({lat}, {lng})",
                    trek.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TrekRecord {
        TrekRecord {
            id: id.to_string(),
            name: format!("Trek {id}"),
            country: "Nepal".to_string(),
            latitude: Some(28.0),
            longitude: Some(86.9),
            itinerary: Vec::new(),
        }
    }

    #[test]
    fn anchor_requires_both_coordinates() {
        let mut trek = record("ebc");
        assert!(trek.anchor().is_some());
        trek.longitude = None;
        assert!(trek.anchor().is_none());
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let err = validate_treks(&[record("ebc"), record("ebc")]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn empty_id_fails_validation() {
        let err = validate_treks(&[record("  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn invalid_anchor_fails_validation() {
        let mut trek = record("ebc");
        trek.latitude = Some(128.0);
        assert!(validate_treks(&[trek]).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_treks(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TrekFileIo { .. }));
    }
}
