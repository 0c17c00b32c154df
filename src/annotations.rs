//! Ground annotations kept next to a project as `annotations.json`.
//!
//! Two entry forms are read back:
//!
//! ```json
//! [
//!     { "lat_deg": 44.88, "lon_deg": -93.22, "alt_m": 256.0, "comment": "tower" },
//!     [44.89, -93.21, 0.0, "hangar"],
//!     [44.90, -93.20, 0.0]
//! ]
//! ```
//!
//! Records carry their own altitude. Bare lists take their height from the ground surface and
//! ignore the stored altitude. Saving always writes records, plus a flat `annotations.csv`.

use crate::{
    error::HudError,
    geodesy::{Lla, NedReference},
    surface::ElevationSource,
    symbols::{GroundMarker, poi::ground_ned},
};
use log::{debug, info};
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const JSON_FILE: &str = "annotations.json";
pub const CSV_FILE: &str = "annotations.csv";

/// Width of a marker icon, in screen pixels.
const ICON_WIDTH_PX: f64 = 12.0;
/// Height of a marker icon above its base, in screen pixels.
const ICON_HEIGHT_PX: f64 = 40.0;
/// Slack around the icon, in metres.
const ICON_SLACK: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    lat_deg: f64,
    lon_deg: f64,
    alt_m: f64,
    #[serde(default)]
    comment: String,
}

// Lists come first: a derived struct would also accept a positional array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum Entry {
    Commented(f64, f64, f64, String),
    Point(f64, f64, f64),
    Record(Record),
}

impl Entry {
    fn to_annotation(
        &self,
        reference: &NedReference,
        surface: &dyn ElevationSource,
    ) -> Result<Annotation, HudError> {
        match self {
            Entry::Record(record) => Ok(Annotation::new(
                reference.lla_to_ned(&Lla::new(record.lat_deg, record.lon_deg, record.alt_m))?,
                record.comment.clone(),
            )),
            Entry::Commented(lat_deg, lon_deg, _, comment) => Ok(Annotation::new(
                ground_ned(reference, *lat_deg, *lon_deg, None, surface)?,
                comment.clone(),
            )),
            Entry::Point(lat_deg, lon_deg, _) => Ok(Annotation::new(
                ground_ned(reference, *lat_deg, *lon_deg, None, surface)?,
                String::new(),
            )),
        }
    }
}

/// A comment pinned to a point on the ground.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub ned: Vector3<f64>,
    pub comment: String,
}

impl Annotation {
    pub fn new(ned: Vector3<f64>, comment: impl Into<String>) -> Self {
        Self {
            ned,
            comment: comment.into(),
        }
    }
}

/// The on-screen size of a marker icon in a top-down map view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconFootprint {
    /// Metres of ground spanned by the window height.
    pub view_size: f64,
    /// Window height in pixels.
    pub window_height: u32,
}

impl IconFootprint {
    fn meters_per_pixel(&self) -> f64 {
        self.view_size / self.window_height as f64
    }

    /// Icon width, in metres.
    pub fn width(&self) -> f64 {
        ICON_WIDTH_PX * self.meters_per_pixel()
    }

    /// Icon height, in metres.
    pub fn height(&self) -> f64 {
        ICON_HEIGHT_PX * self.meters_per_pixel()
    }

    /// Whether a ground position falls on the icon standing at `ned`.
    pub fn covers(&self, ned: &Vector3<f64>, east: f64, north: f64) -> bool {
        (east - ned.y).abs() <= self.width() * 0.5 + ICON_SLACK
            && north >= ned.x - ICON_SLACK
            && north <= ned.x + self.height() + ICON_SLACK
    }
}

/// The annotations of one project, relative to the session reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotations {
    reference: NedReference,
    markers: Vec<Annotation>,
}

impl Annotations {
    pub fn new(reference: NedReference) -> Self {
        Self {
            reference,
            markers: Vec::new(),
        }
    }

    /// Reads `annotations.json` from `dir`. A missing file is an empty set.
    pub fn load(
        dir: impl AsRef<Path>,
        reference: NedReference,
        surface: &dyn ElevationSource,
    ) -> Result<Self, HudError> {
        let path = dir.as_ref().join(JSON_FILE);
        if !path.exists() {
            debug!("no annotations at {}", path.display());
            return Ok(Self::new(reference));
        }

        let entries: Vec<Entry> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let markers = entries
            .par_iter()
            .map(|entry| entry.to_annotation(&reference, surface))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "loaded {} annotations from {}",
            markers.len(),
            path.display()
        );

        Ok(Self { reference, markers })
    }

    /// Writes `annotations.json` and `annotations.csv` into `dir`.
    ///
    /// Returns the path of the JSON file.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, HudError> {
        let dir = dir.as_ref();
        let records: Vec<Record> = self
            .markers
            .iter()
            .map(|marker| {
                let lla = self.reference.ned_to_lla(&marker.ned);
                Record {
                    lat_deg: lla.lat_deg,
                    lon_deg: lla.lon_deg,
                    alt_m: (lla.alt_m * 100.0).round() / 100.0,
                    comment: marker.comment.clone(),
                }
            })
            .collect();

        let json_path = dir.join(JSON_FILE);
        fs::write(&json_path, serde_json::to_string_pretty(&records)?)?;

        let mut csv = String::from("lat_deg,lon_deg,alt_m,comment\n");
        for record in &records {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                record.lat_deg,
                record.lon_deg,
                record.alt_m,
                csv_field(&record.comment)
            ));
        }
        fs::write(dir.join(CSV_FILE), csv)?;

        info!(
            "saved {} annotations to {}",
            records.len(),
            json_path.display()
        );

        Ok(json_path)
    }

    pub fn reference(&self) -> &NedReference {
        &self.reference
    }

    pub fn markers(&self) -> &[Annotation] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Returns the index of the new marker.
    pub fn add(&mut self, ned: Vector3<f64>, comment: impl Into<String>) -> usize {
        self.markers.push(Annotation::new(ned, comment));
        self.markers.len() - 1
    }

    /// Replaces a comment. Returns false if there is no marker at `index`.
    pub fn edit(&mut self, index: usize, comment: impl Into<String>) -> bool {
        match self.markers.get_mut(index) {
            Some(marker) => {
                marker.comment = comment.into();
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, index: usize) -> Option<Annotation> {
        (index < self.markers.len()).then(|| self.markers.remove(index))
    }

    /// Finds the marker whose icon covers a ground position. Later markers draw on top, so they
    /// win.
    pub fn hit_test(&self, east: f64, north: f64, footprint: IconFootprint) -> Option<usize> {
        self.markers
            .iter()
            .rposition(|marker| footprint.covers(&marker.ned, east, north))
    }

    /// The markers as HUD ground markers, labelled by their comments.
    pub fn ground_markers(&self) -> Vec<GroundMarker> {
        self.markers
            .iter()
            .map(|marker| GroundMarker::new(marker.comment.clone(), marker.ned))
            .collect()
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NoSurface;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn reference() -> NedReference {
        NedReference::new(Lla::new(44.882, -93.221802, 256.0)).expect("valid reference")
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a, b", "\"a, b\"")]
    #[case("say \"hi\"", "\"say \"\"hi\"\"\"")]
    fn csv_escaping(#[case] field: &str, #[case] expected: &str) {
        assert_eq!(csv_field(field), expected);
    }

    #[test]
    fn entries_parse_in_every_form() {
        let entries: Vec<Entry> = serde_json::from_str(
            r#"[
                {"lat_deg": 1.0, "lon_deg": 2.0, "alt_m": 3.0, "comment": "c"},
                {"lat_deg": 1.0, "lon_deg": 2.0, "alt_m": 3.0},
                [1.0, 2.0, 3.0, "d"],
                [1.0, 2.0, 3.0]
            ]"#,
        )
        .unwrap();

        assert!(matches!(&entries[0], Entry::Record(r) if r.comment == "c"));
        assert!(matches!(&entries[1], Entry::Record(r) if r.comment.is_empty()));
        assert!(matches!(&entries[2], Entry::Commented(_, _, _, c) if c == "d"));
        assert!(matches!(entries[3], Entry::Point(..)));
    }

    #[test]
    fn edit_and_delete() {
        let mut annotations = Annotations::new(reference());
        let first = annotations.add(Vector3::new(10.0, 0.0, 0.0), "first");
        let second = annotations.add(Vector3::new(20.0, 0.0, 0.0), "second");

        assert!(annotations.edit(first, "renamed"));
        assert!(!annotations.edit(7, "missing"));
        assert_eq!(annotations.markers()[0].comment, "renamed");

        assert_eq!(
            annotations.delete(second).map(|a| a.comment),
            Some("second".to_string())
        );
        assert_eq!(annotations.delete(second), None);
        assert_eq!(annotations.len(), 1);
    }

    #[test]
    fn footprint_scales_with_zoom() {
        let footprint = IconFootprint {
            view_size: 500.0,
            window_height: 1000,
        };
        assert_relative_eq!(footprint.width(), 6.0);
        assert_relative_eq!(footprint.height(), 20.0);
    }

    #[rstest]
    #[case(0.0, 0.0, Some(1))]
    #[case(3.9, 20.9, Some(1))]
    #[case(-3.9, -0.9, Some(1))]
    #[case(4.1, 10.0, None)]
    #[case(0.0, 21.1, None)]
    #[case(0.0, -1.1, None)]
    #[case(100.0, 105.0, Some(2))]
    fn hit_test_follows_icon(
        #[case] east: f64,
        #[case] north: f64,
        #[case] expected: Option<usize>,
    ) {
        let mut annotations = Annotations::new(reference());
        annotations.add(Vector3::new(0.0, 0.0, 0.0), "under");
        annotations.add(Vector3::new(0.0, 0.0, 0.0), "over");
        annotations.add(Vector3::new(100.0, 100.0, 0.0), "apart");

        let footprint = IconFootprint {
            view_size: 500.0,
            window_height: 1000,
        };
        assert_eq!(annotations.hit_test(east, north, footprint), expected);
    }

    #[test]
    fn ground_markers_use_comments() {
        let mut annotations = Annotations::new(reference());
        annotations.add(Vector3::new(1.0, 2.0, 3.0), "tower");

        assert_eq!(
            annotations.ground_markers(),
            vec![GroundMarker::new("tower", Vector3::new(1.0, 2.0, 3.0))]
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = std::env::temp_dir().join("aerohud-annotations-missing");
        let annotations = Annotations::load(&dir, reference(), &NoSurface).unwrap();
        assert!(annotations.is_empty());
    }
}
