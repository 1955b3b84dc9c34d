use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidRotation, ValidationError};

pub type RoomId = u64;
pub type FurnitureId = u64;
pub type DesignId = u64;

/// A room as stored by the backend. Dimensions are in feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub width: f64,
    pub depth: f64,
}

/// Body of a room creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub width: f64,
    pub depth: f64,
}

impl NewRoom {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingRoomName);
        }
        check_dimension("width", self.width)?;
        check_dimension("depth", self.depth)?;
        Ok(())
    }
}

fn check_dimension(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidDimension { field, value })
    }
}

/// Furniture category. Unknown categories from the backend map to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureKind {
    Sofa,
    Table,
    Bed,
    Chair,
    Storage,
    #[default]
    #[serde(other)]
    Other,
}

impl FurnitureKind {
    pub const ALL: [FurnitureKind; 6] = [
        FurnitureKind::Sofa,
        FurnitureKind::Table,
        FurnitureKind::Bed,
        FurnitureKind::Chair,
        FurnitureKind::Storage,
        FurnitureKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FurnitureKind::Sofa => "sofa",
            FurnitureKind::Table => "table",
            FurnitureKind::Bed => "bed",
            FurnitureKind::Chair => "chair",
            FurnitureKind::Storage => "storage",
            FurnitureKind::Other => "other",
        }
    }
}

impl FromStr for FurnitureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FurnitureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown furniture type: {}", s))
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureTemplate {
    pub id: FurnitureId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FurnitureKind,
    pub width: f64,
    pub depth: f64,
}

impl FurnitureTemplate {
    /// Floor area in square feet.
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }
}

/// Room-relative position in feet. Never clamped to the room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Quarter-turn rotation. Serialized as whole degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Normalizes any multiple of 90 into `[0, 360)`.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            _ => Some(Rotation::Deg270),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Advances by 90 degrees, wrapping at 360.
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// True at 90 and 270, where width and depth trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<f64> for Rotation {
    type Error = InvalidRotation;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
            return Err(InvalidRotation(value));
        }
        Rotation::from_degrees(value as i64).ok_or(InvalidRotation(value))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Rotation-adjusted floor rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f64,
    pub depth: f64,
}

impl Footprint {
    pub fn of(template: &FurnitureTemplate, rotation: Rotation) -> Self {
        if rotation.swaps_axes() {
            Self {
                width: template.depth,
                depth: template.width,
            }
        } else {
            Self {
                width: template.width,
                depth: template.depth,
            }
        }
    }
}

/// Session-local identity of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(pub(crate) u64);

impl PlacementId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One template instance positioned inside the current room.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFurniture {
    pub id: PlacementId,
    pub template: Arc<FurnitureTemplate>,
    pub position: Position,
    pub rotation: Rotation,
}

impl PlacedFurniture {
    pub fn furniture_id(&self) -> FurnitureId {
        self.template.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::of(&self.template, self.rotation)
    }

    /// The flat tuple sent to the fitness and save endpoints.
    pub fn to_design_item(&self) -> DesignItem {
        DesignItem {
            furniture_id: self.template.id,
            position_x: self.position.x,
            position_y: self.position.y,
            rotation: self.rotation,
        }
    }
}

/// Per-placement outcome of a fitness check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    pub furniture_id: FurnitureId,
    #[serde(default)]
    pub furniture_name: String,
    pub fits: bool,
    #[serde(default)]
    pub collisions: Vec<String>,
    pub adequate_space: bool,
    pub walking_space_x: f64,
    pub walking_space_y: f64,
    pub message: String,
}

impl FitnessResult {
    /// Fits and overlaps nothing.
    pub fn is_clear(&self) -> bool {
        self.fits && self.collisions.is_empty()
    }
}

/// Response of `POST /check-multiple-fitness`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub all_fits: bool,
    #[serde(default)]
    pub overall_message: String,
    pub results: Vec<FitnessResult>,
}

/// Flat placement tuple as persisted in a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignItem {
    pub furniture_id: FurnitureId,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: Rotation,
}

impl DesignItem {
    pub fn position(&self) -> Position {
        Position::new(self.position_x, self.position_y)
    }
}

/// A named, persisted snapshot of a room layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub id: DesignId,
    pub name: String,
    pub room_id: RoomId,
    #[serde(default)]
    pub furniture_items: Vec<DesignItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Design {
    /// Creation time, accepting RFC 3339, a naive date-time (taken as UTC) or
    /// a bare date.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(ts.and_utc());
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(ts.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|ts| ts.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa() -> FurnitureTemplate {
        FurnitureTemplate {
            id: 1,
            name: "Sofa".to_string(),
            kind: FurnitureKind::Sofa,
            width: 7.0,
            depth: 3.0,
        }
    }

    #[test]
    fn rotation_normalizes_multiples_of_ninety() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(720), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn rotation_next_wraps() {
        assert_eq!(Rotation::Deg270.next(), Rotation::Deg0);
        let mut r = Rotation::Deg90;
        for _ in 0..4 {
            r = r.next();
        }
        assert_eq!(r, Rotation::Deg90);
    }

    #[test]
    fn rotation_serde_uses_degrees() {
        let json = serde_json::to_string(&Rotation::Deg180).unwrap();
        assert_eq!(json, "180");

        let parsed: Rotation = serde_json::from_str("270.0").unwrap();
        assert_eq!(parsed, Rotation::Deg270);

        assert!(serde_json::from_str::<Rotation>("30").is_err());
        assert!(serde_json::from_str::<Rotation>("90.5").is_err());
    }

    #[test]
    fn footprint_swaps_on_quarter_turns() {
        let t = sofa();
        assert_eq!(Footprint::of(&t, Rotation::Deg0), Footprint { width: 7.0, depth: 3.0 });
        assert_eq!(Footprint::of(&t, Rotation::Deg90), Footprint { width: 3.0, depth: 7.0 });
        assert_eq!(Footprint::of(&t, Rotation::Deg180), Footprint { width: 7.0, depth: 3.0 });
        assert_eq!(Footprint::of(&t, Rotation::Deg270), Footprint { width: 3.0, depth: 7.0 });
    }

    #[test]
    fn unknown_furniture_type_is_other() {
        let t: FurnitureTemplate = serde_json::from_str(
            r#"{"id": 9, "name": "Lamp", "type": "lighting", "width": 1, "depth": 1}"#,
        )
        .unwrap();
        assert_eq!(t.kind, FurnitureKind::Other);
        assert_eq!("Bed".parse::<FurnitureKind>(), Ok(FurnitureKind::Bed));
    }

    #[test]
    fn new_room_validation() {
        let ok = NewRoom {
            name: "Den".to_string(),
            width: 12.0,
            depth: 10.0,
        };
        assert!(ok.validate().is_ok());

        let blank = NewRoom {
            name: "  ".to_string(),
            ..ok.clone()
        };
        assert_eq!(blank.validate(), Err(ValidationError::MissingRoomName));

        let flat = NewRoom { depth: 0.0, ..ok };
        assert!(matches!(
            flat.validate(),
            Err(ValidationError::InvalidDimension { field: "depth", .. })
        ));
    }

    #[test]
    fn fitness_result_clear_requires_no_collisions() {
        let mut result: FitnessResult = serde_json::from_str(
            r#"{"furniture_id": 1, "fits": true, "adequate_space": true,
                "walking_space_x": 3.0, "walking_space_y": 2.5, "message": "ok"}"#,
        )
        .unwrap();
        assert!(result.is_clear());

        result.collisions.push("Table".to_string());
        assert!(!result.is_clear());
    }

    #[test]
    fn design_timestamp_formats() {
        let mut design = Design {
            id: 1,
            name: "Cozy".to_string(),
            room_id: 1,
            furniture_items: vec![],
            created_at: Some("2024-03-05T10:20:30Z".to_string()),
        };
        assert!(design.created_at().is_some());

        design.created_at = Some("2024-03-05T10:20:30.123456".to_string());
        assert!(design.created_at().is_some());

        design.created_at = Some("2024-03-05".to_string());
        assert!(design.created_at().is_some());

        design.created_at = Some("yesterday".to_string());
        assert!(design.created_at().is_none());
    }
}
