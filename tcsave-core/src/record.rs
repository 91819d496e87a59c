//! Serde views of the codec's structured records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CircuitError;
use crate::gate::{Gate, GateId};
use crate::geometry::{Point, Rotation};
use crate::wire::{Wire, WireId};

/// Placeholder written for score fields unless the caller opts into storing scores.
pub const SCORE_SENTINEL: u64 = 99_999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub kind: String,
    pub position: Point,
    pub rotation: Rotation,
    pub permanent_id: GateId,
    pub custom_string: String,
    pub custom_id: i64,
    pub program_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<ComponentRecord> for Gate {
    fn from(record: ComponentRecord) -> Self {
        Gate {
            kind: record.kind,
            position: record.position,
            rotation: record.rotation,
            id: record.permanent_id,
            custom_data: record.custom_string,
            custom_id: record.custom_id,
            program_name: record.program_name,
            extra: record.extra,
        }
    }
}

impl From<&Gate> for ComponentRecord {
    fn from(gate: &Gate) -> Self {
        ComponentRecord {
            kind: gate.kind.clone(),
            position: gate.position,
            rotation: gate.rotation,
            permanent_id: gate.id,
            custom_string: gate.custom_data.clone(),
            custom_id: gate.custom_id,
            program_name: gate.program_name.clone(),
            extra: gate.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub permanent_id: WireId,
    pub path: Vec<Point>,
    pub kind: String,
    pub color: u8,
    pub comment: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TryFrom<WireRecord> for Wire {
    type Error = CircuitError;

    fn try_from(record: WireRecord) -> Result<Self, Self::Error> {
        Ok(Wire {
            id: record.permanent_id,
            kind: record.kind.parse()?,
            color: record.color,
            label: record.comment,
            positions: record.path,
            extra: record.extra,
        })
    }
}

impl From<&Wire> for WireRecord {
    fn from(wire: &Wire) -> Self {
        WireRecord {
            permanent_id: wire.id,
            path: wire.positions.clone(),
            kind: wire.kind.tag().to_string(),
            color: wire.color,
            comment: wire.label.clone(),
            extra: wire.extra.clone(),
        }
    }
}

/// Save-level fields carried through a round trip without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Gate-count score.
    pub nand: u64,
    /// Delay score.
    pub delay: u64,
    pub save_version: i64,
    pub menu_visible: bool,
    pub clock_speed: u64,
    pub nesting_level: u32,
    pub description: String,
    pub unpacked: bool,
    pub camera_position: Point,
}

impl Default for SaveMetadata {
    fn default() -> Self {
        Self {
            nand: SCORE_SENTINEL,
            delay: SCORE_SENTINEL,
            save_version: 0,
            menu_visible: true,
            clock_speed: 100,
            nesting_level: 1,
            description: String::new(),
            unpacked: false,
            camera_position: Point::ORIGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_record_keeps_unknown_fields() {
        let value = json!({
            "kind": "Nand",
            "position": {"x": 3, "y": -2},
            "rotation": 1,
            "permanent_id": 12,
            "custom_string": "",
            "custom_id": 0,
            "program_name": "",
            "selected_programs": {"a": 1}
        });
        let record: ComponentRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(record.position, Point::new(3, -2));
        assert_eq!(record.rotation, Rotation::R90);
        assert!(record.extra.contains_key("selected_programs"));

        let gate = Gate::from(record);
        let back = serde_json::to_value(ComponentRecord::from(&gate)).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_wire_record_rejects_unknown_kind() {
        let record: WireRecord = serde_json::from_value(json!({
            "permanent_id": 1,
            "path": [{"x": 0, "y": 0}],
            "kind": "ck_word",
            "color": 0,
            "comment": ""
        }))
        .unwrap();
        let err = Wire::try_from(record).unwrap_err();
        assert!(matches!(err, CircuitError::UnknownWireKind(_)));
    }

    #[test]
    fn test_wire_record_maps_label() {
        let record: WireRecord = serde_json::from_value(json!({
            "permanent_id": 4,
            "path": [{"x": 0, "y": 0}, {"x": 0, "y": 3}],
            "kind": "ck_byte",
            "color": 2,
            "comment": "data bus"
        }))
        .unwrap();
        let wire = Wire::try_from(record).unwrap();
        assert_eq!(wire.label, "data bus");
        assert_eq!(wire.positions.len(), 2);
        assert_eq!(wire.is_byte(), Ok(true));
    }

    #[test]
    fn test_component_record_rejects_out_of_range_rotation() {
        let err = serde_json::from_value::<ComponentRecord>(json!({
            "kind": "Nand",
            "position": {"x": 0, "y": 0},
            "rotation": 5,
            "permanent_id": 1,
            "custom_string": "",
            "custom_id": 0,
            "program_name": ""
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Rotation 5"));
    }

    #[test]
    fn test_records_require_every_field() {
        // nothing the encoder would have to invent is accepted
        let wire = json!({
            "permanent_id": 1,
            "path": [{"x": 0, "y": 0}, {"x": 3, "y": 0}],
            "kind": "ck_bit"
        });
        let err = serde_json::from_value::<WireRecord>(wire).unwrap_err();
        assert!(err.to_string().contains("missing field"));

        let component = json!({
            "kind": "Nand",
            "position": {"x": 0, "y": 0},
            "rotation": 0,
            "permanent_id": 1
        });
        let err = serde_json::from_value::<ComponentRecord>(component).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_wire_record_round_trips_unchanged() {
        let value = json!({
            "permanent_id": 1,
            "path": [{"x": 0, "y": 0}, {"x": 3, "y": 0}],
            "kind": "ck_bit",
            "color": 0,
            "comment": "",
            "width_hint": 1
        });
        let record: WireRecord = serde_json::from_value(value.clone()).unwrap();
        let wire = Wire::try_from(record).unwrap();
        assert_eq!(serde_json::to_value(WireRecord::from(&wire)).unwrap(), value);
    }

    #[test]
    fn test_metadata_requires_every_field() {
        let err = serde_json::from_value::<SaveMetadata>(json!({"nand": 5})).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }
}
