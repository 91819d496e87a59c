use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{SaveCodec, SaveRecord, COMPONENTS_KEY, WIRES_KEY};
use crate::connectivity::Connections;
use crate::error::{CircuitError, ShapeError};
use crate::gate::{Gate, GateId};
use crate::geometry::{Extent, Point, Rect, Rotation};
use crate::record::{ComponentRecord, SaveMetadata, WireRecord, SCORE_SENTINEL};
use crate::shape::{GateShape, ShapeRegistry};
use crate::wire::{Wire, WireId, WireKind};

/// Optional gate fields for [`Circuit::add_gate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateFields {
    pub custom_data: String,
    pub custom_id: i64,
    pub program_name: String,
}

/// Optional wire fields for [`Circuit::add_wire`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireFields {
    pub color: u8,
    pub label: String,
}

/// A decoded save: placed gates, wires and save-level metadata.
///
/// The decoded record is kept as a base document. Encoding overlays the
/// interpreted fields on a copy of it, so keys this model does not know about
/// survive a decode, mutate, encode cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub gates: Vec<Gate>,
    pub wires: Vec<Wire>,
    pub metadata: SaveMetadata,
    /// Write real `nand`/`delay` scores instead of [`SCORE_SENTINEL`].
    pub store_score: bool,
    /// Footprint of this circuit when it is used as a custom component.
    pub shape: Option<GateShape>,
    base: Value,
    last_gate_id: GateId,
    last_wire_id: WireId,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self {
            gates: Vec::new(),
            wires: Vec::new(),
            metadata: SaveMetadata::default(),
            store_score: false,
            shape: None,
            base: Value::Object(Map::new()),
            last_gate_id: 0,
            last_wire_id: 0,
        }
    }

    // ── Decode / encode ──────────────────────────────────────────────

    /// Decode `bytes` with `codec` and build the circuit.
    pub fn parse<C: SaveCodec>(bytes: &[u8], codec: &C) -> Result<Self, CircuitError> {
        let record = codec
            .decode(bytes)
            .map_err(|e| CircuitError::Codec(Box::new(e)))?;
        Self::from_record(record, |kind| codec.is_virtual(kind))
    }

    /// Build a circuit from a structured record, dropping components for which
    /// `is_virtual` holds.
    pub fn from_record<F>(record: SaveRecord, is_virtual: F) -> Result<Self, CircuitError>
    where
        F: Fn(&str) -> bool,
    {
        let base = Value::Object(record);

        let components = base
            .get(COMPONENTS_KEY)
            .ok_or(CircuitError::MissingField(COMPONENTS_KEY))?;
        let components = Vec::<ComponentRecord>::deserialize(components)?;
        let wires = base
            .get(WIRES_KEY)
            .ok_or(CircuitError::MissingField(WIRES_KEY))?;
        let wires = Vec::<WireRecord>::deserialize(wires)?;
        let metadata = SaveMetadata::deserialize(&base)?;

        let total = components.len();
        let gates: Vec<Gate> = components
            .into_iter()
            .filter(|c| !is_virtual(&c.kind))
            .map(Gate::from)
            .collect();
        let wires = wires
            .into_iter()
            .map(Wire::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Decoded circuit: {} gates ({} virtual dropped), {} wires",
            gates.len(),
            total - gates.len(),
            wires.len()
        );

        let last_gate_id = gates.iter().map(|g| g.id).max().unwrap_or(0);
        let last_wire_id = wires.iter().map(|w| w.id).max().unwrap_or(0);
        Ok(Self {
            gates,
            wires,
            metadata,
            store_score: false,
            shape: None,
            base,
            last_gate_id,
            last_wire_id,
        })
    }

    /// Structured record for the codec: the base document with the current
    /// gates, wires and metadata laid over it.
    pub fn to_record(&self) -> Result<SaveRecord, CircuitError> {
        let mut record = match &self.base {
            Value::Object(fields) => fields.clone(),
            _ => SaveRecord::new(),
        };

        let components: Vec<ComponentRecord> = self.gates.iter().map(ComponentRecord::from).collect();
        let wires: Vec<WireRecord> = self.wires.iter().map(WireRecord::from).collect();
        record.insert(COMPONENTS_KEY.to_string(), serde_json::to_value(components)?);
        record.insert(WIRES_KEY.to_string(), serde_json::to_value(wires)?);

        if let Value::Object(fields) = serde_json::to_value(&self.metadata)? {
            record.extend(fields);
        }
        if !self.store_score {
            record.insert("nand".to_string(), SCORE_SENTINEL.into());
            record.insert("delay".to_string(), SCORE_SENTINEL.into());
        }
        Ok(record)
    }

    /// Encode with `codec`.
    pub fn serialize<C: SaveCodec>(&self, codec: &C) -> Result<Vec<u8>, CircuitError> {
        let record = self.to_record()?;
        let bytes = codec
            .encode(&record)
            .map_err(|e| CircuitError::Codec(Box::new(e)))?;
        log::debug!(
            "Encoded circuit: {} gates, {} wires, {} bytes (scores {})",
            self.gates.len(),
            self.wires.len(),
            bytes.len(),
            if self.store_score { "stored" } else { "withheld" }
        );
        Ok(bytes)
    }

    /// A field of the decoded record, interpreted or not.
    pub fn raw_field(&self, key: &str) -> Option<&Value> {
        self.base.get(key)
    }

    // ── Gates ────────────────────────────────────────────────────────

    /// Place a new gate with the next unused id.
    pub fn add_gate(
        &mut self,
        kind: &str,
        position: Point,
        rotation: Rotation,
        fields: GateFields,
    ) -> &mut Gate {
        let id = self.gates.iter().map(|g| g.id).fold(self.last_gate_id, u64::max) + 1;
        self.last_gate_id = id;

        let mut gate = Gate::new(id, kind, position, rotation);
        gate.custom_data = fields.custom_data;
        gate.custom_id = fields.custom_id;
        gate.program_name = fields.program_name;

        let index = self.gates.len();
        self.gates.push(gate);
        &mut self.gates[index]
    }

    pub fn remove_gate(&mut self, id: GateId) -> Option<Gate> {
        let index = self.gates.iter().position(|g| g.id == id)?;
        Some(self.gates.remove(index))
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub fn gate_mut(&mut self, id: GateId) -> Option<&mut Gate> {
        self.gates.iter_mut().find(|g| g.id == id)
    }

    // ── Wires ────────────────────────────────────────────────────────

    /// Add a new wire with the next unused id.
    pub fn add_wire(&mut self, path: Vec<Point>, kind: WireKind, fields: WireFields) -> &mut Wire {
        let id = self.wires.iter().map(|w| w.id).fold(self.last_wire_id, u64::max) + 1;
        self.last_wire_id = id;

        let mut wire = Wire::new(id, kind, path);
        wire.color = fields.color;
        wire.label = fields.label;

        let index = self.wires.len();
        self.wires.push(wire);
        &mut self.wires[index]
    }

    pub fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let index = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(index))
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn wire_mut(&mut self, id: WireId) -> Option<&mut Wire> {
        self.wires.iter_mut().find(|w| w.id == id)
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Smallest rectangle covering every placed footprint and, if
    /// `include_wires`, every wire cell. An empty circuit yields `(0, 0, 0, 0)`.
    pub fn bounding_box<R>(&self, registry: &R, include_wires: bool) -> Result<Rect, ShapeError>
    where
        R: ShapeRegistry + ?Sized,
    {
        let mut extent = Extent::new();
        for gate in &self.gates {
            let shape = registry.lookup(&gate.kind, &gate.shape_variant())?;
            let placed = gate.footprint_bounds(shape)?;
            extent.include_xy(placed.x, placed.y);
            extent.include_xy(placed.right(), placed.bottom());
        }
        if include_wires {
            for p in self.wires.iter().flat_map(|w| w.positions.iter()) {
                extent.include(*p);
            }
        }
        Ok(extent.span())
    }

    /// Wire endpoints grouped by electrical node.
    pub fn connections(&self) -> Connections {
        Connections::from_wires(&self.wires)
    }
}
