use serde_json::{Map, Value};

/// Structured form of a save file, as produced and consumed by a [`SaveCodec`].
///
/// Keys the circuit model interprets are overlaid on encode; every other key
/// is carried through untouched.
pub type SaveRecord = Map<String, Value>;

/// Key holding the component list.
pub const COMPONENTS_KEY: &str = "components";
/// Key holding the wire list.
pub const WIRES_KEY: &str = "circuits";

/// Converts between save-file bytes and their structured form.
pub trait SaveCodec {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode(&self, bytes: &[u8]) -> Result<SaveRecord, Self::Error>;

    fn encode(&self, record: &SaveRecord) -> Result<Vec<u8>, Self::Error>;

    /// Kinds that are codec bookkeeping rather than placed components.
    fn is_virtual(&self, kind: &str) -> bool;
}
