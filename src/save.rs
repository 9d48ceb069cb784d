//! Opaque persisted payloads. The host serializes these; patches only fold
//! their own contribution in under a namespaced key and read it back out.

use std::path::Path;

use eyre::WrapErr;

/// The shape of both the save-file contents and the persisted config data:
/// an opaque JSON object keyed by namespace.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Reads a boolean flag out of a payload. A missing or mistyped key falls
/// back to the supplied default; it is never an error.
pub fn read_flag(payload: &Payload, key: &str, default: bool) -> bool {
    payload
        .get(key)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(default)
}

pub fn write_payload(path: &Path, payload: &Payload) -> eyre::Result<()> {
    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("failed to create payload file {}", path.display()))?;
    serde_json::to_writer_pretty(file, payload).wrap_err("failed to serialize payload")
}

pub fn read_payload(path: &Path) -> eyre::Result<Payload> {
    let file = std::fs::File::open(path)
        .wrap_err_with(|| format!("failed to open payload file {}", path.display()))?;
    serde_json::from_reader(file).wrap_err("failed to parse payload")
}
