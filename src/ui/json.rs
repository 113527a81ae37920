use std::io::{self, Write};

use serde::Serialize;

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Emit `{"event": name, ...payload}` where `payload` serializes to an object
pub fn emit_with<T: Serialize>(name: &str, payload: &T) -> io::Result<()> {
    let mut value = serde_json::to_value(payload).map_err(io::Error::other)?;
    if let serde_json::Value::Object(map) = &mut value {
        map.insert("event".to_string(), serde_json::Value::from(name));
    }
    emit(value)
}
