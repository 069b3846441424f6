//! Loader/saver for the circuit file format: plain `File::open` +
//! `BufReader` + `serde_json::from_reader`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{debug, error};

use crate::error::Result;
use crate::format::CircuitFile;

/// Load and parse a circuit file. Fatal on I/O failure, malformed JSON,
/// or an unsupported `version` — the grid never reaches the validator
/// in that case.
pub fn load_circuit_file<P: AsRef<Path>>(path: P) -> Result<CircuitFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to open circuit file");
        e
    })?;
    let reader = BufReader::new(file);
    let circuit: CircuitFile = serde_json::from_reader(reader)?;
    debug!(path = %path.display(), version = %circuit.version, "loaded circuit file");
    Ok(circuit)
}

/// Write a circuit file as pretty-printed JSON.
pub fn save_circuit_file<P: AsRef<Path>>(path: P, circuit: &CircuitFile) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, circuit)?;
    debug!(path = %path.display(), "saved circuit file");
    Ok(())
}
