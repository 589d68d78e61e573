use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::Engine;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading an engine's energy output format.
///
/// Implementors parse the raw, engine-named terms; mapping onto the canonical
/// vocabulary is a separate step.
pub trait EnergyFile {
    /// The engine that writes this format.
    const ENGINE: Engine;

    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// Reads a raw energy breakdown from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the expected markers are absent, a value is malformed, or
    /// the underlying reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<EnergyBreakdown, Self::Error>;

    /// Reads a raw energy breakdown from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<EnergyBreakdown, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads a raw energy breakdown from in-memory text.
    fn read_from_str(text: &str) -> Result<EnergyBreakdown, Self::Error> {
        let mut reader = text.as_bytes();
        Self::read_from(&mut reader)
    }
}
