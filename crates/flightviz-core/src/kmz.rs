// File: crates/flightviz-core/src/kmz.rs
// Summary: KMZ packaging; the whole archive is built in memory before anything touches disk.

use std::io::{Cursor, Write};
use std::path::Path;

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::kml::Document;

/// Entry name viewers look for first inside a KMZ.
pub const ROOT_ENTRY: &str = "doc.kml";
/// Output name when the caller does not choose one.
pub const DEFAULT_OUTPUT: &str = "flightviz.kmz";

/// Document plus the binary assets it references.
#[derive(Clone, Debug, Default)]
pub struct Package {
    pub document: Document,
    pub files: Vec<(String, Vec<u8>)>,
}

impl Package {
    pub fn new(document: Document) -> Self {
        Self { document, files: Vec::new() }
    }

    /// Serialize into KMZ (zip) bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.start_file(ROOT_ENTRY, deflated)?;
        zip.write_all(self.document.to_kml().as_bytes())?;
        // PNGs are already compressed
        let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, bytes) in &self.files {
            zip.start_file(name.as_str(), stored)?;
            zip.write_all(bytes)?;
        }
        Ok(zip.finish()?.into_inner())
    }

    /// Write the archive to `path`. Serialization finishes before the file is
    /// created, so a failure leaves no partial output.
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote package");
        Ok(())
    }
}
