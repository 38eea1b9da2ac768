use anyhow::{Context, Result, bail};
use std::io::{Cursor, Read};
use tracing::info;
use zip::ZipArchive;
use zip::result::ZipError;

/// Pulls a single named entry out of a zip archive held in memory.
pub struct Unzipper {
    file_to_extract: String,
}

impl Unzipper {
    pub fn new(file_to_extract: &str) -> Self {
        Unzipper {
            file_to_extract: file_to_extract.to_string(),
        }
    }

    pub fn extract(&self, zipped: &[u8]) -> Result<Vec<u8>> {
        let mut archive =
            ZipArchive::new(Cursor::new(zipped)).context("Failed to open zip archive")?;

        let mut file = match archive.by_name(&self.file_to_extract) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                bail!("Specified file not found: {}", self.file_to_extract)
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read {} from archive", self.file_to_extract)
                });
            }
        };

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .with_context(|| format!("Failed to unzip {}", self.file_to_extract))?;

        info!("File successfully unzipped: {}", self.file_to_extract);
        Ok(contents)
    }
}

/// Builds an in-memory archive holding one file.
#[cfg(test)]
pub(crate) fn zip_bytes(name: &str, contents: &[u8]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::FileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(name, FileOptions::default())
        .expect("Failed to start zip entry");
    writer
        .write_all(contents)
        .expect("Failed to write zip entry");
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_named_file() {
        let zipped = zip_bytes("filename.txt", b"navigare necesse est");

        let contents = Unzipper::new("filename.txt").extract(&zipped).unwrap();
        assert_eq!(contents, b"navigare necesse est");
    }

    #[test]
    fn test_missing_entry() {
        let zipped = zip_bytes("filename.txt", b"navigare necesse est");

        let err = Unzipper::new("other.csv").extract(&zipped).unwrap_err();
        assert_eq!(err.to_string(), "Specified file not found: other.csv");
    }

    #[test]
    fn test_declared_size_is_not_trusted() {
        let mut zipped = zip_bytes("filename.txt", b"navigare necesse est");

        // Claim ~4 GiB uncompressed in the central directory entry
        let central = zipped
            .windows(4)
            .position(|w| w == [0x50, 0x4b, 0x01, 0x02])
            .unwrap();
        zipped[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        let contents = Unzipper::new("filename.txt").extract(&zipped).unwrap();
        assert_eq!(contents, b"navigare necesse est");
    }

    #[test]
    fn test_not_a_zip() {
        let err = Unzipper::new("filename.txt")
            .extract(b"0123456789")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to open zip archive");
    }
}
