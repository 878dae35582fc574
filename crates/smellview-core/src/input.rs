use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::error::ReportError;
use crate::report::model::{SourceHash, SourceInfo};

/// Raw report bytes as received, plus a fingerprint of them.
#[derive(Debug, Clone)]
pub struct ReportInput {
    /// File path or service URL (informational only).
    pub path: Option<String>,

    pub bytes: Vec<u8>,

    pub size_bytes: u64,

    pub hash_alg: String,

    /// Hex-encoded SHA-256 of `bytes`.
    pub hash_hex: String,
}

impl ReportInput {
    pub fn from_bytes(path: Option<String>, bytes: Vec<u8>) -> Self {
        let digest = Sha256::digest(&bytes);

        Self {
            path,
            size_bytes: bytes.len() as u64,
            bytes,
            hash_alg: "sha256".to_string(),
            hash_hex: hex::encode(digest),
        }
    }

    /// Parse the bytes as JSON.
    ///
    /// Bytes that are not JSON at all are an invalid report, same as JSON
    /// with the wrong shape.
    pub fn parse(&self) -> Result<Value, ReportError> {
        serde_json::from_slice(&self.bytes)
            .map_err(|e| ReportError::invalid(format!("not valid JSON: {e}")))
    }

    pub fn source_info(&self) -> SourceInfo {
        SourceInfo {
            path: self.path.clone(),
            size_bytes: self.size_bytes,
            hash: SourceHash {
                algorithm: self.hash_alg.clone(),
                value: self.hash_hex.clone(),
            },
        }
    }
}

/// Read a raw report from disk.
pub fn read_report(path: &Path) -> Result<ReportInput> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read report: {}", path.display()))?;

    Ok(ReportInput::from_bytes(Some(path.display().to_string()), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_report(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_bytes_and_fingerprints_them() {
        let file = temp_report(b"{}");
        let input = read_report(file.path()).expect("report read succeeds");

        assert_eq!(input.bytes, b"{}");
        assert_eq!(input.size_bytes, 2);
        assert_eq!(input.hash_alg, "sha256");
        // echo -n "{}" | sha256sum
        assert_eq!(
            input.hash_hex,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn different_inputs_produce_different_hashes() {
        let a = ReportInput::from_bytes(None, b"{\"a\":1}".to_vec());
        let b = ReportInput::from_bytes(None, b"{\"b\":1}".to_vec());
        assert_ne!(a.hash_hex, b.hash_hex);
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(read_report(Path::new("non_existent_report.json")).is_err());
    }

    #[test]
    fn non_json_bytes_are_an_invalid_report() {
        let input = ReportInput::from_bytes(None, b"<html>502</html>".to_vec());
        let err = input.parse().unwrap_err();
        assert!(err.reason().starts_with("not valid JSON"));
    }

    #[test]
    fn converts_to_source_info() {
        let input = ReportInput::from_bytes(Some("report.json".into()), b"[]".to_vec());
        let source = input.source_info();
        assert_eq!(source.path.as_deref(), Some("report.json"));
        assert_eq!(source.size_bytes, 2);
        assert_eq!(source.hash.value, input.hash_hex);
    }
}
