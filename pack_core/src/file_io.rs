//! # File I/O Module
//!
//! Session file operations:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: refuse files written by an incompatible schema
//!
//! Sessions are saved as `.pks` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pack_core::file_io::{load_session, save_session};
//! use pack_core::session::Session;
//! use std::path::Path;
//!
//! let session = Session::new("Engineer", "Crate study");
//! save_session(&session, Path::new("crate.pks"))?;
//!
//! let loaded = load_session(Path::new("crate.pks"))?;
//! assert_eq!(loaded.meta.label, "Crate study");
//! # Ok::<(), pack_core::errors::SimError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{SimError, SimResult};
use crate::session::{Session, SCHEMA_VERSION};

/// File extension for saved sessions
pub const SESSION_EXTENSION: &str = "pks";

/// Save a session with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.pks.tmp`
/// 3. fsync
/// 4. Rename over `path`
///
/// An interrupted save leaves the previous file intact.
pub fn save_session(session: &Session, path: &Path) -> SimResult<()> {
    let json = serde_json::to_string_pretty(session).map_err(|e| SimError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension(format!("{}.tmp", SESSION_EXTENSION));

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SimError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        SimError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        SimError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SimError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::info!("saved session {} to {}", session.meta.id, path.display());
    Ok(())
}

/// Load a session from a file.
///
/// # Errors
///
/// * `FileError` - the file cannot be opened or read
/// * `SerializationError` - the contents are not a valid session
/// * `VersionMismatch` - the file was written by an incompatible schema
pub fn load_session(path: &Path) -> SimResult<Session> {
    let mut file = File::open(path)
        .map_err(|e| SimError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| SimError::file_error("read", path.display().to_string(), e.to_string()))?;

    let session: Session =
        serde_json::from_str(&contents).map_err(|e| SimError::SerializationError {
            reason: format!("Invalid session JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&session.meta.version)?;

    log::info!(
        "loaded session {} ({} tests, {} results)",
        session.meta.id,
        session.tests.len(),
        session.results.len()
    );
    Ok(session)
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
///
/// Majors must match; within 0.x a file from a newer minor is refused.
fn validate_version(file_version: &str) -> SimResult<()> {
    let mismatch = || SimError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };

    if file_major != current_major {
        return Err(mismatch());
    }

    if current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{DropConfig, TestConfig};
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_session_path(name: &str) -> PathBuf {
        temp_dir().join(format!("packsim_test_{}.pks", name))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_session_path("roundtrip");

        let mut session = Session::new("Test Engineer", "Roundtrip");
        session.tests.push(TestConfig::Drop(DropConfig::new(0.8)));
        save_session(&session, &path).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded, session);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_session_path("atomic");
        let tmp_path = path.with_extension("pks.tmp");

        save_session(&Session::new("Test", "Atomic"), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_session(&temp_session_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_garbage() {
        let path = temp_session_path("garbage");
        fs::write(&path, "{ not json").unwrap();

        let err = load_session(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_refuses_newer_schema() {
        let path = temp_session_path("newer_schema");
        let mut session = Session::new("Test", "Future");
        session.meta.version = "0.9.0".to_string();
        save_session(&session, &path).unwrap();

        let err = load_session(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.3").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
