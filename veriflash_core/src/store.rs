//! Catalog persistence with file locking, plus backup import/export.
//!
//! The working catalog lives in a single JSON file. Reads take a shared
//! lock; writes go through a locked temp file that is renamed over the
//! original.

use crate::{build_default_catalog, Catalog, Error, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load the working catalog
///
/// Returns the default catalog if the file doesn't exist.
/// If the file is unreadable or corrupted, logs a warning, keeps a copy of
/// it next to the original (`<name>.corrupt`) and returns the default
/// catalog. Anything that writes the catalog back must use
/// [`load_catalog_strict`] instead.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    match load_catalog_strict(path) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            tracing::warn!(
                "Unable to load catalog file {:?}: {}. Using defaults.",
                path,
                e
            );
            preserve_corrupt(path);
            Ok(build_default_catalog())
        }
    }
}

/// Load the working catalog, failing on unreadable or malformed files
///
/// A missing file still yields the default catalog.
pub fn load_catalog_strict(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        tracing::info!("No catalog file found, using default catalog");
        return Ok(build_default_catalog());
    }

    let contents = read_locked(path)?;
    let mut catalog: Catalog = serde_json::from_str(&contents)?;
    catalog.assign_missing_ids();
    tracing::debug!("Loaded catalog from {:?}", path);
    Ok(catalog)
}

/// Path a corrupt catalog is copied to before anything can replace it
pub fn corrupt_copy_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

fn preserve_corrupt(path: &Path) {
    let copy = corrupt_copy_path(path);
    match std::fs::copy(path, &copy) {
        Ok(_) => tracing::warn!("Kept a copy of the unreadable catalog at {:?}", copy),
        Err(e) => tracing::warn!("Failed to copy unreadable catalog to {:?}: {}", copy, e),
    }
}

/// Read a file's contents under a shared lock
fn read_locked(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read = reader.read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(contents)
}

/// Save the working catalog atomically
///
/// 1. Write pretty JSON to a temp file in the same directory
/// 2. Sync to disk
/// 3. Rename over the original
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    // Exclusive lock serializes concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(catalog)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved catalog to {:?}", path);
    Ok(())
}

/// Load a catalog, modify it, and save it back
///
/// Refuses to run when the existing file cannot be parsed, so a damaged
/// catalog is never replaced by an edited copy of the defaults.
pub fn update_catalog<F, T>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&mut Catalog) -> Result<T>,
{
    let mut catalog = load_catalog_strict(path)?;
    let out = f(&mut catalog)?;
    save_catalog(&catalog, path)?;
    Ok(out)
}

/// Read a backup file strictly
///
/// Unlike [`load_catalog`], anything that is not a JSON array of categories
/// is an error. Missing ids are assigned.
pub fn import_catalog(path: &Path) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;

    if !value.is_array() {
        return Err(Error::Import(
            "invalid file format: data must be an array".into(),
        ));
    }

    let mut catalog: Catalog = serde_json::from_value(value)?;
    catalog.assign_missing_ids();
    tracing::info!(
        "Imported {} categories from {:?}",
        catalog.categories.len(),
        path
    );
    Ok(catalog)
}

/// File name used for backups taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("veriflash-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Write a dated backup into `dir`, returning its path
pub fn export_catalog(catalog: &Catalog, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(date));

    let mut file = File::create(&path)?;
    file.write_all(serde_json::to_string_pretty(catalog)?.as_bytes())?;
    file.flush()?;

    tracing::info!("Exported catalog to {:?}", path);
    Ok(path)
}
