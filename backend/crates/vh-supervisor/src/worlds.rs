use crate::{SupervisorError, SupervisorResult};

use std::collections::BTreeSet;
use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use walkdir::WalkDir;

/// Extensions of the world descriptor and world database files.
pub const WORLD_FILE_EXTENSIONS: [&str; 2] = ["fwl", "db"];

/// Distinct world names found under `worlds_dir`, sorted ascending.
///
/// A world counts if either of its files is present. Blocking; a missing
/// directory has no worlds.
pub fn list_worlds(worlds_dir: &Path) -> SupervisorResult<Vec<String>> {
    if !worlds_dir.exists() {
        return Ok(Vec::new());
    }

    let mut worlds = BTreeSet::new();

    for entry in WalkDir::new(worlds_dir) {
        let entry = entry.map_err(|source| SupervisorError::WorldsScan {
            path: worlds_dir.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_world_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| WORLD_FILE_EXTENSIONS.contains(&ext));

        if let (true, Some(stem)) = (is_world_file, path.file_stem()) {
            worlds.insert(stem.to_string_lossy().into_owned());
        }
    }

    Ok(worlds.into_iter().collect())
}
