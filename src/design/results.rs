//! Locating result structures in a finished job directory.

use crate::utils::config::{RESULT_DIRS, STRUCTURE_EXTENSIONS};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding the job's results
///
/// The first of `RESULT_DIRS` that exists wins, even when it turns out to be
/// empty.
pub fn result_dir(job_dir: &Path) -> Option<PathBuf> {
    RESULT_DIRS
        .iter()
        .map(|name| job_dir.join(name))
        .find(|dir| dir.is_dir())
}

/// Structure files in `dir`: all `.pdb` files by name, then all `.cif`
pub fn collect_structures(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut by_ext: Vec<Vec<PathBuf>> = vec![Vec::new(); STRUCTURE_EXTENSIONS.len()];

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(slot) = STRUCTURE_EXTENSIONS.iter().position(|e| *e == ext) {
            by_ext[slot].push(path);
        }
    }

    Ok(by_ext
        .into_iter()
        .flat_map(|mut group| {
            group.sort();
            group
        })
        .collect())
}

/// Best-ranked structure of a job, if any were produced
pub fn find_best_structure(job_dir: &Path) -> io::Result<Option<PathBuf>> {
    let Some(dir) = result_dir(job_dir) else {
        debug!("No result directory under {}", job_dir.display());
        return Ok(None);
    };

    let structures = collect_structures(&dir)?;
    debug!("Found {} structure(s) in {}", structures.len(), dir.display());

    Ok(structures.into_iter().next())
}
