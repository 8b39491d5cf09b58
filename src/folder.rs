//! Folder iteration: one mapping document per file.
//!
//! Directory entries are enumerated (and sorted by file name, for a
//! deterministic order) up front; file contents are only read when a file's
//! turn comes. The lazy iterator opens one file per demand and the handle
//! is scoped to that demand — it is closed before the materialized value is
//! yielded, so no two files are ever open concurrently.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::api::from_str_with_options;
use crate::descriptor::FromYaml;
use crate::error::Error;
use crate::options::Options;

/// Enumerate the files of `path` in file-name order.
pub(crate) fn folder_paths(path: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_file() {
            paths.push(entry_path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Lazy folder iterator created by [`crate::folder_sequence`]: one file
/// opened, parsed, materialized and closed per `next()` call.
///
/// A failing file exhausts the iterator; remaining files are not visited.
pub struct FolderIter<T: FromYaml> {
    paths: std::vec::IntoIter<PathBuf>,
    options: Options,
    done: bool,
    _target: PhantomData<fn() -> T>,
}

impl<T: FromYaml> FolderIter<T> {
    pub(crate) fn new(paths: Vec<PathBuf>, options: Options) -> Self {
        Self {
            paths: paths.into_iter(),
            options,
            done: false,
            _target: PhantomData,
        }
    }
}

impl<T: FromYaml> Iterator for FolderIter<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let path = self.paths.next()?;
        // The file handle lives inside read_to_string and is released
        // before binding begins.
        let bound = std::fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|text| from_str_with_options::<T>(&text, self.options));
        if bound.is_err() {
            self.done = true;
        }
        Some(bound)
    }
}
