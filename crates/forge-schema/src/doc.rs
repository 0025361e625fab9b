// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Generic typed read/write of the on-disk YAML documents (spec.md §2
//! "File layer"). Every manifest/descriptor/config type in this crate is a
//! thin `serde` struct; this module is the one place that turns bytes on
//! disk into one of those structs and back.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Read and parse a YAML document. Returns `Ok(None)` if the file does not
/// exist, matching spec.md §4.1's "missing optional files read as empty".
pub fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let value = serde_yaml::from_str(&contents).map_err(|e| Error::Parse(path.to_owned(), e))?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Read(path.to_owned(), e)),
    }
}

/// Read and parse a required YAML document.
pub fn read<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    Ok(read_optional(path)?.unwrap_or_default())
}

/// Serialize and write a YAML document, creating parent directories as
/// needed. Writes go through a temp file in the same directory and an
/// atomic rename, so a crash mid-write never leaves a half-written
/// document in place (spec.md §4.5's atomicity requirement extends to
/// every persisted file, not just `installed`).
pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write(path.to_owned(), e))?;
    }
    let rendered = serde_yaml::to_string(value).map_err(|e| Error::Render(path.to_owned(), e))?;
    let tmp = path.with_extension("tmp-write");
    std::fs::write(&tmp, rendered).map_err(|e| Error::Write(tmp.clone(), e))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Write(path.to_owned(), e))?;
    Ok(())
}
