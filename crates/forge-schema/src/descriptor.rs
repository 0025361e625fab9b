// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The per-NV install descriptor (spec.md §3 `InstallDescriptor`): what got
//! copied into the switch after a successful build.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A library or binary artifact produced by the build, with an optional
/// rename applied at install time (spec.md §4.5(f): "bin files into
/// `bin/` (renamed to their declared destination basename)").
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path of the built artifact, relative to the package's build
    /// directory.
    pub src: PathBuf,
    /// Destination basename; defaults to `src`'s basename when absent.
    #[serde(default)]
    pub dst: Option<String>,
}

impl FileEntry {
    pub fn dst_basename(&self) -> String {
        self.dst.clone().unwrap_or_else(|| {
            self.src
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

/// A `misc` artifact: copied verbatim to an absolute destination path
/// outside the switch tree (spec.md §4.5(f)).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MiscEntry {
    pub src: PathBuf,
    pub dst: PathBuf,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallDescriptor {
    pub lib: Vec<FileEntry>,
    pub bin: Vec<FileEntry>,
    pub misc: Vec<MiscEntry>,
}
