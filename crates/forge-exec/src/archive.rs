// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Archive fetch and extraction (spec.md §4.5(b)).

use std::path::{Path, PathBuf};

use forge_foundation::Nv;
use forge_repo::{backend_for, RepoBackend};
use forge_storage::State;

use crate::error::{Error, Result};

/// Resolve `nv`'s archive, downloading it into the global `archive/` link
/// via its owning repository's backend if the derived view doesn't already
/// have it cached.
pub async fn ensure_archive(state: &State, nv: &Nv) -> Result<PathBuf> {
    let dest = state.global_paths().archive_link(nv);
    if dest.exists() {
        return Ok(dest);
    }

    let repo_name = state
        .repo_index()
        .get(nv.name())
        .ok_or_else(|| Error::UnknownPackage(nv.name().clone()))?;
    let repo = state
        .config()
        .repos
        .iter()
        .find(|r| &r.name == repo_name)
        .ok_or_else(|| Error::UnknownRepo(repo_name.to_string()))?;

    let backend = backend_for(repo, state.global_paths());
    backend.download(nv, &dest).await?;
    Ok(dest)
}

/// Unpack a `.tar.gz` archive into `dest` (spec.md §6 filesystem layout:
/// `archive/<nv>.tar.gz`).
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive).map_err(|e| Error::Read(archive.to_owned(), e))?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut unpacker = tar::Archive::new(decoder);
    unpacker.unpack(dest).map_err(|e| Error::Extract(archive.to_owned(), e))
}
