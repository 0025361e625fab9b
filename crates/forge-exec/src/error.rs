// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use forge_foundation::{Nv, PkgName, Section};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),
    #[error(transparent)]
    Storage(#[from] forge_storage::Error),
    #[error(transparent)]
    Repo(#[from] forge_repo::Error),
    #[error(transparent)]
    Subst(#[from] forge_subst::Error),

    /// spec.md §7 `UnknownPackage(name)`.
    #[error("unknown package {0}")]
    UnknownPackage(PkgName),
    /// spec.md §7 `UnknownRepo(n)`.
    #[error("unknown repository {0:?}")]
    UnknownRepo(String),

    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
    #[error("failed to extract archive {0}: {1}")]
    Extract(PathBuf, #[source] std::io::Error),
    #[error("failed to spawn {0}: {1}")]
    Spawn(String, #[source] std::io::Error),

    /// spec.md §7 `BuildFailed(nv, exit_code)`.
    #[error("build of {0} failed with exit code {1}")]
    BuildFailed(Nv, i32),
    /// spec.md §7 `RemoveFailed(nv)`.
    #[error("remove script for {0} failed")]
    RemoveFailed(Nv),
    /// spec.md §7 `ConfigMismatch(section)`.
    #[error("manifest and build config disagree on section {0}")]
    ConfigMismatch(Section),
    /// spec.md §7 `UnresolvedRequire(section)`.
    #[error("section {0} is required but resolves to no local or dependency definition")]
    UnresolvedRequire(Section),

    /// The user declined a confirmation prompt (spec.md §4.5 step 1).
    #[error("operation cancelled")]
    Cancelled,
}
