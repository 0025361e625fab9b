// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use forge_foundation::Alias;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] forge_storage::Error),
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),
    #[error(transparent)]
    Foundation(#[from] forge_foundation::Error),
    #[error(transparent)]
    Repo(#[from] forge_repo::Error),
    #[error(transparent)]
    Solve(#[from] forge_solve::Error),
    #[error(transparent)]
    Exec(#[from] forge_exec::Error),
    #[error(transparent)]
    Subst(#[from] forge_subst::Error),

    /// spec.md §7 `AlreadyInitialized` — `init` over an existing config.
    #[error("{0} is already initialized")]
    AlreadyInitialized(PathBuf),
    /// spec.md §7 `UnknownAlias` surfaced through `switch`.
    #[error("unknown switch alias {0:?}")]
    UnknownAlias(Alias),
    /// spec.md §4.4's `SolverNoSolution`, surfaced while bootstrapping a switch.
    #[error("no solution for the switch's required packages")]
    NoSolution,

    #[error("failed to create {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to extract compiler source archive {0}: {1}")]
    Extract(PathBuf, #[source] std::io::Error),
    #[error("failed to spawn {0}: {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error("compiler bootstrap command {0:?} failed with exit code {1}")]
    BootstrapFailed(String, i32),
    #[error("compiler description for {0} has no source_url and is not marked preinstalled")]
    MissingSourceUrl(forge_foundation::CompilerVersion),
    #[error("compiler source_url {0:?} is not a local .tar.gz archive")]
    UnsupportedSourceUrl(String),
}
