// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use forge_foundation::{Nv, PkgName, RepoKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Foundation(#[from] forge_foundation::Error),
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),
    #[error(transparent)]
    Storage(#[from] forge_storage::Error),

    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),

    /// git/http backend implementations are out of scope (spec.md §1);
    /// this is returned by the placeholder backends so the synchronizer
    /// can still dispatch uniformly over all three [`RepoKind`]s.
    #[error("the {0} repository backend is not implemented in this core")]
    Unsupported(RepoKind),

    /// spec.md §7 `InconsistentRepo(nv, dep)`: a dependency references an
    /// unknown package.
    #[error("package {nv} depends on unknown package {dep}")]
    InconsistentRepo { nv: Nv, dep: PkgName },
}
