// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use forge_foundation::{Nv, PkgName};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] forge_schema::Error),
    #[error(transparent)]
    Storage(#[from] forge_storage::Error),

    #[error("unknown package {0}")]
    UnknownPackage(PkgName),

    /// Two selected packages in the same solution conflict (spec.md §3
    /// `Manifest`'s `conflicts` field).
    #[error("{0} conflicts with {1}")]
    Conflict(Nv, Nv),
}
