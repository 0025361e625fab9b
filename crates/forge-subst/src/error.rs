// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use forge_foundation::PkgName;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// spec.md §7 `NotInstalled(pkg)`: the variable's package isn't
    /// installed in the current switch.
    #[error("package {0} is not installed")]
    NotInstalled(PkgName),

    /// spec.md §7 `UnknownVariable(v)`.
    #[error("unknown variable {0}")]
    UnknownVariable(String),

    #[error(transparent)]
    Storage(#[from] forge_storage::Error),

    #[error(transparent)]
    Schema(#[from] forge_schema::Error),
}
