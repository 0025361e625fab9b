// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// spec.md §7 `Uninitialized`: root missing; user instruction to run `init`.
    #[error("{0} is not a forge root; run `forge init` first")]
    Uninitialized(PathBuf),

    /// spec.md §7 `AlreadyInitialized`: `init` over an existing config.
    #[error("{0} is already a forge root")]
    AlreadyInitialized(PathBuf),

    #[error("unknown switch alias {0:?}")]
    UnknownAlias(String),

    #[error("failed to acquire exclusive lock on {0}")]
    LockFailed(PathBuf, #[source] std::io::Error),

    #[error("failed to read directory {0}: {1}")]
    ReadDir(PathBuf, #[source] std::io::Error),

    #[error("failed to create directory {0}: {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Schema(#[from] forge_schema::Error),

    #[error(transparent)]
    Foundation(#[from] forge_foundation::Error),
}
