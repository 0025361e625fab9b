// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use forge_foundation::Nv;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Foundation(#[from] forge_foundation::Error),

    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] serde_yaml::Error),
    #[error("failed to render {0}: {1}")]
    Render(PathBuf, #[source] serde_yaml::Error),

    /// spec.md §7: manifest's declared name.version != its file location.
    #[error("manifest at {path} declares {declared} but is filed under {nv}")]
    InconsistentManifest {
        path: PathBuf,
        declared: Nv,
        nv: Nv,
    },
}
