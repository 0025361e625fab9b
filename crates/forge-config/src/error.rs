// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not determine the user config directory on this platform")]
    NoConfigDir,
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
