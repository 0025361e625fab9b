// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },
    #[error("invalid NV string {0:?}: expected NAME.VERSION")]
    InvalidNv(String),
    #[error("invalid full variable {0:?}: expected pkg:var or pkg:section:var")]
    InvalidVariable(String),
    #[error("invalid version {0:?}: {1}")]
    InvalidVersion(String, String),
}
