// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Repository identity (spec.md §3: `RepoName`, `RepoAddress`, `RepoKind`).

use serde::{Deserialize, Serialize};

use crate::name::RepoName;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RepoAddress(String);

impl RepoAddress {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which backend services a repository. The backend *implementations* for
/// each kind are out of scope (spec.md §1); this enum is the tag the
/// repository synchronizer and CLI dispatch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    Git,
    Http,
    Local,
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepoKind::Git => "git",
            RepoKind::Http => "http",
            RepoKind::Local => "local",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for RepoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "git" => Ok(RepoKind::Git),
            "http" => Ok(RepoKind::Http),
            "local" => Ok(RepoKind::Local),
            other => Err(format!("unknown repository kind {other:?}, expected git|http|local")),
        }
    }
}

/// A configured repository entry. Order within `GlobalConfig::repos` *is*
/// the declared priority (spec.md §3: "ordered by explicit priority given
/// in the global config") — this type intentionally has no `Ord` impl of
/// its own.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: RepoName,
    pub address: RepoAddress,
    pub kind: RepoKind,
}
