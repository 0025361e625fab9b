// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Version constraints used in manifest dependencies and solver requests
//! (spec.md §4.4's `wish_install`/`wish_upgrade` pins).

use forge_foundation::PkgVersion;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionConstraint {
    #[default]
    Any,
    /// Pinned to exactly this version (spec.md §4.4's `"="` pin).
    Eq(PkgVersion),
    /// At least this version (spec.md §4.4's `">= current"` upgrade pin).
    Ge(PkgVersion),
}

impl VersionConstraint {
    pub fn matches(&self, version: &PkgVersion) -> bool {
        match self {
            VersionConstraint::Any => true,
            VersionConstraint::Eq(v) => v == version,
            VersionConstraint::Ge(v) => version >= v,
        }
    }
}

impl std::fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionConstraint::Any => write!(f, "*"),
            VersionConstraint::Eq(v) => write!(f, "= {v}"),
            VersionConstraint::Ge(v) => write!(f, ">= {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_matches_only_that_version() {
        let c = VersionConstraint::Eq(PkgVersion::new("1.0").unwrap());
        assert!(c.matches(&PkgVersion::new("1.0").unwrap()));
        assert!(!c.matches(&PkgVersion::new("1.1").unwrap()));
    }

    #[test]
    fn ge_matches_greater_or_equal() {
        let c = VersionConstraint::Ge(PkgVersion::new("1.0").unwrap());
        assert!(c.matches(&PkgVersion::new("1.0").unwrap()));
        assert!(c.matches(&PkgVersion::new("2.0").unwrap()));
        assert!(!c.matches(&PkgVersion::new("0.9").unwrap()));
    }
}
