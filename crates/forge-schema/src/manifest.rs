// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The per-package manifest (spec.md §3 `Manifest`, the "opam" file).

use std::path::Path;

use forge_foundation::{Nv, PkgName, PkgVersion, Section};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{doc, VersionConstraint};

/// One entry of `depends`/`depopts`/`conflicts`: a package name plus an
/// optional constraint on its version.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: PkgName,
    #[serde(default)]
    pub constraint: VersionConstraint,
}

impl Dependency {
    pub fn unconstrained(name: PkgName) -> Self {
        Self {
            name,
            constraint: VersionConstraint::Any,
        }
    }
}

/// A single shell command, already split into argv form (spec.md §4.5(e):
/// "String-substitute each argument before execution").
pub type Command = Vec<String>;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: PkgName,
    pub version: PkgVersion,
    pub depends: Vec<Dependency>,
    pub depopts: Vec<Dependency>,
    pub conflicts: Vec<Dependency>,
    pub build: Vec<Command>,
    pub remove: Vec<Command>,
    /// Base names of templates to file-substitute before building
    /// (spec.md §4.2 "File substitution").
    pub substs: Vec<String>,
    pub libraries: Vec<Section>,
    pub syntax: Vec<Section>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            name: PkgName::new("unnamed").expect("\"unnamed\" is a valid package name"),
            version: PkgVersion::new("0").expect("\"0\" is a valid version"),
            depends: Vec::new(),
            depopts: Vec::new(),
            conflicts: Vec::new(),
            build: Vec::new(),
            remove: Vec::new(),
            substs: Vec::new(),
            libraries: Vec::new(),
            syntax: Vec::new(),
        }
    }
}

impl Manifest {
    pub fn nv(&self) -> Nv {
        Nv::new(self.name.clone(), self.version.clone())
    }

    /// Load a manifest from `path`, checking that its declared name and
    /// version match `expected` (spec.md §7 `InconsistentManifest`).
    pub fn load_checked(path: &Path, expected: &Nv) -> Result<Self> {
        let manifest: Manifest = doc::read_optional(path)?.ok_or_else(|| Error::Read(
            path.to_owned(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "manifest not found"),
        ))?;
        let declared = manifest.nv();
        if &declared != expected {
            return Err(Error::InconsistentManifest {
                path: path.to_owned(),
                declared,
                nv: expected.clone(),
            });
        }
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        doc::write(path, self)
    }

    /// Every non-optional + optional dependency's package name, for the
    /// Available-set consistency check in spec.md §4.3 step 6.
    pub fn all_dependency_names(&self) -> impl Iterator<Item = &PkgName> {
        self.depends
            .iter()
            .chain(self.depopts.iter())
            .map(|d| &d.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(name: &str, version: &str) -> Manifest {
        Manifest {
            name: PkgName::new(name).unwrap(),
            version: PkgVersion::new(version).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn round_trips_through_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foo.1.opam");
        let m = sample("foo", "1");
        m.save(&path).unwrap();
        let nv: Nv = "foo.1".parse().unwrap();
        let loaded = Manifest::load_checked(&path, &nv).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn mismatched_location_is_inconsistent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foo.2.opam");
        sample("foo", "1").save(&path).unwrap();
        let nv: Nv = "foo.2".parse().unwrap();
        match Manifest::load_checked(&path, &nv) {
            Err(Error::InconsistentManifest { .. }) => {}
            other => panic!("expected InconsistentManifest, got {other:?}"),
        }
    }
}
