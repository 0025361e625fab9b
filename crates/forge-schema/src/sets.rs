// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Per-switch NV sets: `Installed`, `Reinstall`, `Pinned` (spec.md §3, plus
//! the `pin` feature added in SPEC_FULL.md §A.5).
//!
//! `Installed`'s defining invariant — "no two NV share a PkgName" (spec.md
//! §3, I1 in §8) — is enforced at the type boundary rather than trusted to
//! callers: [`Installed::insert`] returns an error instead of silently
//! creating a second installed version of the same package.

use std::collections::BTreeSet;

use forge_foundation::{Nv, PkgName, PkgVersion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
#[error("package {0} is already installed at a different version")]
pub struct NameCollision(pub PkgName);

/// The set of NVs installed in one switch.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Installed(BTreeSet<Nv>);

impl Installed {
    pub fn contains(&self, nv: &Nv) -> bool {
        self.0.contains(nv)
    }

    pub fn version_of(&self, name: &PkgName) -> Option<&PkgVersion> {
        self.0.iter().find(|nv| nv.name() == name).map(|nv| nv.version())
    }

    pub fn insert(&mut self, nv: Nv) -> Result<(), NameCollision> {
        if let Some(existing) = self.version_of(nv.name()) {
            if existing != nv.version() {
                return Err(NameCollision(nv.name().clone()));
            }
            return Ok(());
        }
        self.0.insert(nv);
        Ok(())
    }

    /// Replace whatever version of `nv`'s package is installed, if any,
    /// with `nv` itself. Used by the executor when a `Change`/`Recompile`
    /// action completes (spec.md §4.5 step 3).
    pub fn replace(&mut self, nv: Nv) {
        self.0.retain(|existing| existing.name() != nv.name());
        self.0.insert(nv);
    }

    pub fn remove(&mut self, nv: &Nv) -> bool {
        self.0.remove(nv)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Nv> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Nv> for Installed {
    fn from_iter<I: IntoIterator<Item = Nv>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Installed {
    type Item = Nv;
    type IntoIter = std::collections::btree_set::IntoIter<Nv>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The set of NVs flagged for rebuild on next upgrade. Always a subset of
/// `Installed` (spec.md §3) — this type does not itself enforce that
/// invariant since it is cheap to check at the call sites that mutate it
/// (the repository synchronizer, §4.3 step 3) and expensive to thread an
/// `Installed` reference through every mutation here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reinstall(BTreeSet<Nv>);

impl Reinstall {
    pub fn contains(&self, nv: &Nv) -> bool {
        self.0.contains(nv)
    }

    pub fn insert(&mut self, nv: Nv) {
        self.0.insert(nv);
    }

    pub fn remove(&mut self, nv: &Nv) -> bool {
        self.0.remove(nv)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Nv> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop any NV whose package is no longer installed, restoring the
    /// subset invariant after a removal.
    pub fn retain_installed(&mut self, installed: &Installed) {
        self.0.retain(|nv| installed.contains(nv));
    }
}

/// Packages pinned to their currently-installed version (SPEC_FULL.md
/// §A.5's `pin`): `upgrade` must not propose a `wish_upgrade` target for
/// any name in this set.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pinned(BTreeSet<PkgName>);

impl Pinned {
    pub fn contains(&self, name: &PkgName) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: PkgName) {
        self.0.insert(name);
    }

    pub fn remove(&mut self, name: &PkgName) -> bool {
        self.0.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PkgName> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nv(s: &str) -> Nv {
        s.parse().unwrap()
    }

    #[test]
    fn installed_rejects_second_version_of_same_package() {
        let mut installed = Installed::default();
        installed.insert(nv("foo.1")).unwrap();
        assert_eq!(installed.insert(nv("foo.2")), Err(NameCollision(PkgName::new("foo").unwrap())));
    }

    #[test]
    fn installed_insert_is_idempotent_for_same_nv() {
        let mut installed = Installed::default();
        installed.insert(nv("foo.1")).unwrap();
        installed.insert(nv("foo.1")).unwrap();
        assert_eq!(installed.len(), 1);
    }

    #[test]
    fn replace_swaps_versions() {
        let mut installed = Installed::default();
        installed.insert(nv("foo.1")).unwrap();
        installed.replace(nv("foo.2"));
        assert_eq!(installed.version_of(&PkgName::new("foo").unwrap()).unwrap().as_str(), "2");
        assert_eq!(installed.len(), 1);
    }

    #[test]
    fn reinstall_drops_uninstalled_entries() {
        let mut installed = Installed::default();
        installed.insert(nv("foo.1")).unwrap();
        let mut reinstall = Reinstall::default();
        reinstall.insert(nv("foo.1"));
        reinstall.insert(nv("bar.1"));
        reinstall.retain_installed(&installed);
        assert!(reinstall.contains(&nv("foo.1")));
        assert!(!reinstall.contains(&nv("bar.1")));
    }
}
