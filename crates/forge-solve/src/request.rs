// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The three (plus `switch`) request shapes the solver adapter builds
//! (spec.md §4.4).

use forge_foundation::{CompilerVersion, PkgName, PkgSpec};
use forge_schema::VersionConstraint;

/// A solver request: a wish list of installs/removals/upgrades, each name
/// paired with a version constraint (spec.md §4.4, §6 "Solver interface").
#[derive(Clone, Debug, Default)]
pub struct Request {
    pub wish_install: Vec<(PkgName, VersionConstraint)>,
    pub wish_remove: Vec<PkgName>,
    pub wish_upgrade: Vec<(PkgName, VersionConstraint)>,
}

impl Request {
    /// `install`: requested NVs pinned to `=`, plus every currently
    /// installed NV pinned to any version.
    pub fn install(requested: &[PkgSpec], installed: &forge_schema::Installed) -> Self {
        let mut wish_install = Vec::new();
        for spec in requested {
            match spec {
                PkgSpec::Name(name) => wish_install.push((name.clone(), VersionConstraint::Any)),
                PkgSpec::Versioned(nv) => {
                    wish_install.push((nv.name().clone(), VersionConstraint::Eq(nv.version().clone())))
                }
            }
        }
        let requested_names: Vec<&PkgName> = requested.iter().map(|s| s.name()).collect();
        for nv in installed.iter() {
            if !requested_names.contains(&nv.name()) {
                wish_install.push((nv.name().clone(), VersionConstraint::Any));
            }
        }
        Self {
            wish_install,
            ..Default::default()
        }
    }

    /// `remove`: every installed package outside `target`'s dependent
    /// closure stays pinned to `=`; `target` is the sole removal.
    pub fn remove(target: PkgName, kept: &[(PkgName, forge_foundation::PkgVersion)]) -> Self {
        Self {
            wish_install: kept
                .iter()
                .map(|(name, version)| (name.clone(), VersionConstraint::Eq(version.clone())))
                .collect(),
            wish_remove: vec![target],
            ..Default::default()
        }
    }

    /// `upgrade`: every installed NV with a newer available version gets a
    /// `>= current` pin, skipping anything in `pinned` (SPEC_FULL.md §A.5).
    pub fn upgrade(candidates: &[(PkgName, forge_foundation::PkgVersion)], pinned: &forge_schema::Pinned) -> Self {
        Self {
            wish_upgrade: candidates
                .iter()
                .filter(|(name, _)| !pinned.contains(name))
                .map(|(name, current)| (name.clone(), VersionConstraint::Ge(current.clone())))
                .collect(),
            ..Default::default()
        }
    }

    /// `switch`: the latest available of each package the compiler
    /// description requires, unioned with the previous switch's Installed
    /// set when cloning (spec.md §4.6 `switch --clone`).
    pub fn switch(
        required_packages: &[PkgName],
        clone_from: Option<&forge_schema::Installed>,
    ) -> Self {
        let mut wish_install: Vec<(PkgName, VersionConstraint)> = required_packages
            .iter()
            .map(|name| (name.clone(), VersionConstraint::Any))
            .collect();
        if let Some(previous) = clone_from {
            for nv in previous.iter() {
                wish_install.push((nv.name().clone(), VersionConstraint::Eq(nv.version().clone())));
            }
        }
        Self {
            wish_install,
            ..Default::default()
        }
    }
}

/// Identifies which compiler bootstrap to target; kept separate from
/// [`Request`] since `switch` additionally needs the target compiler
/// version for `init_switch` (spec.md §4.6), not just a package wish list.
#[derive(Clone, Debug)]
pub struct SwitchTarget {
    pub compiler_version: CompilerVersion,
}
