// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Conversion of the Available set into a solver universe (spec.md §4.4
//! first paragraph).

use forge_foundation::Nv;
use forge_schema::{Dependency, Manifest};
use forge_storage::State;

use crate::error::Result;

/// One package's solver-relevant facts: its identity, its dependency
/// edges, and whether it is presently installed.
#[derive(Clone, Debug)]
pub struct PkgDesc {
    pub nv: Nv,
    pub depends: Vec<Dependency>,
    pub depopts: Vec<Dependency>,
    pub conflicts: Vec<Dependency>,
    pub installed: bool,
}

impl PkgDesc {
    fn from_manifest(manifest: &Manifest, installed: bool) -> Self {
        Self {
            nv: manifest.nv(),
            depends: manifest.depends.clone(),
            depopts: manifest.depopts.clone(),
            conflicts: manifest.conflicts.clone(),
            installed,
        }
    }
}

/// Build the universe from `state`'s Available set.
///
/// spec.md §4.4: "flags each NV as `installed` iff it is in Installed and
/// not in Reinstall (for upgrade actions) or just iff installed (for
/// others)". `for_upgrade` selects which of those two rules applies.
pub fn build_universe(state: &State, for_upgrade: bool) -> Result<Vec<PkgDesc>> {
    let mut universe = Vec::with_capacity(state.available().len());
    for nv in state.available() {
        let manifest_path = state.global_paths().opam_link(nv);
        let manifest = Manifest::load_checked(&manifest_path, nv)?;

        let installed = if for_upgrade {
            state.is_installed(nv) && !state.reinstall().contains(nv)
        } else {
            state.is_installed(nv)
        };

        universe.push(PkgDesc::from_manifest(&manifest, installed));
    }
    Ok(universe)
}
