// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The solver adapter contract (spec.md §6 "Solver interface") and a
//! reference implementation.
//!
//! spec.md §1 scopes the actual SAT/CUDF solver out of this core — only
//! the contract it must satisfy is specified. [`ReferenceSolver`] is a
//! small greedy/DFS implementation of that contract (not a CDCL search
//! like `spk-solve::cdcl_solver`) good enough to drive the executor and
//! exercise the contract end to end; a production deployment is expected
//! to swap in a real solver behind the same trait, the same `enum_dispatch`
//! shape `spk-solve::abstract_solver::SolverImpl` uses over multiple solver
//! backends.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use forge_foundation::{Nv, PkgName};
use forge_schema::VersionConstraint;

use crate::error::{Error, Result};
use crate::request::Request;
use crate::solution::{Action, ActionNode, Solution};
use crate::universe::PkgDesc;

#[async_trait]
#[enum_dispatch]
pub trait SolverBackend {
    /// `resolve(universe, request, reinstall) -> Option<Solution>` (spec.md
    /// §6). `None` means no solution exists — the caller terminates the
    /// command informationally (`SolverNoSolution`, spec.md §7).
    async fn resolve(
        &self,
        universe: &[PkgDesc],
        request: &Request,
        reinstall: &BTreeSet<Nv>,
    ) -> Result<Option<Solution>>;
}

#[enum_dispatch(SolverBackend)]
pub enum SolverImpl {
    Reference(ReferenceSolver),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceSolver;

#[async_trait]
impl SolverBackend for ReferenceSolver {
    async fn resolve(
        &self,
        universe: &[PkgDesc],
        request: &Request,
        reinstall: &BTreeSet<Nv>,
    ) -> Result<Option<Solution>> {
        if !request.wish_remove.is_empty() {
            return Ok(resolve_remove(universe, request));
        }
        if !request.wish_upgrade.is_empty() {
            return resolve_upgrade(universe, request, reinstall).map(Some);
        }
        resolve_install(universe, request, reinstall)
    }
}

/// `name -> PkgDesc` for the highest available version of each name.
fn latest_by_name(universe: &[PkgDesc]) -> BTreeMap<&PkgName, &PkgDesc> {
    let mut latest: BTreeMap<&PkgName, &PkgDesc> = BTreeMap::new();
    for desc in universe {
        latest
            .entry(desc.nv.name())
            .and_modify(|current| {
                if desc.nv.version() > current.nv.version() {
                    *current = desc;
                }
            })
            .or_insert(desc);
    }
    latest
}

fn find_matching<'u>(
    universe: &'u [PkgDesc],
    name: &PkgName,
    constraint: &VersionConstraint,
) -> Option<&'u PkgDesc> {
    universe
        .iter()
        .filter(|d| d.nv.name() == name && constraint.matches(d.nv.version()))
        .max_by(|a, b| a.nv.version().cmp(b.nv.version()))
}

/// DFS over `depends`, selecting one NV per name and detecting conflicts.
/// Returns `None` on the first unsatisfiable dependency or conflict —
/// there is no backtracking, which is the simplification this reference
/// solver makes relative to a real CDCL/CUDF search.
fn select_closure(universe: &[PkgDesc], roots: &[(PkgName, VersionConstraint)]) -> Option<BTreeMap<PkgName, Nv>> {
    let mut selected: BTreeMap<PkgName, Nv> = BTreeMap::new();
    let mut stack: Vec<(PkgName, VersionConstraint)> = roots.to_vec();
    let mut visiting: HashSet<PkgName> = HashSet::new();

    while let Some((name, constraint)) = stack.pop() {
        if let Some(existing) = selected.get(&name) {
            if !constraint.matches(existing.version()) {
                return None;
            }
            continue;
        }
        if !visiting.insert(name.clone()) {
            continue;
        }
        let desc = find_matching(universe, &name, &constraint)?;
        selected.insert(name.clone(), desc.nv.clone());
        for dep in desc.depends.iter() {
            stack.push((dep.name.clone(), dep.constraint.clone()));
        }
    }

    for desc in universe {
        let Some(selected_nv) = selected.get(desc.nv.name()) else {
            continue;
        };
        if selected_nv != &desc.nv {
            continue;
        }
        for conflict in desc.conflicts.iter() {
            if let Some(other) = selected.get(&conflict.name) {
                if conflict.constraint.matches(other.version()) {
                    return None;
                }
            }
        }
    }

    Some(selected)
}

fn resolve_install(
    universe: &[PkgDesc],
    request: &Request,
    reinstall: &BTreeSet<Nv>,
) -> Result<Option<Solution>> {
    let Some(selected) = select_closure(universe, &request.wish_install) else {
        return Ok(None);
    };

    let currently_installed: BTreeMap<&PkgName, &Nv> = universe
        .iter()
        .filter(|d| d.installed)
        .map(|d| (d.nv.name(), &d.nv))
        .collect();

    let mut nodes = Vec::new();
    let mut index_of: BTreeMap<PkgName, usize> = BTreeMap::new();

    for (name, nv) in selected.iter() {
        let action = match currently_installed.get(name) {
            Some(&current) if current == nv => {
                if reinstall.contains(nv) {
                    Action::Recompile(nv.clone())
                } else {
                    continue;
                }
            }
            Some(&current) => Action::Change {
                from: Some(current.clone()),
                to: nv.clone(),
            },
            None => Action::Change { from: None, to: nv.clone() },
        };
        index_of.insert(name.clone(), nodes.len());
        nodes.push(ActionNode { action, depends_on: Vec::new() });
    }

    for (name, idx) in index_of.clone() {
        let Some(desc) = universe.iter().find(|d| d.nv.name() == &name && Some(&d.nv) == selected.get(&name)) else {
            continue;
        };
        let mut deps = Vec::new();
        for dep in desc.depends.iter() {
            if let Some(&dep_idx) = index_of.get(&dep.name) {
                if dep_idx != idx {
                    deps.push(dep_idx);
                }
            }
        }
        nodes[idx].depends_on = deps;
    }

    Ok(Some(Solution { to_remove: Vec::new(), to_add: nodes }))
}

fn resolve_remove(universe: &[PkgDesc], request: &Request) -> Option<Solution> {
    let target = request.wish_remove.first()?.clone();

    let installed: Vec<&PkgDesc> = universe.iter().filter(|d| d.installed).collect();
    let closure = dependent_closure(&installed, &target);

    // A member of the closure is removable once nothing else still in the
    // closure depends on it (leaves-first, spec.md §4.5 step 2).
    let mut remaining = closure.clone();
    let mut order = Vec::new();

    while !remaining.is_empty() {
        let removable: Vec<Nv> = remaining
            .iter()
            .filter(|nv| {
                !remaining.iter().any(|other| {
                    other != *nv
                        && installed
                            .iter()
                            .find(|d| &d.nv == other)
                            .is_some_and(|d| d.depends.iter().any(|dep| &dep.name == nv.name()))
                })
            })
            .cloned()
            .collect();
        if removable.is_empty() {
            // A dependency cycle among installed packages would land here;
            // the DAG contract assumes Installed is always acyclic.
            break;
        }
        for nv in &removable {
            remaining.remove(nv);
        }
        order.extend(removable);
    }

    Some(Solution { to_remove: order, to_add: Vec::new() })
}

/// Every installed NV that transitively depends on `target`, plus `target`
/// itself (spec.md §4.4's `remove`'s "forward_closure(target)").
fn dependent_closure(installed: &[&PkgDesc], target: &PkgName) -> BTreeSet<Nv> {
    let mut closure = BTreeSet::new();
    let Some(target_nv) = installed.iter().find(|d| d.nv.name() == target).map(|d| d.nv.clone()) else {
        return closure;
    };
    closure.insert(target_nv);

    loop {
        let mut added = false;
        for desc in installed {
            if closure.contains(&desc.nv) {
                continue;
            }
            if desc.depends.iter().any(|dep| closure.iter().any(|c| c.name() == &dep.name)) {
                closure.insert(desc.nv.clone());
                added = true;
            }
        }
        if !added {
            break;
        }
    }
    closure
}

fn resolve_upgrade(
    universe: &[PkgDesc],
    request: &Request,
    reinstall: &BTreeSet<Nv>,
) -> Result<Solution> {
    let latest = latest_by_name(universe);
    let mut nodes = Vec::new();
    let mut index_of: BTreeMap<PkgName, usize> = BTreeMap::new();

    for (name, constraint) in &request.wish_upgrade {
        let Some(&target) = latest.get(name) else {
            return Err(Error::UnknownPackage(name.clone()));
        };
        if !constraint.matches(target.nv.version()) {
            continue;
        }
        let current = universe
            .iter()
            .find(|d| d.installed && d.nv.name() == name)
            .map(|d| d.nv.clone());
        if current.as_ref() == Some(&target.nv) && !reinstall.contains(&target.nv) {
            continue;
        }
        index_of.insert(name.clone(), nodes.len());
        nodes.push(ActionNode {
            action: Action::Change { from: current, to: target.nv.clone() },
            depends_on: Vec::new(),
        });
    }

    for (name, idx) in index_of.clone() {
        let Some(desc) = latest.get(&name) else { continue };
        let deps: Vec<usize> = desc
            .depends
            .iter()
            .filter_map(|dep| index_of.get(&dep.name).copied())
            .filter(|&dep_idx| dep_idx != idx)
            .collect();
        nodes[idx].depends_on = deps;
    }

    Ok(Solution { to_remove: Vec::new(), to_add: nodes })
}

/// spec.md §6: the transitive dependency closure of `seeds` within
/// `universe`.
pub fn filter_forward_dependencies(universe: &[PkgDesc], seeds: &[PkgName]) -> Vec<PkgDesc> {
    let mut closure: BTreeSet<PkgName> = seeds.iter().cloned().collect();
    loop {
        let mut added = false;
        for desc in universe {
            if !closure.contains(desc.nv.name()) {
                continue;
            }
            for dep in desc.depends.iter().chain(desc.depopts.iter()) {
                if closure.insert(dep.name.clone()) {
                    added = true;
                }
            }
        }
        if !added {
            break;
        }
    }
    universe.iter().filter(|d| closure.contains(d.nv.name())).cloned().collect()
}

/// spec.md §6: the transitive set of packages depending (directly or
/// indirectly) on `seeds` within `universe`.
pub fn filter_backward_dependencies(universe: &[PkgDesc], seeds: &[PkgName]) -> Vec<PkgDesc> {
    let seed_descs: Vec<&PkgDesc> = universe.iter().filter(|d| seeds.contains(d.nv.name())).collect();
    let mut closure: BTreeSet<Nv> = seed_descs.iter().map(|d| d.nv.clone()).collect();
    loop {
        let mut added = false;
        for desc in universe {
            if closure.contains(&desc.nv) {
                continue;
            }
            if desc.depends.iter().any(|dep| closure.iter().any(|c| c.name() == &dep.name)) {
                closure.insert(desc.nv.clone());
                added = true;
            }
        }
        if !added {
            break;
        }
    }
    universe.iter().filter(|d| closure.contains(&d.nv)).cloned().collect()
}
