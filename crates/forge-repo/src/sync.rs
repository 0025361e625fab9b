// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The repository synchronizer's `update` algorithm (spec.md §4.3).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use forge_foundation::{Nv, RepoName};
use forge_schema::{doc, Manifest, RepoIndex};
use forge_storage::{GlobalPaths, State};
use tracing::{info, warn};

use crate::backend::{backend_for, RepoBackend};
use crate::error::{Error, Result};

/// What changed during one `update` run, for the CLI to report.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Per-repo NVs the backend reported as new/changed.
    pub updated: BTreeMap<RepoName, BTreeSet<Nv>>,
    /// The subset of `updated` (across all repos) that is also installed
    /// in the current switch — spec.md §4.3 step 3's "flag those present
    /// in the current installed set with a marker".
    pub updated_and_installed: BTreeSet<Nv>,
}

/// Run the full synchronizer algorithm against `root` (spec.md §4.3,
/// steps 1-6). The caller must already hold the root lock.
pub async fn update(root: &Path) -> Result<UpdateReport> {
    let state = State::load(root)?;
    let global = state.global_paths().clone();
    let repos = state.config().repos.clone();

    // Step 1: refresh each repository's local mirror, in declared order.
    let mut report = UpdateReport::default();
    for repo in &repos {
        let backend = backend_for(repo, &global);
        let updated = backend.update().await?;
        info!(repo = %repo.name, count = updated.len(), "refreshed repository mirror");
        report.updated.insert(repo.name.clone(), updated);
    }

    // Step 2: recompute the repo index; first bind wins across repos in
    // declared order.
    let mut repo_index = RepoIndex::default();
    let mut available_by_repo: BTreeMap<RepoName, BTreeSet<Nv>> = BTreeMap::new();
    for repo in &repos {
        let nvs = scan_mirror_packages(&global, &repo.name)?;
        for nv in &nvs {
            repo_index.bind_if_absent(nv.name().clone(), repo.name.clone());
        }
        available_by_repo.insert(repo.name.clone(), nvs);
    }
    doc::write(&global.repo_index(), &repo_index)?;

    // Step 3: union updated NVs into every switch's Reinstall set.
    let all_updated: BTreeSet<Nv> = report.updated.values().flatten().cloned().collect();
    for (alias, _compiler) in state.aliases().iter() {
        let switch = global.switch(alias);
        let installed: forge_schema::Installed = doc::read(&switch.installed())?;
        let mut reinstall: forge_schema::Reinstall = doc::read(&switch.reinstall())?;
        for nv in &all_updated {
            reinstall.insert(nv.clone());
            if installed.contains(nv) {
                report.updated_and_installed.insert(nv.clone());
            }
        }
        doc::write(&switch.reinstall(), &reinstall)?;
    }

    // Step 4: rebuild derived global views (opam/, descr/) from the
    // repo index.
    std::fs::create_dir_all(global.opam_dir()).map_err(|e| Error::Write(global.opam_dir(), e))?;
    std::fs::create_dir_all(global.descr_dir()).map_err(|e| Error::Write(global.descr_dir(), e))?;
    for (name, bound_repo) in repo_index.iter() {
        let nvs = available_by_repo.get(bound_repo).cloned().unwrap_or_default();
        for nv in nvs.iter().filter(|nv| nv.name() == name) {
            let opam_src = global.repo_root(bound_repo).join("packages").join(nv.to_string()).join("opam");
            link_or_copy(&opam_src, &global.opam_link(nv))?;

            let descr_src = global.repo_root(bound_repo).join("packages").join(nv.to_string()).join("descr");
            if descr_src.exists() {
                link_or_copy(&descr_src, &global.descr_link(nv))?;
            } else {
                warn!(%nv, "package has no description file");
            }

            let archive_src = global.repo_root(bound_repo).join("archives").join(format!("{nv}.tar.gz"));
            if archive_src.exists() {
                link_or_copy(&archive_src, &global.archive_link(nv))?;
            }
        }
    }

    // Step 5: relink compiler descriptions from every repository.
    std::fs::create_dir_all(global.compiler_dir()).map_err(|e| Error::Write(global.compiler_dir(), e))?;
    for repo in &repos {
        let compilers_dir = global.repo_root(&repo.name).join("compilers");
        let Ok(entries) = std::fs::read_dir(&compilers_dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("comp") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(version) = stem.parse() {
                    link_or_copy(&path, &global.compiler_link(&version))?;
                }
            }
        }
    }

    // Step 6: reload and verify consistency.
    let reloaded = State::load(root)?;
    verify_consistency(&reloaded)?;

    Ok(report)
}

fn scan_mirror_packages(global: &GlobalPaths, repo: &RepoName) -> Result<BTreeSet<Nv>> {
    let dir = global.repo_root(repo).join("packages");
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(Error::Read(dir, e)),
    };
    let mut nvs = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read(dir.clone(), e))?;
        if let Some(nv) = entry.file_name().to_str().and_then(|s| s.parse::<Nv>().ok()) {
            nvs.insert(nv);
        }
    }
    Ok(nvs)
}

/// spec.md §4.3 step 6: every available NV's manifest must declare itself
/// consistently, and every dependency must resolve within Available.
fn verify_consistency(state: &State) -> Result<()> {
    for nv in state.available() {
        let manifest_path = state.global_paths().opam_link(nv);
        let manifest = Manifest::load_checked(&manifest_path, nv)?;
        for dep in manifest.all_dependency_names() {
            if !state.available().iter().any(|available| available.name() == dep) {
                return Err(Error::InconsistentRepo {
                    nv: nv.clone(),
                    dep: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

fn link_or_copy(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write(parent.to_owned(), e))?;
    }
    let _ = std::fs::remove_file(dst);
    if std::fs::hard_link(src, dst).is_ok() {
        return Ok(());
    }
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| Error::Write(dst.to_owned(), e))
}
