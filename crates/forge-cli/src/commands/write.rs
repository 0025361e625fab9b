// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The write-path commands (spec.md §4.4-§4.6, §4.8). Callers are expected
//! to already hold the root lock except for `init`/`switch`, which acquire
//! it themselves inside `forge-switch` (see `main.rs`'s dispatcher).

use std::path::Path;
use std::sync::Arc;

use forge_foundation::{
    Alias, CompilerVersion, PkgName, PkgSpec, RepoAddress, RepoKind, RepoName, Repository,
};
use forge_schema::{doc, Manifest, Pinned};
use forge_solve::{build_universe, Request, SolverBackend};
use forge_storage::State;

use crate::error::{Error, Result};

fn print_plan(to_remove: &[forge_foundation::Nv], to_add: &[forge_solve::ActionNode]) {
    for nv in to_remove {
        println!("- remove {nv}");
    }
    for node in to_add {
        match &node.action {
            forge_solve::Action::Change { from: Some(from), to } => println!("- change {from} -> {to}"),
            forge_solve::Action::Change { from: None, to } => println!("- install {to}"),
            forge_solve::Action::Recompile(nv) => println!("- recompile {nv}"),
        }
    }
}

pub async fn init(
    root: &Path,
    alias: Alias,
    compiler: CompilerVersion,
    repo_name: RepoName,
    repo_address: RepoAddress,
    repo_kind: RepoKind,
    workers: usize,
) -> Result<()> {
    let repo = Repository { name: repo_name, address: repo_address, kind: repo_kind };
    forge_switch::init(root, alias, compiler, repo, workers).await?;
    Ok(())
}

pub async fn update(root: &Path) -> Result<()> {
    let report = forge_repo::update(root).await?;
    let total: usize = report.updated.values().map(|set| set.len()).sum();
    println!("refreshed {total} package(s) across {} repositor(y/ies)", report.updated.len());
    if !report.updated_and_installed.is_empty() {
        println!("flagged for reinstall: {}", report.updated_and_installed.len());
    }
    Ok(())
}

pub async fn install(root: &Path, specs: &[PkgSpec], dry_run: bool, confirm: Arc<dyn forge_exec::Confirm>) -> Result<()> {
    let state = State::load(root)?;
    let request = Request::install(specs, state.installed());
    let universe = build_universe(&state, false)?;
    let reinstall = state.reinstall().iter().cloned().collect();
    let solution = SolverBackend::resolve(&forge_solve::ReferenceSolver, &universe, &request, &reinstall)
        .await?
        .ok_or(Error::NoSolution)?;

    if dry_run {
        print_plan(&solution.to_remove, &solution.to_add);
        return Ok(());
    }
    forge_exec::execute(root, &solution, confirm).await?;
    Ok(())
}

pub async fn remove(root: &Path, pkg: PkgName, dry_run: bool, confirm: Arc<dyn forge_exec::Confirm>) -> Result<()> {
    if pkg == forge_switch::base_package_name() {
        return Err(forge_exec::Error::UnknownPackage(pkg).into());
    }
    let state = State::load(root)?;
    let universe = build_universe(&state, false)?;
    let dependents = forge_solve::filter_backward_dependencies(&universe, std::slice::from_ref(&pkg));
    let dependent_names: std::collections::BTreeSet<&PkgName> = dependents.iter().map(|d| d.nv.name()).collect();

    let kept: Vec<(PkgName, forge_foundation::PkgVersion)> = state
        .installed()
        .iter()
        .filter(|nv| !dependent_names.contains(nv.name()))
        .map(|nv| (nv.name().clone(), nv.version().clone()))
        .collect();

    let request = Request::remove(pkg, &kept);
    let reinstall = state.reinstall().iter().cloned().collect();
    let solution = SolverBackend::resolve(&forge_solve::ReferenceSolver, &universe, &request, &reinstall)
        .await?
        .ok_or(Error::NoSolution)?;

    if dry_run {
        print_plan(&solution.to_remove, &solution.to_add);
        return Ok(());
    }
    forge_exec::execute(root, &solution, confirm).await?;
    Ok(())
}

pub async fn upgrade(root: &Path, dry_run: bool, confirm: Arc<dyn forge_exec::Confirm>) -> Result<()> {
    let state = State::load(root)?;
    let candidates: Vec<(PkgName, forge_foundation::PkgVersion)> = state
        .installed()
        .iter()
        .filter_map(|nv| {
            let latest = state
                .available()
                .iter()
                .filter(|a| a.name() == nv.name())
                .map(|a| a.version())
                .max()?;
            (latest > nv.version()).then(|| (nv.name().clone(), latest.clone()))
        })
        .collect();

    let request = Request::upgrade(&candidates, state.pinned());
    let universe = build_universe(&state, true)?;
    let reinstall = state.reinstall().iter().cloned().collect();
    let solution = SolverBackend::resolve(&forge_solve::ReferenceSolver, &universe, &request, &reinstall)
        .await?
        .ok_or(Error::NoSolution)?;

    if dry_run {
        print_plan(&solution.to_remove, &solution.to_add);
        return Ok(());
    }
    forge_exec::execute(root, &solution, confirm).await?;
    Ok(())
}

pub async fn switch(
    root: &Path,
    clone: bool,
    alias: Alias,
    compiler: CompilerVersion,
    dry_run: bool,
    confirm: Arc<dyn forge_exec::Confirm>,
) -> Result<()> {
    if dry_run {
        println!("switch {alias} (compiler {compiler}, clone={clone}) -- dry run, nothing executed");
        return Ok(());
    }
    forge_switch::switch(root, clone, alias, compiler, confirm).await?;
    Ok(())
}

pub async fn upload(
    root: &Path,
    opam: &Path,
    descr: Option<&Path>,
    archive: &Path,
    repo_name: Option<RepoName>,
    dry_run: bool,
) -> Result<()> {
    let state = State::load(root)?;
    let repo = match repo_name {
        Some(name) => state
            .config()
            .repos
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or(Error::Exec(forge_exec::Error::UnknownRepo(name.to_string())))?,
        None => state
            .config()
            .repos
            .first()
            .cloned()
            .ok_or_else(|| Error::Exec(forge_exec::Error::UnknownRepo("(none configured)".to_string())))?,
    };

    let manifest: Manifest = doc::read_optional(opam)?.ok_or_else(|| {
        Error::Read(opam.to_owned(), std::io::Error::new(std::io::ErrorKind::NotFound, "opam file not found"))
    })?;
    let nv = manifest.nv();

    if dry_run {
        println!("upload {nv} to {} -- dry run, nothing executed", repo.name);
        return Ok(());
    }

    let backend = forge_repo::backend_for(&repo, state.global_paths());
    let artifacts = forge_repo::UploadArtifacts { opam, descr, archive };
    forge_repo::RepoBackend::upload(&backend, &nv, &artifacts).await?;
    println!("uploaded {nv} to {}", repo.name);
    Ok(())
}

pub async fn remote_add(root: &Path, name: RepoName, address: RepoAddress, kind: RepoKind, dry_run: bool) -> Result<()> {
    let state = State::load(root)?;
    if dry_run {
        println!("remote add {name} ({kind}) {address} -- dry run, nothing executed");
        return Ok(());
    }
    let mut config = state.config().clone();
    config.repos.push(Repository { name: name.clone(), address, kind });
    doc::write(&state.global_paths().config(), &config)?;

    let repo = config.repos.last().expect("just pushed");
    let backend = forge_repo::backend_for(repo, state.global_paths());
    forge_repo::RepoBackend::init(&backend).await?;
    println!("added repository {name}");
    Ok(())
}

pub async fn remote_rm(root: &Path, name: &RepoName, dry_run: bool) -> Result<()> {
    let state = State::load(root)?;
    if dry_run {
        println!("remote rm {name} -- dry run, nothing executed");
        return Ok(());
    }
    let mut config = state.config().clone();
    config.repos.retain(|r| &r.name != name);
    doc::write(&state.global_paths().config(), &config)?;
    println!("removed repository {name}");
    Ok(())
}

pub async fn pin(root: &Path, pkg: PkgName) -> Result<()> {
    let state = State::load(root)?;
    if state.installed_version(&pkg).is_none() {
        return Err(Error::NotInstalled(pkg));
    }
    let mut pinned: Pinned = doc::read(&state.switch_paths().pinned())?;
    pinned.insert(pkg.clone());
    doc::write(&state.switch_paths().pinned(), &pinned)?;
    println!("pinned {pkg}");
    Ok(())
}

pub async fn unpin(root: &Path, pkg: PkgName) -> Result<()> {
    let state = State::load(root)?;
    let mut pinned: Pinned = doc::read(&state.switch_paths().pinned())?;
    pinned.remove(&pkg);
    doc::write(&state.switch_paths().pinned(), &pinned)?;
    println!("unpinned {pkg}");
    Ok(())
}
