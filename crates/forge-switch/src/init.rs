// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! `init`/`init_switch` (spec.md §4.6).

use forge_foundation::{Alias, CompilerVersion, Repository};
use forge_repo::{backend_for, RepoBackend};
use forge_schema::{doc, AliasMap, CompilerDescr, GlobalConfig, Installed, FORMAT_VERSION};
use forge_storage::{GlobalPaths, RootLock, State};

use crate::base::install_base_package;
use crate::bootstrap::bootstrap_compiler;
use crate::error::{Error, Result};

/// Write initial config, create global directories, initialize the
/// repository backend, then call [`init_switch`]. Rolls the whole root back
/// on any failure.
pub async fn init(root: &std::path::Path, alias: Alias, compiler_version: CompilerVersion, repo: Repository, workers: usize) -> Result<()> {
    let global = GlobalPaths::new(root);
    if global.config().exists() {
        return Err(Error::AlreadyInitialized(root.to_owned()));
    }

    std::fs::create_dir_all(root).map_err(|e| Error::CreateDir(root.to_owned(), e))?;
    let lock = RootLock::acquire(root)?;

    let result = init_inner(root, &global, &alias, &compiler_version, repo, workers).await;
    if let Err(e) = result {
        drop(lock);
        let _ = std::fs::remove_dir_all(root);
        return Err(e);
    }
    Ok(())
}

async fn init_inner(
    root: &std::path::Path,
    global: &GlobalPaths,
    alias: &Alias,
    compiler_version: &CompilerVersion,
    repo: Repository,
    workers: usize,
) -> Result<()> {
    for dir in global.top_level_dirs() {
        std::fs::create_dir_all(&dir).map_err(|e| Error::CreateDir(dir, e))?;
    }
    doc::write(&global.aliases(), &AliasMap::default())?;

    let config = GlobalConfig {
        format_version: FORMAT_VERSION.to_string(),
        repos: vec![repo.clone()],
        current_alias: alias.clone(),
        workers: workers.max(1),
    };
    doc::write(&global.config(), &config)?;

    let backend = backend_for(&repo, global);
    backend.init().await?;

    init_switch(root, alias, compiler_version).await
}

/// No-op if the switch directory already exists. Otherwise creates the
/// switch tree, writes an empty Installed, appends `(alias, compiler)` to
/// the AliasMap, installs the synthetic `base` package, runs `update`, and
/// bootstraps the compiler unless it is preinstalled. All enclosed in a
/// rollback that erases the switch dir and restores the AliasMap on
/// failure.
pub async fn init_switch(root: &std::path::Path, alias: &Alias, compiler_version: &CompilerVersion) -> Result<()> {
    let global = GlobalPaths::new(root);
    let switch = global.switch(alias);
    if switch.root().exists() {
        return Ok(());
    }

    let mut aliases: AliasMap = doc::read(&global.aliases())?;
    let already_present = aliases.contains(alias);
    aliases.insert(alias.clone(), compiler_version.clone());
    doc::write(&global.aliases(), &aliases)?;

    let result = init_switch_inner(root, alias, compiler_version).await;
    if let Err(e) = result {
        let _ = std::fs::remove_dir_all(switch.root());
        if !already_present {
            if let Ok(mut restored) = doc::read::<AliasMap>(&global.aliases()) {
                restored.remove(alias);
                let _ = doc::write(&global.aliases(), &restored);
            }
        }
        return Err(e);
    }
    Ok(())
}

async fn init_switch_inner(root: &std::path::Path, alias: &Alias, compiler_version: &CompilerVersion) -> Result<()> {
    let global = GlobalPaths::new(root);
    let switch = global.switch(alias);

    for dir in switch.top_level_dirs() {
        std::fs::create_dir_all(&dir).map_err(|e| Error::CreateDir(dir, e))?;
    }
    doc::write(&switch.installed(), &Installed::default())?;

    let base_nv = install_base_package(&switch, compiler_version)?;
    let installed: Installed = std::iter::once(base_nv.clone()).collect();
    doc::write(&switch.installed(), &installed)?;

    forge_repo::update(root).await?;

    let descr: CompilerDescr = doc::read(&global.compiler_link(compiler_version))?;
    let state = State::load(root)?;
    let build_dir = switch.build_dir(&base_nv);
    bootstrap_compiler(&state, &descr, &base_nv, &build_dir).await?;

    tracing::info!(%alias, %compiler_version, "switch initialized");
    Ok(())
}
