// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! `switch` (spec.md §4.6): point the current alias at a switch,
//! initializing it if new, then resolve and execute an install of the
//! target compiler's required packages (optionally unioned with the
//! previous switch's Installed set).

use std::sync::Arc;

use forge_foundation::{Alias, CompilerVersion};
use forge_schema::{doc, AliasMap, CompilerDescr};
use forge_solve::{build_universe, Request, SolverBackend};
use forge_storage::{GlobalPaths, RootLock, State};

use crate::base::base_package_name;
use crate::error::{Error, Result};
use crate::init::init_switch;

/// Resolve `compiler_version` for `alias`: if the alias is already
/// registered, its recorded compiler wins over a possibly stale argument.
fn resolve_target_compiler(aliases: &AliasMap, alias: &Alias, compiler_version: CompilerVersion) -> CompilerVersion {
    aliases.get(alias).cloned().unwrap_or(compiler_version)
}

pub async fn switch(
    root: &std::path::Path,
    clone: bool,
    alias: Alias,
    compiler_version: CompilerVersion,
    confirm: Arc<dyn forge_exec::Confirm>,
) -> Result<()> {
    let _lock = RootLock::acquire(root)?;
    let global = GlobalPaths::new(root);

    let before = State::load(root)?;
    // The synthetic `base` package is installed directly per switch
    // (spec.md §4.6); it never appears in Available and is not a name the
    // solver's universe knows about, so clone's union excludes it.
    let base = base_package_name();
    let previous_installed: forge_schema::Installed = before
        .installed()
        .iter()
        .filter(|nv| nv.name() != &base)
        .cloned()
        .collect();

    let aliases: AliasMap = doc::read(&global.aliases())?;
    let target_compiler = resolve_target_compiler(&aliases, &alias, compiler_version);

    let mut config = before.config().clone();
    config.current_alias = alias.clone();
    doc::write(&global.config(), &config)?;

    init_switch(root, &alias, &target_compiler).await?;

    let state = State::load(root)?;
    let descr: CompilerDescr = doc::read(&global.compiler_link(&target_compiler))?;
    let clone_from = clone.then_some(&previous_installed);
    let request = Request::switch(&descr.packages, clone_from);

    let universe = build_universe(&state, false)?;
    let reinstall = state.reinstall().iter().cloned().collect();
    let solver = forge_solve::ReferenceSolver;
    let solution = solver
        .resolve(&universe, &request, &reinstall)
        .await?
        .ok_or(Error::NoSolution)?;

    forge_exec::execute(root, &solution, confirm).await?;
    tracing::info!(%alias, compiler = %target_compiler, "switched");
    Ok(())
}
