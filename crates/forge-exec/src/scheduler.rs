// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The top-level `execute()` entry point driving a [`Solution`] to
//! completion (spec.md §4.5, §5 "Concurrency & Resource Model").
//!
//! Removals run sequentially in the solver's leaves-first order. Additions
//! and recompiles run as a bounded-parallel DAG: a node is dispatched once
//! every node it `depends_on` has completed successfully, and no more than
//! `workers` nodes run at once. Installed-set mutation always happens in
//! this function, after a worker task returns — never inside the worker —
//! so every freshly-dispatched worker observes an on-disk state that
//! reflects everything finished so far.

use std::sync::Arc;

use forge_foundation::Nv;
use forge_schema::doc;
use forge_solve::{Action, Solution};
use forge_storage::State;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::install::install_one_nv;
use crate::remove::remove_one_nv;

/// Run `solution` to completion against the switch rooted at `root`.
///
/// Returns the first error encountered. On a build failure mid-DAG, nodes
/// already in flight are allowed to finish but no new nodes are dispatched,
/// and the node that was being installed is best-effort removed again so a
/// half-installed package is never left registered (spec.md §4.5's
/// "Atomicity" note).
pub async fn execute(root: &std::path::Path, solution: &Solution, confirm: Arc<dyn Confirm>) -> Result<()> {
    if solution.to_remove.is_empty() && solution.to_add.is_empty() {
        return Ok(());
    }

    let summary = format!(
        "remove {} package(s), install/recompile {} package(s)",
        solution.to_remove.len(),
        solution.to_add.len()
    );
    if !confirm.confirm(&summary).await {
        return Err(Error::Cancelled);
    }

    run_removals(root, &solution.to_remove).await?;
    run_additions(root, solution, confirm).await
}

async fn run_removals(root: &std::path::Path, to_remove: &[Nv]) -> Result<()> {
    for nv in to_remove {
        let state = State::load(root)?;
        remove_one_nv(&state, nv).await?;

        let mut installed = state.installed().clone();
        installed.remove(nv);
        let mut reinstall = state.reinstall().clone();
        reinstall.retain_installed(&installed);

        doc::write(&state.switch_paths().installed(), &installed)?;
        doc::write(&state.switch_paths().reinstall(), &reinstall)?;
        info!(%nv, "removed package");
    }
    Ok(())
}

async fn run_additions(root: &std::path::Path, solution: &Solution, confirm: Arc<dyn Confirm>) -> Result<()> {
    let n = solution.to_add.len();
    if n == 0 {
        return Ok(());
    }

    let workers = State::load(root)?.config().workers.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));

    let mut started = vec![false; n];
    let mut completed = vec![false; n];
    let mut first_error: Option<Error> = None;
    let mut join_set: JoinSet<(usize, Result<()>)> = JoinSet::new();
    let mut in_flight = 0usize;

    loop {
        if first_error.is_none() {
            for idx in 0..n {
                if started[idx] {
                    continue;
                }
                let node = &solution.to_add[idx];
                if !node.depends_on.iter().all(|&dep| completed[dep]) {
                    continue;
                }
                started[idx] = true;
                in_flight += 1;
                let permit = semaphore.clone().acquire_owned().await.expect("semaphore not closed");
                let root = root.to_owned();
                let action = node.action.clone();
                let confirm = confirm.clone();
                join_set.spawn(async move {
                    let _permit = permit;
                    let result = run_one_action(&root, &action, confirm.as_ref()).await;
                    (idx, result)
                });
            }
        }

        if in_flight == 0 {
            break;
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        in_flight -= 1;
        let (idx, result) = joined.expect("action task panicked");

        match result {
            Ok(()) => {
                persist_success(root, solution.to_add[idx].action.target())?;
                completed[idx] = true;
            }
            Err(e) => {
                warn!(error = %e, "action failed, compensating");
                compensate(root, &solution.to_add[idx].action).await;
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn run_one_action(root: &std::path::Path, action: &Action, confirm: &dyn Confirm) -> Result<()> {
    let state = State::load(root)?;
    match action {
        Action::Change { from: Some(from), to } => {
            remove_one_nv(&state, from).await?;
            install_one_nv(&state, to, confirm).await
        }
        Action::Change { from: None, to } => install_one_nv(&state, to, confirm).await,
        Action::Recompile(nv) => install_one_nv(&state, nv, confirm).await,
    }
}

/// Fold a completed action's target into the on-disk Installed/Reinstall
/// sets. Runs only in the scheduler, never inside a worker task.
fn persist_success(root: &std::path::Path, nv: &Nv) -> Result<()> {
    let state = State::load(root)?;
    let mut installed = state.installed().clone();
    installed.replace(nv.clone());
    let mut reinstall = state.reinstall().clone();
    reinstall.remove(nv);

    doc::write(&state.switch_paths().installed(), &installed)?;
    doc::write(&state.switch_paths().reinstall(), &reinstall)?;
    Ok(())
}

/// Best-effort undo of a failed action so no half-built package is left
/// registered. Errors here are swallowed; the original failure is what
/// gets reported.
async fn compensate(root: &std::path::Path, action: &Action) {
    let Ok(state) = State::load(root) else { return };
    let _ = remove_one_nv(&state, action.target()).await;
}
