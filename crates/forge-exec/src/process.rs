// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Running one manifest `build`/`remove` command (spec.md §4.5(e)).

use std::path::Path;

use forge_foundation::Nv;
use forge_schema::Command as Argv;
use forge_storage::State;
use tracing::debug;

use crate::env::Env;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Build,
    Remove,
}

/// String-substitute each argument, then run the command with the composed
/// environment in `cwd`, mapping a non-zero exit to `BuildFailed`/`RemoveFailed`.
pub async fn run_command(
    state: &State,
    argv: &Argv,
    cwd: &Path,
    env: &Env,
    nv: &Nv,
    kind: CommandKind,
) -> Result<()> {
    let Some((program, rest)) = argv.split_first() else {
        return Ok(());
    };
    let mut substituted = Vec::with_capacity(rest.len());
    for arg in rest {
        substituted.push(forge_subst::substitute_string(state, arg)?);
    }

    debug!(%nv, program, args = ?substituted, "running command");

    let status = tokio::process::Command::new(program)
        .args(&substituted)
        .current_dir(cwd)
        .env_clear()
        .envs(env)
        .status()
        .await
        .map_err(|e| Error::Spawn(program.clone(), e))?;

    if status.success() {
        return Ok(());
    }
    match kind {
        CommandKind::Build => Err(Error::BuildFailed(nv.clone(), status.code().unwrap_or(-1))),
        CommandKind::Remove => Err(Error::RemoveFailed(nv.clone())),
    }
}
