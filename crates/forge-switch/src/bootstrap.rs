// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Bootstrapping a compiler distribution (spec.md §4.6 `init_switch`):
//! download, patch, configure, make, make install — or a no-op if the
//! compiler description is marked `preinstalled`.

use std::collections::BTreeMap;
use std::path::Path;

use forge_foundation::Nv;
use forge_schema::CompilerDescr;
use forge_storage::State;

use crate::error::{Error, Result};

/// Run the compiler's bootstrap pipeline in `build_dir`, or return
/// immediately if `descr.preinstalled` is set.
pub async fn bootstrap_compiler(state: &State, descr: &CompilerDescr, base: &Nv, build_dir: &Path) -> Result<()> {
    if descr.preinstalled {
        return Ok(());
    }
    let source_url = descr
        .source_url
        .as_deref()
        .ok_or_else(|| Error::MissingSourceUrl(descr.version.clone()))?;

    let _ = std::fs::remove_dir_all(build_dir);
    std::fs::create_dir_all(build_dir).map_err(|e| Error::CreateDir(build_dir.to_owned(), e))?;
    fetch_source(source_url, build_dir)?;

    for patch in &descr.patches {
        run(state, base, build_dir, "patch", &[String::from("-p1"), String::from("-i"), patch.clone()]).await?;
    }
    run(state, base, build_dir, "./configure", &descr.configure_args).await?;
    run(state, base, build_dir, "make", &descr.make_args).await?;

    let mut install_args = descr.make_args.clone();
    install_args.push("install".to_string());
    run(state, base, build_dir, "make", &install_args).await?;
    Ok(())
}

/// Unpack a local `.tar.gz`/`.tgz` archive at `source_url` into `build_dir`
/// (spec.md §1 non-goals scope out git/http transport; only local archives
/// are fetchable without fabricating a network dependency).
fn fetch_source(source_url: &str, build_dir: &Path) -> Result<()> {
    if !(source_url.ends_with(".tar.gz") || source_url.ends_with(".tgz")) {
        return Err(Error::UnsupportedSourceUrl(source_url.to_string()));
    }
    let path = Path::new(source_url);
    let file = std::fs::File::open(path).map_err(|e| Error::Read(path.to_owned(), e))?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut unpacker = tar::Archive::new(decoder);
    unpacker
        .unpack(build_dir)
        .map_err(|e| Error::Extract(path.to_owned(), e))
}

/// String-substitute `args`, then spawn `program` in `build_dir` with a
/// minimal PATH-only environment, mapping a non-zero exit to
/// `BootstrapFailed`.
async fn run(state: &State, base: &Nv, build_dir: &Path, program: &str, args: &[String]) -> Result<()> {
    let mut substituted = Vec::with_capacity(args.len());
    for arg in args {
        substituted.push(forge_subst::substitute_string(state, arg)?);
    }

    let mut env = BTreeMap::new();
    let ambient_path = std::env::var("PATH").unwrap_or_default();
    let bin_dir = state.switch_paths().bin_dir();
    let path = if ambient_path.is_empty() {
        bin_dir.display().to_string()
    } else {
        format!("{}:{ambient_path}", bin_dir.display())
    };
    env.insert("PATH".to_string(), path);

    tracing::debug!(%base, program, args = ?substituted, "running bootstrap command");

    let status = tokio::process::Command::new(program)
        .args(&substituted)
        .current_dir(build_dir)
        .env_clear()
        .envs(&env)
        .status()
        .await
        .map_err(|e| Error::Spawn(program.to_string(), e))?;

    if status.success() {
        return Ok(());
    }
    Err(Error::BootstrapFailed(program.to_string(), status.code().unwrap_or(-1)))
}
