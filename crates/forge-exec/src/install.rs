// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Install of one NV (spec.md §4.5 `tochange`) and the consistency checks
//! that gate its final copy step.

use std::collections::BTreeSet;

use forge_foundation::{Nv, PkgName, Section};
use forge_schema::{doc, BuildConfig, InstallDescriptor, Manifest};
use forge_storage::State;
use tracing::info;

use crate::archive::{ensure_archive, extract_archive};
use crate::confirm::Confirm;
use crate::env::{compose_env, persist_env};
use crate::error::{Error, Result};
use crate::process::{run_command, CommandKind};

/// spec.md §4.5 "Install of one NV (`tochange`)", steps (b) through (g).
/// Step (a) — removing an older NV first — is the caller's responsibility
/// (the scheduler runs `remove_one_nv` on `from` before calling this for a
/// `Change` action).
pub async fn install_one_nv(state: &State, nv: &Nv, confirm: &dyn Confirm) -> Result<()> {
    let global = state.global_paths();
    let switch = state.switch_paths();

    let manifest = Manifest::load_checked(&global.opam_link(nv), nv)?;

    // (b) clear and repopulate the build directory.
    let build_dir = switch.build_dir(nv);
    if build_dir.exists() {
        std::fs::remove_dir_all(&build_dir).map_err(|e| Error::Write(build_dir.clone(), e))?;
    }
    std::fs::create_dir_all(&build_dir).map_err(|e| Error::Write(build_dir.clone(), e))?;

    let archive = ensure_archive(state, nv).await?;
    extract_archive(&archive, &build_dir)?;

    // (c) file substitution.
    for template in &manifest.substs {
        forge_subst::substitute_file(state, &build_dir.join(template))?;
    }

    // (d) compose and persist the environment.
    let compiler_path = global.compiler_link(state.current_compiler());
    let compiler: forge_schema::CompilerDescr = doc::read(&compiler_path)?;
    let (env, ambient) = compose_env(&compiler, &switch.bin_dir());
    persist_env(&build_dir, &env, &ambient)?;

    // (e) run the build.
    for command in &manifest.build {
        run_command(state, command, &build_dir, &env, nv, CommandKind::Build).await?;
    }
    info!(%nv, "build completed");

    // (f) consistency checks, then copy artifacts.
    let descriptor_path = build_dir.join(format!("{}.install", manifest.name));
    let descriptor: InstallDescriptor = doc::read(&descriptor_path)?;
    let build_config_path = build_dir.join(format!("{}.config", manifest.name));
    let build_config: BuildConfig = doc::read(&build_config_path)?;

    check_sections(&manifest, &build_config)?;
    check_requires(state, &manifest, &build_config)?;

    copy_artifacts(switch, &manifest.name, &build_dir, &descriptor, confirm).await?;

    // (g) persist the descriptor and build config into the switch.
    doc::write(&switch.package_install(&manifest.name), &descriptor)?;
    doc::write(&switch.package_config(&manifest.name), &build_config)?;

    Ok(())
}

async fn copy_artifacts(
    switch: &forge_storage::SwitchPaths,
    pkg: &PkgName,
    build_dir: &std::path::Path,
    descriptor: &InstallDescriptor,
    confirm: &dyn Confirm,
) -> Result<()> {
    let lib_dir = switch.lib_dir(pkg);
    std::fs::create_dir_all(&lib_dir).map_err(|e| Error::Write(lib_dir.clone(), e))?;
    for entry in &descriptor.lib {
        copy_file(&build_dir.join(&entry.src), &lib_dir.join(entry.dst_basename()))?;
    }

    let bin_dir = switch.bin_dir();
    std::fs::create_dir_all(&bin_dir).map_err(|e| Error::Write(bin_dir.clone(), e))?;
    for entry in &descriptor.bin {
        copy_file(&build_dir.join(&entry.src), &bin_dir.join(entry.dst_basename()))?;
    }

    for entry in &descriptor.misc {
        if entry.dst.exists() {
            let prompt = format!("overwrite existing {}?", entry.dst.display());
            if !confirm.confirm(&prompt).await {
                continue;
            }
        }
        copy_file(&build_dir.join(&entry.src), &entry.dst)?;
    }

    Ok(())
}

fn copy_file(src: &std::path::Path, dst: &std::path::Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write(parent.to_owned(), e))?;
    }
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| Error::Write(dst.to_owned(), e))
}

/// Manifest's `libraries`/`syntax` must name exactly the same sections as
/// the build config's (spec.md §4.5 "Consistency checks before copy").
fn check_sections(manifest: &Manifest, config: &BuildConfig) -> Result<()> {
    check_same_sections(&manifest.libraries, &config.libraries)?;
    check_same_sections(&manifest.syntax, &config.syntax)
}

fn check_same_sections(manifest_set: &[Section], config_set: &[Section]) -> Result<()> {
    let manifest_set: BTreeSet<&Section> = manifest_set.iter().collect();
    let config_set: BTreeSet<&Section> = config_set.iter().collect();
    if let Some(section) = manifest_set.symmetric_difference(&config_set).next() {
        return Err(Error::ConfigMismatch((*section).clone()));
    }
    Ok(())
}

/// Every section any local section `requires` must be either locally
/// defined or exported by a direct dependency's manifest (spec.md §4.5).
fn check_requires(state: &State, manifest: &Manifest, config: &BuildConfig) -> Result<()> {
    let local: BTreeSet<&Section> = config.libraries.iter().chain(config.syntax.iter()).collect();

    let mut dependency_sections: BTreeSet<Section> = BTreeSet::new();
    for dep in manifest.depends.iter().chain(manifest.depopts.iter()) {
        let Some(version) = state.installed_version(&dep.name) else {
            continue;
        };
        let dep_nv = Nv::new(dep.name.clone(), version.clone());
        let dep_manifest = Manifest::load_checked(&state.global_paths().opam_link(&dep_nv), &dep_nv)?;
        dependency_sections.extend(dep_manifest.libraries.iter().cloned());
        dependency_sections.extend(dep_manifest.syntax.iter().cloned());
    }

    for section_config in config.sections.values() {
        for required in &section_config.requires {
            if !local.contains(required) && !dependency_sections.contains(required) {
                return Err(Error::UnresolvedRequire(required.clone()));
            }
        }
    }
    Ok(())
}
