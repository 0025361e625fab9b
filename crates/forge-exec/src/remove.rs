// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Remove of one NV (spec.md §4.5 "Remove of one NV (`todelete`)").

use forge_foundation::Nv;
use forge_schema::{doc, InstallDescriptor, Manifest};
use forge_storage::State;
use tracing::debug;

use crate::env::Env;
use crate::error::{Error, Result};
use crate::process::{run_command, CommandKind};

/// Run the package's `remove` script (if any), then delete its libs, bins,
/// misc files, and per-switch descriptor/config.
pub async fn remove_one_nv(state: &State, nv: &Nv) -> Result<()> {
    let switch = state.switch_paths();
    let pkg = nv.name();

    let build_dir = switch.build_dir(nv);
    let cwd = if build_dir.exists() {
        build_dir
    } else {
        state.root().to_owned()
    };

    if let Ok(manifest) = Manifest::load_checked(&state.global_paths().opam_link(nv), nv) {
        if !manifest.remove.is_empty() {
            let mut env = Env::new();
            let ambient_path = std::env::var("PATH").unwrap_or_default();
            let path = if ambient_path.is_empty() {
                switch.bin_dir().display().to_string()
            } else {
                format!("{}:{ambient_path}", switch.bin_dir().display())
            };
            env.insert("PATH".to_string(), path);
            for command in &manifest.remove {
                run_command(state, command, &cwd, &env, nv, CommandKind::Remove).await?;
            }
        }
    }

    let descriptor_path = switch.package_install(pkg);
    if let Some(descriptor) = doc::read_optional::<InstallDescriptor>(&descriptor_path)? {
        let lib_dir = switch.lib_dir(pkg);
        if lib_dir.exists() {
            std::fs::remove_dir_all(&lib_dir).map_err(|e| Error::Write(lib_dir, e))?;
        }
        for entry in &descriptor.bin {
            let _ = std::fs::remove_file(switch.bin_path(&entry.dst_basename()));
        }
        for entry in &descriptor.misc {
            let _ = std::fs::remove_file(&entry.dst);
        }
    }
    let _ = std::fs::remove_file(&descriptor_path);
    let _ = std::fs::remove_file(switch.package_config(pkg));
    debug!(%nv, "removed");

    Ok(())
}
