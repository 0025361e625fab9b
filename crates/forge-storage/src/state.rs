// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The immutable in-memory snapshot of the on-disk world (spec.md §2
//! component 3, §4.1 "State snapshot").

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use forge_foundation::{Alias, CompilerVersion, Nv, PkgName};
use forge_schema::{doc, AliasMap, GlobalConfig, Installed, Pinned, Reinstall, RepoIndex};
use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::{GlobalPaths, SwitchPaths};

/// An immutable view of the forge root at the moment `load` was called.
///
/// Per spec.md §4.1: "All later mutations go through File writes and
/// require a fresh `load()` to observe." Nothing here mutates on disk or
/// touches the network; re-derive a new `State` after any write.
#[derive(Debug)]
pub struct State {
    global: GlobalPaths,
    switch: SwitchPaths,
    config: GlobalConfig,
    aliases: AliasMap,
    current_alias: Alias,
    current_compiler: CompilerVersion,
    repo_index: RepoIndex,
    available: BTreeSet<Nv>,
    installed: Installed,
    reinstall: Reinstall,
    pinned: Pinned,
}

impl State {
    /// Load a fresh snapshot of `root`. Does no network I/O and no writes
    /// (spec.md §4.1's "Guarantees").
    pub fn load(root: &Path) -> Result<Self> {
        let global = GlobalPaths::new(root);

        let config: GlobalConfig = doc::read_optional(&global.config())?
            .ok_or_else(|| Error::Uninitialized(root.to_owned()))?;
        let aliases: AliasMap = doc::read(&global.aliases())?;
        let current_compiler = aliases
            .get(&config.current_alias)
            .cloned()
            .ok_or_else(|| Error::UnknownAlias(config.current_alias.to_string()))?;

        let switch = global.switch(&config.current_alias);
        let repo_index: RepoIndex = doc::read(&global.repo_index())?;
        let available = scan_available(&global)?;
        let installed: Installed = doc::read(&switch.installed())?;
        let reinstall: Reinstall = doc::read(&switch.reinstall())?;
        let pinned: Pinned = doc::read(&switch.pinned())?;

        debug!(
            alias = %config.current_alias,
            available = available.len(),
            installed = installed.len(),
            "loaded forge state"
        );

        Ok(Self {
            global,
            switch,
            config,
            aliases,
            current_alias: config.current_alias.clone(),
            current_compiler,
            repo_index,
            available,
            installed,
            reinstall,
            pinned,
        })
    }

    pub fn root(&self) -> &Path {
        self.global.root()
    }

    pub fn global_paths(&self) -> &GlobalPaths {
        &self.global
    }

    pub fn switch_paths(&self) -> &SwitchPaths {
        &self.switch
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn current_alias(&self) -> &Alias {
        &self.current_alias
    }

    pub fn current_compiler(&self) -> &CompilerVersion {
        &self.current_compiler
    }

    pub fn repo_index(&self) -> &RepoIndex {
        &self.repo_index
    }

    pub fn available(&self) -> &BTreeSet<Nv> {
        &self.available
    }

    pub fn installed(&self) -> &Installed {
        &self.installed
    }

    pub fn reinstall(&self) -> &Reinstall {
        &self.reinstall
    }

    pub fn pinned(&self) -> &Pinned {
        &self.pinned
    }

    /// The installed version of `pkg`, if the current switch has one.
    pub fn installed_version(&self, pkg: &PkgName) -> Option<&forge_foundation::PkgVersion> {
        self.installed.version_of(pkg)
    }

    pub fn is_installed(&self, nv: &Nv) -> bool {
        self.installed.contains(nv)
    }
}

/// Enumerate the global `opam/` directory: every `<nv>.opam` entry becomes
/// one member of Available (spec.md §4.1: "the available set (enumeration
/// of global `opam/` dir)").
fn scan_available(global: &GlobalPaths) -> Result<BTreeSet<Nv>> {
    let dir = global.opam_dir();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(Error::ReadDir(dir, e)),
    };

    let mut available = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::ReadDir(dir.clone(), e))?;
        let path: PathBuf = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("opam") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Ok(nv) = stem.parse::<Nv>() {
            available.insert(nv);
        }
    }
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_foundation::{Alias, CompilerVersion, RepoName};
    use forge_schema::FORMAT_VERSION;
    use tempfile::tempdir;

    fn init_minimal_root(root: &Path) {
        let global = GlobalPaths::new(root);
        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();

        let mut aliases = AliasMap::default();
        aliases.insert(alias.clone(), compiler);
        doc::write(&global.aliases(), &aliases).unwrap();

        let config = GlobalConfig {
            format_version: FORMAT_VERSION.to_string(),
            repos: vec![forge_foundation::Repository {
                name: RepoName::new("default").unwrap(),
                address: forge_foundation::RepoAddress::new("file:///tmp/repo"),
                kind: forge_foundation::RepoKind::Local,
            }],
            current_alias: alias.clone(),
            workers: 4,
        };
        doc::write(&global.config(), &config).unwrap();

        let switch = global.switch(&alias);
        doc::write(&switch.installed(), &Installed::default()).unwrap();
    }

    #[test]
    fn load_fails_on_missing_root() {
        let dir = tempdir().unwrap();
        match State::load(&dir.path().join("nope")) {
            Err(Error::Uninitialized(_)) => {}
            other => panic!("expected Uninitialized, got {other:?}"),
        }
    }

    #[test]
    fn load_succeeds_on_initialized_root() {
        let dir = tempdir().unwrap();
        init_minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();
        assert_eq!(state.current_alias().as_str(), "sys");
        assert_eq!(state.current_compiler().as_str(), "5.1");
        assert!(state.installed().is_empty());
        assert!(state.available().is_empty());
    }
}
