// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Pure functions mapping logical identifiers to filesystem paths under a
//! single root (spec.md §2 component 1, §6 "Filesystem layout").
//!
//! Nothing in this module touches the filesystem; every function here is a
//! total `PathBuf` computation so the rest of the workspace can reason about
//! paths without performing I/O.

use std::path::{Path, PathBuf};

use forge_foundation::{Alias, CompilerVersion, Nv, PkgName, RepoName};

/// Root-relative paths owned by the global layer (spec.md §3 "Ownership &
/// lifecycle": config, aliases, repo index, and repository mirrors).
#[derive(Clone, Debug)]
pub struct GlobalPaths {
    root: PathBuf,
}

impl GlobalPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn aliases(&self) -> PathBuf {
        self.root.join("aliases")
    }

    pub fn repo_index(&self) -> PathBuf {
        self.root.join("repo").join("index")
    }

    pub fn repo_root(&self, repo: &RepoName) -> PathBuf {
        self.root.join("repo").join(repo.as_str())
    }

    pub fn repo_config(&self, repo: &RepoName) -> PathBuf {
        self.repo_root(repo).join("config")
    }

    pub fn repo_package_dir(&self, repo: &RepoName, nv: &Nv) -> PathBuf {
        self.repo_root(repo)
            .join("packages")
            .join(nv.to_string())
    }

    pub fn repo_archive(&self, repo: &RepoName, nv: &Nv) -> PathBuf {
        self.repo_root(repo)
            .join("archives")
            .join(format!("{nv}.tar.gz"))
    }

    /// Set of NVs the last `update` refreshed for this repo (spec.md §4.3
    /// step 1/3).
    pub fn repo_updated(&self, repo: &RepoName) -> PathBuf {
        self.repo_root(repo).join("updated")
    }

    /// Derived-view symlink for a package manifest (spec.md §6: `opam/<nv>.opam`).
    pub fn opam_link(&self, nv: &Nv) -> PathBuf {
        self.root.join("opam").join(format!("{nv}.opam"))
    }

    /// Derived-view symlink for a package description (spec.md §6: `descr/<nv>`).
    pub fn descr_link(&self, nv: &Nv) -> PathBuf {
        self.root.join("descr").join(nv.to_string())
    }

    /// Derived-view symlink for a package archive (spec.md §6: `archive/<nv>.tar.gz`).
    pub fn archive_link(&self, nv: &Nv) -> PathBuf {
        self.root.join("archive").join(format!("{nv}.tar.gz"))
    }

    /// Derived-view symlink for a compiler description (spec.md §6: `compiler/<v>.comp`).
    pub fn compiler_link(&self, version: &CompilerVersion) -> PathBuf {
        self.root.join("compiler").join(format!("{version}.comp"))
    }

    pub fn opam_dir(&self) -> PathBuf {
        self.root.join("opam")
    }

    pub fn descr_dir(&self) -> PathBuf {
        self.root.join("descr")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join("archive")
    }

    pub fn compiler_dir(&self) -> PathBuf {
        self.root.join("compiler")
    }

    /// Directories that must exist for a freshly-initialized root (spec.md
    /// §4.6 `init`).
    pub fn top_level_dirs(&self) -> [PathBuf; 5] {
        [
            self.root.join("repo"),
            self.opam_dir(),
            self.descr_dir(),
            self.archive_dir(),
            self.compiler_dir(),
        ]
    }

    pub fn switch(&self, alias: &Alias) -> SwitchPaths {
        SwitchPaths {
            root: self.root.join(alias.as_str()),
        }
    }
}

/// Root-relative paths owned by one switch (spec.md §3 "Ownership &
/// lifecycle": per-switch sets, per-package configs, libs, bins).
#[derive(Clone, Debug)]
pub struct SwitchPaths {
    root: PathBuf,
}

impl SwitchPaths {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn installed(&self) -> PathBuf {
        self.root.join("installed")
    }

    pub fn reinstall(&self) -> PathBuf {
        self.root.join("reinstall")
    }

    /// The `pin` set added in SPEC_FULL.md §A.5, persisted exactly like
    /// `reinstall`.
    pub fn pinned(&self) -> PathBuf {
        self.root.join("pinned")
    }

    pub fn package_config(&self, pkg: &PkgName) -> PathBuf {
        self.root.join("config").join(format!("{pkg}.config"))
    }

    pub fn package_install(&self, pkg: &PkgName) -> PathBuf {
        self.root.join("install").join(format!("{pkg}.install"))
    }

    pub fn build_dir(&self, nv: &Nv) -> PathBuf {
        self.root.join("build").join(nv.to_string())
    }

    pub fn lib_dir(&self, pkg: &PkgName) -> PathBuf {
        self.root.join("lib").join(pkg.as_str())
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.root.join("doc")
    }

    pub fn stublibs_dir(&self) -> PathBuf {
        self.root.join("stublibs")
    }

    pub fn bin_path(&self, basename: &str) -> PathBuf {
        self.bin_dir().join(basename)
    }

    /// Directories that must exist for a freshly-initialized switch (spec.md
    /// §4.6 `init_switch`).
    pub fn top_level_dirs(&self) -> [PathBuf; 7] {
        [
            self.root.join("config"),
            self.root.join("install"),
            self.root.join("build"),
            self.root.join("lib"),
            self.bin_dir(),
            self.doc_dir(),
            self.stublibs_dir(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opam_link_uses_nv_display() {
        let paths = GlobalPaths::new("/root");
        let nv: Nv = "zlib.1.2.11".parse().unwrap();
        assert_eq!(paths.opam_link(&nv), PathBuf::from("/root/opam/zlib.1.2.11.opam"));
    }

    #[test]
    fn switch_paths_nest_under_alias() {
        let paths = GlobalPaths::new("/root");
        let alias = Alias::new("sys").unwrap();
        let switch = paths.switch(&alias);
        assert_eq!(switch.installed(), PathBuf::from("/root/sys/installed"));
        assert_eq!(switch.bin_dir(), PathBuf::from("/root/sys/bin"));
    }
}
