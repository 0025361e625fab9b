// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The repository backend capability interface (spec.md §6 "Repository
//! backend", §9 design note "Dynamic dispatch over repo backends").
//!
//! Three kinds share one `init/update/download/upload` contract; this
//! module models that as a trait plus one `enum_dispatch` variant per kind,
//! the same shape `spk-solve::abstract_solver::SolverImpl` uses for its
//! solver backends.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use forge_foundation::{Nv, Repository};
use forge_storage::GlobalPaths;

use crate::error::{Error, Result};

/// The files a package publisher supplies for one NV (spec.md §6's
/// `upload --opam F --descr F --archive F`).
pub struct UploadArtifacts<'a> {
    pub opam: &'a Path,
    pub descr: Option<&'a Path>,
    pub archive: &'a Path,
}

/// `init/update/download/upload`, per spec.md §6.
#[async_trait]
#[enum_dispatch]
pub trait RepoBackend {
    /// Prepare the local mirror for a newly-added repository.
    async fn init(&self) -> Result<()>;

    /// Refresh the local mirror and return the set of NVs that changed
    /// (spec.md §4.3 step 1/3 "its `updated` file").
    async fn update(&self) -> Result<BTreeSet<Nv>>;

    /// Fetch `nv`'s archive into `dest` (spec.md §4.5(b) "fetched via
    /// Repositories.download").
    async fn download(&self, nv: &Nv, dest: &Path) -> Result<()>;

    /// Publish a package's artifacts into the mirror (spec.md §4.8
    /// `remote add`/CLI `upload`).
    async fn upload(&self, nv: &Nv, artifacts: &UploadArtifacts<'_>) -> Result<()>;
}

#[enum_dispatch(RepoBackend)]
pub enum RepoBackendImpl {
    Local(LocalBackend),
    Git(UnsupportedBackend),
    Http(UnsupportedBackend),
}

/// Construct the backend implementation for a configured repository.
pub fn backend_for(repo: &Repository, global: &GlobalPaths) -> RepoBackendImpl {
    match repo.kind {
        forge_foundation::RepoKind::Local => {
            RepoBackendImpl::Local(LocalBackend::new(repo.clone(), global.clone()))
        }
        forge_foundation::RepoKind::Git => {
            RepoBackendImpl::Git(UnsupportedBackend::new(repo.kind))
        }
        forge_foundation::RepoKind::Http => {
            RepoBackendImpl::Http(UnsupportedBackend::new(repo.kind))
        }
    }
}

/// A repository whose `address` is a local directory laid out like a
/// mirror (`packages/<nv>/{opam,descr,url,files/}`, `archives/<nv>.tar.gz`)
/// — the one kind spec.md's non-goals leave implementable without a
/// fabricated network/VCS dependency.
pub struct LocalBackend {
    repo: Repository,
    global: GlobalPaths,
}

impl LocalBackend {
    pub fn new(repo: Repository, global: GlobalPaths) -> Self {
        Self { repo, global }
    }

    fn source_root(&self) -> PathBuf {
        PathBuf::from(self.repo.address.as_str())
    }

    fn mirror_root(&self) -> PathBuf {
        self.global.repo_root(&self.repo.name)
    }
}

#[async_trait]
impl RepoBackend for LocalBackend {
    async fn init(&self) -> Result<()> {
        let mirror = self.mirror_root();
        for sub in ["packages", "archives"] {
            let dir = mirror.join(sub);
            std::fs::create_dir_all(&dir).map_err(|e| Error::Write(dir, e))?;
        }
        Ok(())
    }

    async fn update(&self) -> Result<BTreeSet<Nv>> {
        let source_packages = self.source_root().join("packages");
        let mirror_packages = self.mirror_root().join("packages");
        std::fs::create_dir_all(&mirror_packages).map_err(|e| Error::Write(mirror_packages.clone(), e))?;

        let mut updated = BTreeSet::new();
        let entries = match std::fs::read_dir(&source_packages) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(updated),
            Err(e) => return Err(Error::Read(source_packages, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| Error::Read(source_packages.clone(), e))?;
            let Some(nv) = entry.file_name().to_str().and_then(|s| s.parse::<Nv>().ok()) else {
                continue;
            };
            let src_pkg_dir = entry.path();
            let dst_pkg_dir = mirror_packages.join(nv.to_string());

            let opam_src = src_pkg_dir.join("opam");
            let opam_dst = dst_pkg_dir.join("opam");
            let changed = !opam_dst.exists()
                || std::fs::read(&opam_src).ok() != std::fs::read(&opam_dst).ok();

            copy_dir(&src_pkg_dir, &dst_pkg_dir)?;

            let archive_src = self.source_root().join("archives").join(format!("{nv}.tar.gz"));
            if archive_src.exists() {
                let archive_dst = self.mirror_root().join("archives").join(format!("{nv}.tar.gz"));
                link_or_copy(&archive_src, &archive_dst)?;
            }

            if changed {
                updated.insert(nv);
            }
        }

        forge_schema::doc::write(&self.global.repo_updated(&self.repo.name), &updated)?;
        Ok(updated)
    }

    async fn download(&self, nv: &Nv, dest: &Path) -> Result<()> {
        let archive = self.mirror_root().join("archives").join(format!("{nv}.tar.gz"));
        link_or_copy(&archive, dest)
    }

    async fn upload(&self, nv: &Nv, artifacts: &UploadArtifacts<'_>) -> Result<()> {
        let pkg_dir = self.mirror_root().join("packages").join(nv.to_string());
        std::fs::create_dir_all(&pkg_dir).map_err(|e| Error::Write(pkg_dir.clone(), e))?;
        link_or_copy(artifacts.opam, &pkg_dir.join("opam"))?;
        if let Some(descr) = artifacts.descr {
            link_or_copy(descr, &pkg_dir.join("descr"))?;
        }
        let archive_dst = self.mirror_root().join("archives").join(format!("{nv}.tar.gz"));
        link_or_copy(artifacts.archive, &archive_dst)
    }
}

/// Stands in for the git/http backends, which spec.md §1 scopes out of
/// this core. Exists so the synchronizer can hold a `Vec<RepoBackendImpl>`
/// uniformly across all three configured kinds.
pub struct UnsupportedBackend {
    kind: forge_foundation::RepoKind,
}

impl UnsupportedBackend {
    pub fn new(kind: forge_foundation::RepoKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl RepoBackend for UnsupportedBackend {
    async fn init(&self) -> Result<()> {
        Err(Error::Unsupported(self.kind))
    }

    async fn update(&self) -> Result<BTreeSet<Nv>> {
        Err(Error::Unsupported(self.kind))
    }

    async fn download(&self, _nv: &Nv, _dest: &Path) -> Result<()> {
        Err(Error::Unsupported(self.kind))
    }

    async fn upload(&self, _nv: &Nv, _artifacts: &UploadArtifacts<'_>) -> Result<()> {
        Err(Error::Unsupported(self.kind))
    }
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| Error::Write(dst.to_owned(), e))?;
    for entry in std::fs::read_dir(src).map_err(|e| Error::Read(src.to_owned(), e))? {
        let entry = entry.map_err(|e| Error::Read(src.to_owned(), e))?;
        let file_type = entry.file_type().map_err(|e| Error::Read(entry.path(), e))?;
        let dst_path = dst.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir(&entry.path(), &dst_path)?;
        } else {
            link_or_copy(&entry.path(), &dst_path)?;
        }
    }
    Ok(())
}

/// Hard-link `src` at `dst`, falling back to a byte copy when hard-linking
/// isn't available (spec.md §9 design note: "reimplementations that target
/// platforms without symlinks should either hard-link or maintain an
/// explicit mapping table").
fn link_or_copy(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write(parent.to_owned(), e))?;
    }
    let _ = std::fs::remove_file(dst);
    if std::fs::hard_link(src, dst).is_ok() {
        return Ok(());
    }
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| Error::Write(dst.to_owned(), e))
}
