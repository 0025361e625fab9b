// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The dispatcher's aggregating error type. Every other crate's error is
//! wrapped transparently and rendered through `miette` so the top-level
//! binary has one place that turns a failure into a user-facing message
//! and an exit code (SPEC_FULL.md §A.1/§A.2).

use std::path::PathBuf;

use forge_foundation::PkgName;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(forge::foundation))]
    Foundation(#[from] forge_foundation::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::config))]
    Config(#[from] forge_config::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::schema))]
    Schema(#[from] forge_schema::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::storage))]
    Storage(#[from] forge_storage::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::subst))]
    Subst(#[from] forge_subst::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::repo))]
    Repo(#[from] forge_repo::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::solve))]
    Solve(#[from] forge_solve::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::exec))]
    Exec(#[from] forge_exec::Error),
    #[error(transparent)]
    #[diagnostic(code(forge::switch))]
    Switch(#[from] forge_switch::Error),

    /// spec.md §7 `SolverNoSolution`.
    #[error("no solution satisfies the request")]
    #[diagnostic(code(forge::no_solution))]
    NoSolution,

    /// spec.md §4.7's `config compil`: two packages in the section closure
    /// export a library section of the same name.
    #[error("two installed packages both export a library section named {0:?}")]
    #[diagnostic(code(forge::section_collision))]
    SectionCollision(String),
    #[error("unknown section {0:?}: no installed package defines it")]
    #[diagnostic(code(forge::unknown_section))]
    UnknownSection(String),
    #[error("malformed full section {0:?}: expected pkg:section")]
    #[diagnostic(code(forge::malformed_full_section))]
    MalformedFullSection(String),

    #[error("package {0} is not installed")]
    #[diagnostic(code(forge::not_installed))]
    NotInstalled(PkgName),
    #[error("unknown repository kind {0:?}: expected git, http, or local")]
    #[diagnostic(code(forge::unknown_repo_kind))]
    UnknownRepoKind(String),

    #[error("failed to read {0}: {1}")]
    #[diagnostic(code(forge::io_read))]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to write {0}: {1}")]
    #[diagnostic(code(forge::io_write))]
    Write(PathBuf, #[source] std::io::Error),

    /// The user declined a `--yes`-gated confirmation prompt.
    #[error("operation cancelled")]
    #[diagnostic(code(forge::cancelled))]
    Cancelled,
}
