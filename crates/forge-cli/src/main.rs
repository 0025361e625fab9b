// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The `forge` binary: parses arguments, configures logging, and dispatches
//! to the query/write command modules (spec.md §2 component 10, §5 "Outer
//! locking").
//!
//! Every write-path command (`update`/`install`/`upgrade`/`remove`/
//! `upload`/`remote`/`pin`/`unpin`) acquires [`forge_storage::RootLock`]
//! here before calling into `commands::write`. `init` and `switch` are the
//! two exceptions: `forge-switch` already acquires the lock internally for
//! both, so locking again here would deadlock against fs2's non-reentrant
//! advisory lock.

mod cli;
mod commands;
mod confirm;
mod error;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use forge_foundation::{parse_pkg_spec, Alias, CompilerVersion, PkgName, PkgSpec, RepoAddress, RepoKind, RepoName};
use forge_storage::{RootLock, State};

use cli::{Cli, Command, ConfigAction, RemoteAction};
use confirm::StdinConfirm;
use error::{Error, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::configure_logging(cli.verbose) {
        eprintln!("failed to configure logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let root = forge_config::Settings::resolve_root()?;
    let confirm: Arc<dyn forge_exec::Confirm> = if cli.yes {
        Arc::new(forge_exec::AlwaysYes)
    } else {
        Arc::new(StdinConfirm)
    };

    match cli.command {
        Command::Init { alias, compiler, repo_address, repo_kind, repo_name, workers } => {
            let workers = match workers {
                Some(w) => w,
                None => forge_config::Settings::load()?.cli.default_workers,
            };
            commands::write::init(
                &root,
                Alias::new(alias)?,
                CompilerVersion::new(compiler)?,
                RepoName::new(repo_name)?,
                RepoAddress::new(repo_address),
                repo_kind.parse::<RepoKind>().map_err(Error::UnknownRepoKind)?,
                workers,
            )
            .await
        }

        Command::List { json } => {
            let state = State::load(&root)?;
            commands::query::list(&state, json)
        }
        Command::Info { pkg, json } => {
            let state = State::load(&root)?;
            commands::query::info(&state, &PkgName::new(pkg)?, json)
        }

        Command::Install { pkgs, dry_run } => {
            let _lock = RootLock::acquire(&root)?;
            let specs: Vec<PkgSpec> = pkgs
                .iter()
                .map(|p| parse_pkg_spec(p).map_err(Error::Foundation))
                .collect::<Result<_>>()?;
            commands::write::install(&root, &specs, dry_run, confirm).await
        }
        Command::Remove { pkg, dry_run } => {
            let _lock = RootLock::acquire(&root)?;
            commands::write::remove(&root, PkgName::new(pkg)?, dry_run, confirm).await
        }
        Command::Upgrade { dry_run } => {
            let _lock = RootLock::acquire(&root)?;
            commands::write::upgrade(&root, dry_run, confirm).await
        }
        Command::Update { dry_run } => {
            let _lock = RootLock::acquire(&root)?;
            if dry_run {
                println!("update -- dry run, nothing executed");
                return Ok(());
            }
            commands::write::update(&root).await
        }
        Command::Upload { opam, descr, archive, repo, dry_run } => {
            let _lock = RootLock::acquire(&root)?;
            let repo_name = repo.map(RepoName::new).transpose()?;
            commands::write::upload(&root, &opam, descr.as_deref(), &archive, repo_name, dry_run).await
        }

        Command::Remote { action } => match action {
            RemoteAction::List => {
                let state = State::load(&root)?;
                commands::query::remote_list(&state)
            }
            RemoteAction::Add { name, address, kind } => {
                let _lock = RootLock::acquire(&root)?;
                commands::write::remote_add(
                    &root,
                    RepoName::new(name)?,
                    RepoAddress::new(address),
                    kind.parse::<RepoKind>().map_err(Error::UnknownRepoKind)?,
                    false,
                )
                .await
            }
            RemoteAction::Rm { name } => {
                let _lock = RootLock::acquire(&root)?;
                commands::write::remote_rm(&root, &RepoName::new(name)?, false).await
            }
        },

        Command::Switch { clone, alias, compiler, dry_run } => {
            let alias = Alias::new(alias)?;
            let compiler = match compiler {
                Some(c) => CompilerVersion::new(c)?,
                None => {
                    let state = State::load(&root)?;
                    state
                        .aliases()
                        .get(&alias)
                        .cloned()
                        .ok_or_else(|| forge_switch::Error::UnknownAlias(alias.clone()))?
                }
            };
            commands::write::switch(&root, clone, alias, compiler, dry_run, confirm).await
        }

        Command::CompilerList => {
            let state = State::load(&root)?;
            commands::query::compiler_list(&state)
        }

        Command::Pin { pkg } => {
            let _lock = RootLock::acquire(&root)?;
            commands::write::pin(&root, PkgName::new(pkg)?).await
        }
        Command::Unpin { pkg } => {
            let _lock = RootLock::acquire(&root)?;
            commands::write::unpin(&root, PkgName::new(pkg)?).await
        }

        Command::Config { action } => {
            let state = State::load(&root)?;
            match action {
                ConfigAction::Env => commands::query::config_env(&state),
                ConfigAction::ListVars { json } => commands::query::config_list_vars(&state, json),
                ConfigAction::Variable { var } => commands::query::config_variable(&state, &var),
                ConfigAction::Subst { files } => commands::query::config_subst(&state, &files),
                ConfigAction::Includes { recursive, names } => {
                    let names: Vec<PkgName> = names.into_iter().map(PkgName::new).collect::<std::result::Result<_, _>>()?;
                    commands::query::config_includes(&state, recursive, &names)
                }
                ConfigAction::Compil { sections } => commands::query::config_compil(&state, &sections),
            }
        }
    }
}
