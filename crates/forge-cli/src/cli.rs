// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The command-line surface (spec.md §6 "External interfaces", SPEC_FULL.md
//! §A.5's `--dry-run`/`--json`/`pin`/`unpin` additions).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "forge", version, about = "A source-based package manager for compiler-versioned switches")]
pub struct Cli {
    /// Repeat for more verbose logging (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Auto-accept every confirmation prompt.
    #[arg(long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new forge root.
    Init {
        alias: String,
        compiler: String,
        /// Address of the first repository to register.
        repo_address: String,
        #[arg(long, default_value = "local")]
        repo_kind: String,
        #[arg(long, default_value = "default")]
        repo_name: String,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// List every installed package in the current switch.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show details about one package.
    Info {
        pkg: String,
        #[arg(long)]
        json: bool,
    },
    /// Install packages, pulling in their dependencies.
    Install {
        pkgs: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove a package and everything that depends on it.
    Remove {
        pkg: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Upgrade every unpinned installed package to its latest available version.
    Upgrade {
        #[arg(long)]
        dry_run: bool,
    },
    /// Refresh repository mirrors and the derived global views.
    Update {
        #[arg(long)]
        dry_run: bool,
    },
    /// Publish a package's build artifacts to a repository mirror.
    Upload {
        #[arg(long)]
        opam: PathBuf,
        #[arg(long)]
        descr: Option<PathBuf>,
        #[arg(long)]
        archive: PathBuf,
        /// Target repository name; defaults to the first configured one.
        repo: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage configured repositories.
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
    /// Point the current alias at a switch, bootstrapping it if new.
    Switch {
        #[arg(long)]
        clone: bool,
        alias: String,
        /// Required the first time an alias is created.
        compiler: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List every compiler description known to the root.
    #[command(name = "compiler-list")]
    CompilerList,
    /// Pin a package to its currently-installed version.
    Pin { pkg: String },
    /// Undo a previous `pin`.
    Unpin { pkg: String },
    /// Query variables, substitution, and compiler flags.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoteAction {
    List,
    Add {
        name: String,
        address: String,
        kind: String,
    },
    Rm {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the composed build environment for the current switch.
    Env,
    /// Enumerate every global and section variable of every installed package.
    ListVars {
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a single `pkg:var` or `pkg:section:var` reference.
    Variable { var: String },
    /// Run `%{…}%` substitution over one or more template files, in place.
    Subst { files: Vec<PathBuf> },
    /// Print `-I <lib_dir>` flags for the given package names.
    Includes {
        #[arg(short = 'r', long)]
        recursive: bool,
        names: Vec<String>,
    },
    /// Compute the compiler/section flag closure for the given full sections.
    Compil { sections: Vec<String> },
}
