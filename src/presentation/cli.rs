// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 命令行参数定义

use clap::{Parser, Subcommand};

/// geotrace - IP geolocation lookups with a search history
#[derive(Parser, Debug)]
#[command(name = "geotrace")]
#[command(version)]
#[command(about = "IP geolocation lookups with a search history", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in to the history service
    Login {
        #[arg(long, env = "GEOTRACE_EMAIL")]
        email: String,

        #[arg(long, env = "GEOTRACE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show sign-in state and history backend
    Status,

    /// Show the geolocation of this machine's public address
    Me,

    /// Look up an IPv4 address and record it in the history
    Lookup {
        /// Dotted-quad IPv4 address
        ip: String,
    },

    /// Manage search history
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Interactive session
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List history, newest first
    List {
        /// Only entries whose ip, city or country contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Delete one entry
    Delete { id: String },

    /// Delete several entries
    DeleteMany {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
