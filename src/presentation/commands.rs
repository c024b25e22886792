// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 命令执行

use super::cli::{Commands, HistoryCommands};
use super::errors::CliError;
use super::render;
use super::shell;
use crate::application::context::AppContext;
use crate::application::dto::login_request::LoginRequestDto;
use crate::domain::models::HistoryId;
use crate::domain::services::search_controller::SearchOutcome;
use chrono::{Local, Utc};
use colored::Colorize;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::info;

/// 执行一个命令行命令
pub async fn run_cli_command(ctx: &AppContext, cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Login { email, password } => login(ctx, email, password).await,
        Commands::Logout => {
            ctx.auth_api.logout().await?;
            println!("{} Signed out", "✓".bold().green());
            Ok(())
        }
        Commands::Status => status(ctx).await,
        Commands::Me => {
            let record = ctx.search.init_session().await?;
            println!("{}", render::location_card(&record));
            Ok(())
        }
        Commands::Lookup { ip } => {
            info!("Looking up {}", ip);
            lookup(ctx, &ip).await
        }
        Commands::History { action } => history(ctx, action).await,
        Commands::Shell => shell::run(ctx).await,
    }
}

async fn login(ctx: &AppContext, email: String, password: String) -> Result<(), CliError> {
    let request = LoginRequestDto { email, password };
    let user = ctx.auth_api.login(&request).await?;
    let who = user.map(|u| u.name).unwrap_or_else(|| request.email.clone());
    println!("{} Signed in as {}", "✓".bold().green(), who.cyan());
    Ok(())
}

async fn status(ctx: &AppContext) -> Result<(), CliError> {
    let signed_in = ctx
        .auth
        .is_authenticated()
        .await
        .map_err(|e| CliError::Command(e.to_string()))?;

    let state = if signed_in {
        "signed in".green()
    } else {
        "signed out".yellow()
    };
    println!("{} {}", "Session:".bold(), state);
    println!("{} {}", "History:".bold(), ctx.history_mode());
    println!("{} {}", "API:".bold(), ctx.settings.api.base_url);
    println!("{} {}", "Geolocation:".bold(), ctx.settings.geo.base_url);
    Ok(())
}

async fn lookup(ctx: &AppContext, ip: &str) -> Result<(), CliError> {
    ctx.require_session().await?;

    match ctx.search.submit(ip).await {
        SearchOutcome::Success {
            record,
            history_error,
        } => {
            println!("{}", render::location_card(&record));
            match history_error {
                Some(e) => Err(e.into()),
                None => Ok(()),
            }
        }
        SearchOutcome::Failed(e) => Err(e.into()),
        SearchOutcome::Superseded => Ok(()),
    }
}

async fn history(ctx: &AppContext, action: HistoryCommands) -> Result<(), CliError> {
    ctx.require_session().await?;
    ctx.history.load().await?;

    match action {
        HistoryCommands::List { filter } => {
            let entries = ctx.history.filter(filter.as_deref().unwrap_or_default());
            println!("{}", render::history_list(&entries, Utc::now(), &Local, false));
        }
        HistoryCommands::Delete { id } => {
            let id = parse_id(&id);
            if !ctx.history.delete_one(&id).await? {
                return Err(CliError::Command(format!("History entry {} not found", id)));
            }
            println!("{} Deleted {}", "✓".bold().green(), id);
        }
        HistoryCommands::DeleteMany { ids } => {
            let ids: Vec<HistoryId> = ids.iter().map(|id| parse_id(id)).collect();
            let removed = ctx.history.delete_many(&ids).await?;
            println!("{} Deleted {} entries", "✓".bold().green(), removed);
        }
        HistoryCommands::Clear { yes } => {
            if !yes {
                let mut lines = BufReader::new(io::stdin()).lines();
                if !shell::confirm(&mut lines, shell::CLEAR_PROMPT).await? {
                    println!("{} Cancelled", "ℹ".bold().blue());
                    return Ok(());
                }
            }
            ctx.history.clear_all().await?;
            println!("{} History cleared", "✓".bold().green());
        }
    }
    Ok(())
}

pub(crate) fn parse_id(raw: &str) -> HistoryId {
    match raw.parse::<HistoryId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}
