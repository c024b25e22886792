// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 交互式会话
//!
//! 每次IP提交都在后台任务中执行，用户可以在查询完成前继续输入；
//! 结果是否展示由查询控制器的最后请求优先规则决定。

use super::commands::parse_id;
use super::errors::CliError;
use super::render;
use crate::application::context::AppContext;
use crate::domain::services::search_controller::{SearchController, SearchOutcome};
use crate::utils::errors::{Classify, ErrorKind};
use chrono::{Local, Utc};
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub(crate) const CLEAR_PROMPT: &str = "Are you sure you want to clear all history?";

const HELP: &str = "\
Commands:
  <ip>               look up an IPv4 address
  clear              show your own location again
  history [text]     list history, optionally filtered
  show <id>          display a history entry
  select <id>        toggle selection of an entry
  select-all         select every entry
  deselect-all       clear the selection
  delete <id>        delete one entry
  delete-selected    delete the selected entries
  clear-history      delete every entry
  help               show this help
  quit               leave the session";

/// 读取一行 y/N 确认
pub(crate) async fn confirm<R>(lines: &mut Lines<R>, prompt: &str) -> Result<bool, CliError>
where
    R: AsyncBufRead + Unpin,
{
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

enum Flow {
    Continue,
    Quit,
}

/// 运行交互式会话
pub async fn run(ctx: &AppContext) -> Result<(), CliError> {
    ctx.require_session().await?;

    match ctx.search.init_session().await {
        Ok(record) => println!("{}", render::location_card(&record)),
        Err(e) => println!("{} {}", "✗".red().bold(), e),
    }
    if let Err(e) = ctx.history.load().await {
        report(&e.into());
    }
    println!("{}", "Type an IP address to look it up, or `help`.".dimmed());

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut lookups = JoinSet::new();

    loop {
        print!("{} ", "geotrace>".bold().magenta());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        // Reap finished lookups so the set does not grow unbounded.
        while lookups.try_join_next().is_some() {}

        match dispatch(ctx, &mut lines, &mut lookups, line.trim()).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                report(&e);
                if e.kind() == ErrorKind::AuthExpired {
                    break;
                }
            }
        }
    }

    lookups.abort_all();
    debug!("Shell closed");
    Ok(())
}

async fn dispatch<R>(
    ctx: &AppContext,
    lines: &mut Lines<R>,
    lookups: &mut JoinSet<()>,
    line: &str,
) -> Result<Flow, CliError>
where
    R: AsyncBufRead + Unpin,
{
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => println!("{}", HELP),
        "clear" => {
            ctx.search.clear();
            match ctx.search.view().current {
                Some(record) => println!("{}", render::location_card(&record)),
                None => println!("{} No session location", "ℹ".bold().blue()),
            }
        }
        "history" => {
            let entries = ctx.history.filter(arg);
            println!("{}", render::history_list(&entries, Utc::now(), &Local, true));
        }
        "show" => {
            let id = parse_id(arg);
            let entry = ctx
                .history
                .get(&id)
                .ok_or_else(|| CliError::Command(format!("History entry {} not found", id)))?;
            ctx.search.show_history_entry(&entry);
            println!("{}", render::location_card(&entry.geo));
        }
        "select" => {
            let id = parse_id(arg);
            match ctx.history.toggle_selected(&id) {
                Some(true) => println!("Selected {} ({} selected)", id, ctx.history.selected_count()),
                Some(false) => println!("Deselected {} ({} selected)", id, ctx.history.selected_count()),
                None => return Err(CliError::Command(format!("History entry {} not found", id))),
            }
        }
        "select-all" => {
            ctx.history.select_all();
            println!("{} selected", ctx.history.selected_count());
        }
        "deselect-all" => {
            ctx.history.deselect_all();
            println!("Selection cleared");
        }
        "delete" => {
            let id = parse_id(arg);
            if ctx.history.delete_one(&id).await? {
                println!("{} Deleted {}", "✓".bold().green(), id);
            } else {
                return Err(CliError::Command(format!("History entry {} not found", id)));
            }
        }
        "delete-selected" => {
            let removed = ctx.history.delete_selected().await?;
            println!("{} Deleted {} entries", "✓".bold().green(), removed);
        }
        "clear-history" => {
            if confirm(lines, CLEAR_PROMPT).await? {
                ctx.history.clear_all().await?;
                println!("{} History cleared", "✓".bold().green());
            }
        }
        _ => {
            let search = ctx.search.clone();
            let input = line.to_string();
            lookups.spawn(async move { lookup(search, input).await });
        }
    }

    Ok(Flow::Continue)
}

async fn lookup(search: Arc<SearchController>, input: String) {
    match search.submit(&input).await {
        SearchOutcome::Success {
            record,
            history_error,
        } => {
            println!("\n{}", render::location_card(&record));
            if let Some(e) = history_error {
                report(&e.into());
            }
        }
        SearchOutcome::Failed(e) => report(&e.into()),
        SearchOutcome::Superseded => debug!("Result for {} superseded", input),
    }
}

fn report(err: &CliError) {
    warn!("{}", err);
    eprintln!("{}", err.format_colored());
}
