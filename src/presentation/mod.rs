// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 命令行界面：参数定义、命令执行、交互式会话以及终端输出格式
pub mod cli;
pub mod commands;
pub mod errors;
pub mod render;
pub mod shell;

pub use cli::{Cli, Commands, HistoryCommands};
pub use commands::run_cli_command;
pub use errors::CliError;
