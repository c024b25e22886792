// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::context::ContextError;
use crate::domain::services::history_service::HistoryError;
use crate::domain::services::search_controller::SearchError;
use crate::infrastructure::auth_api::AuthError;
use crate::utils::errors::{Classify, ErrorKind};
use colored::Colorize;
use thiserror::Error;

/// 命令行错误类型
///
/// 展示给用户的信息使用各层错误的用户提示，原始错误写入日志
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Not signed in. Run `geotrace login` first.")]
    NotSignedIn,
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Context(ContextError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{}", .0.user_message())]
    History(#[from] HistoryError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ContextError> for CliError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::NotSignedIn => CliError::NotSignedIn,
            other => CliError::Context(other),
        }
    }
}

impl Classify for CliError {
    fn kind(&self) -> ErrorKind {
        match self {
            CliError::NotSignedIn => ErrorKind::AuthExpired,
            CliError::Command(_) => ErrorKind::Validation,
            CliError::Context(ContextError::Storage(_)) | CliError::Io(_) => ErrorKind::Storage,
            CliError::Context(_) => ErrorKind::Validation,
            CliError::Auth(e) => e.kind(),
            CliError::History(e) => e.kind(),
            CliError::Search(e) => e.kind(),
        }
    }
}

impl CliError {
    /// 带颜色的错误输出，认证过期时追加重新登录提示
    pub fn format_colored(&self) -> String {
        let mut out = format!("{} {}", "✗".red().bold(), self);
        if self.kind() == ErrorKind::AuthExpired && !matches!(self, CliError::NotSignedIn) {
            out.push_str(&format!(
                "\n{} Session expired. Please sign in again.",
                "ℹ".bold().blue()
            ));
        }
        out
    }
}
