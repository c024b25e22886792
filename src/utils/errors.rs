// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// 错误分类
///
/// 各层错误类型（查询、存储、历史后端、认证）都映射到这几类，
/// 调用方据此决定提示信息以及是否需要全局登出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 输入格式错误，不会触达网络
    Validation,
    /// 传输失败、超时或非预期的响应状态
    Network,
    /// IP 或历史记录不存在
    NotFound,
    /// 认证已过期 (401)，需要重新登录
    AuthExpired,
    /// 本地存储读写失败
    Storage,
}

impl ErrorKind {
    /// 是否需要触发全局登出
    pub fn requires_sign_out(self) -> bool {
        matches!(self, ErrorKind::AuthExpired)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::NotFound => "not found",
            ErrorKind::AuthExpired => "auth expired",
            ErrorKind::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// 可分类的错误
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}
