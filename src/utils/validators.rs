// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::utils::errors::{Classify, ErrorKind};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("IPv4 pattern is valid")
});

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 输入为空
    #[error("Please enter an IP address.")]
    EmptyInput,
    /// IP格式无效
    #[error("Invalid IP address format.")]
    InvalidIp,
}

impl Classify for ValidationError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// 严格校验点分十进制IPv4地址
///
/// 四段以点分隔的十进制数，每段 0-255，不允许任何其它字符。
///
/// # 参数
///
/// * `ip` - 待校验的字符串（不做 trim）
///
/// # 返回值
///
/// * `Ok(())` - 合法的IPv4地址
/// * `Err(ValidationError)` - 输入为空或格式无效
pub fn validate_ipv4(ip: &str) -> Result<(), ValidationError> {
    if ip.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if IPV4_RE.is_match(ip) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIp)
    }
}
