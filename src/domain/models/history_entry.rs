// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::geo_record::GeoRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 历史记录标识符
///
/// 远程模式下由服务端分配整数ID，本地模式下由客户端以
/// `ip + 时间戳` 组合生成。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryId {
    /// 服务端分配的ID
    Server(i64),
    /// 客户端生成的ID
    Client(String),
}

impl HistoryId {
    /// 为本地记录生成ID
    pub fn client(ip: &str, captured_at: DateTime<Utc>) -> Self {
        HistoryId::Client(format!("{}-{}", ip, captured_at.timestamp_millis()))
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryId::Server(id) => write!(f, "{}", id),
            HistoryId::Client(id) => f.write_str(id),
        }
    }
}

impl FromStr for HistoryId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => HistoryId::Server(id),
            Err(_) => HistoryId::Client(s.to_string()),
        })
    }
}

impl From<i64> for HistoryId {
    fn from(id: i64) -> Self {
        HistoryId::Server(id)
    }
}

/// 搜索历史条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub ip: String,
    pub geo: GeoRecord,
    pub captured_at: DateTime<Utc>,
    /// 界面选择状态，从不持久化
    #[serde(skip)]
    pub selected: bool,
}

impl HistoryEntry {
    /// 创建一条本地历史记录
    pub fn new_local(ip: impl Into<String>, geo: GeoRecord, captured_at: DateTime<Utc>) -> Self {
        let ip = ip.into();
        Self {
            id: HistoryId::client(&ip, captured_at),
            ip,
            geo,
            captured_at,
            selected: false,
        }
    }

    /// 大小写不敏感地匹配 ip / 城市 / 国家
    ///
    /// `needle` 须已转换为小写
    pub fn matches(&self, needle: &str) -> bool {
        let contains = |field: Option<&str>| {
            field
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false)
        };

        contains(Some(&self.ip))
            || contains(self.geo.city.as_deref())
            || contains(self.geo.country.as_deref())
    }
}
