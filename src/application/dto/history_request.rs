// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::geo_response::GeoInfoDto;
use crate::domain::models::{GeoRecord, HistoryEntry, HistoryId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 搜索历史服务返回的一行记录
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHistoryDto {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub ip_address: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub loc: Option<String>,
    pub postal: Option<String>,
    pub timezone: Option<String>,
    pub org: Option<String>,
    #[serde(default)]
    pub raw_data: Option<Value>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<SearchHistoryDto> for HistoryEntry {
    fn from(row: SearchHistoryDto) -> Self {
        let geo = GeoInfoDto {
            ip: Some(row.ip_address.clone()),
            city: row.city,
            region: row.region,
            country: row.country,
            loc: row.loc,
            org: row.org,
            postal: row.postal,
            timezone: row.timezone,
        }
        .into_record(&row.ip_address);

        HistoryEntry {
            id: HistoryId::Server(row.id),
            ip: row.ip_address,
            geo,
            captured_at: row.created_at,
            selected: false,
        }
    }
}

/// 创建历史记录的请求体
#[derive(Debug, Clone, Serialize)]
pub struct CreateHistoryDto {
    pub ip_address: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub loc: Option<String>,
    pub postal: Option<String>,
    pub timezone: Option<String>,
    pub org: Option<String>,
    pub raw_data: GeoInfoDto,
}

impl CreateHistoryDto {
    pub fn new(ip: &str, geo: &GeoRecord) -> Self {
        let raw = GeoInfoDto::from(geo);
        Self {
            ip_address: ip.to_string(),
            city: raw.city.clone(),
            region: raw.region.clone(),
            country: raw.country.clone(),
            loc: raw.loc.clone(),
            postal: raw.postal.clone(),
            timezone: raw.timezone.clone(),
            org: raw.org.clone(),
            raw_data: raw,
        }
    }
}

/// 批量删除请求体
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteDto<'a> {
    pub ids: &'a [i64],
}

/// 解析列表响应
///
/// 支持裸数组、`{"data": [...]}` 以及 `{"data": {...}}`（单条记录），
/// 其它形状视为空列表
pub fn parse_history_list(value: Value) -> Result<Vec<SearchHistoryDto>, serde_json::Error> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => serde_json::from_value(data),
            Some(data @ Value::Object(_)) => Ok(vec![serde_json::from_value(data)?]),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

/// 解析单条记录响应，可能被 `{"data": ...}` 包裹
pub fn parse_history_row(value: Value) -> Result<SearchHistoryDto, serde_json::Error> {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            serde_json::from_value(map.remove("data").unwrap_or_default())
        }
        other => serde_json::from_value(other),
    }
}

/// 接受 RFC 3339 以及 `YYYY-MM-DD HH:MM:SS`（按UTC处理）
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}
