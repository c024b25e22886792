// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 经纬度坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// 纬度
    pub lat: f64,
    /// 经度
    pub lng: f64,
}

impl Coordinates {
    /// 解析 `"lat,lng"` 形式的坐标字符串
    ///
    /// 任一分量缺失或不是有限数值时返回 `None`
    pub fn parse(loc: &str) -> Option<Self> {
        let (lat, lng) = loc.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Self { lat, lng })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// IP地理位置记录
///
/// 一次地理定位查询的标准化结果。除 `ip` 外所有字段均可缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// 被查询的IP地址
    pub ip: String,
    /// 城市
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// 地区/州
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// 国家
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// 坐标
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// 邮政编码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// 时区
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// 所属组织 (ASN / ISP)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl GeoRecord {
    /// 创建只包含IP的记录
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            city: None,
            region: None,
            country: None,
            coordinates: None,
            postal_code: None,
            timezone: None,
            organization: None,
        }
    }

    /// "城市, 地区" 形式的位置描述，两者都缺失时返回 `None`
    pub fn location_label(&self) -> Option<String> {
        match (self.city.as_deref(), self.region.as_deref()) {
            (Some(city), Some(region)) => Some(format!("{}, {}", city, region)),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }
}

/// 将空字符串视为缺失值
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
