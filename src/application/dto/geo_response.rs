// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::geo_record::non_empty;
use crate::domain::models::{Coordinates, GeoRecord};
use serde::{Deserialize, Serialize};

/// 地理定位服务的响应（ipinfo 格式）
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeoInfoDto {
    pub ip: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// "latitude,longitude"
    pub loc: Option<String>,
    pub org: Option<String>,
    pub postal: Option<String>,
    pub timezone: Option<String>,
}

impl GeoInfoDto {
    /// 转换为标准化记录
    ///
    /// 响应中缺少 ip 时使用 `fallback_ip`
    pub fn into_record(self, fallback_ip: &str) -> GeoRecord {
        let coordinates = self.loc.as_deref().and_then(Coordinates::parse);
        GeoRecord {
            ip: non_empty(self.ip).unwrap_or_else(|| fallback_ip.to_string()),
            city: non_empty(self.city),
            region: non_empty(self.region),
            country: non_empty(self.country),
            coordinates,
            postal_code: non_empty(self.postal),
            timezone: non_empty(self.timezone),
            organization: non_empty(self.org),
        }
    }
}

impl From<&GeoRecord> for GeoInfoDto {
    fn from(record: &GeoRecord) -> Self {
        Self {
            ip: Some(record.ip.clone()),
            city: record.city.clone(),
            region: record.region.clone(),
            country: record.country.clone(),
            loc: record.coordinates.map(|c| c.to_string()),
            org: record.organization.clone(),
            postal: record.postal_code.clone(),
            timezone: record.timezone.clone(),
        }
    }
}
