// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 地理位置记录（geo_record）：一次IP地理定位查询的标准化结果
/// - 历史条目（history_entry）：用户搜索历史中的一条记录
pub mod geo_record;
pub mod history_entry;

pub use geo_record::{Coordinates, GeoRecord};
pub use history_entry::{HistoryEntry, HistoryId};
