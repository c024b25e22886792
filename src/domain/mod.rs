// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：地理位置记录和历史条目
/// - 地理位置（geo）：查询服务抽象
/// - 仓库接口（repositories）：历史后端与键值存储抽象
/// - 服务（services）：历史存储和查询控制器
///
/// 领域层不依赖于任何外部实现。
pub mod geo;
pub mod models;
pub mod repositories;
pub mod services;
