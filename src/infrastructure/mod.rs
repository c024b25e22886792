// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - API客户端（api_client）：带令牌的HTTP客户端
/// - 认证接口（auth_api）：登录与登出
/// - 地理位置（geolocation）：基于 ipinfo 的查询服务
/// - 仓库实现（repositories）：远程与本地历史后端
/// - 存储（storage）：本地文件与内存键值存储
///
/// 基础设施层依赖于领域层的抽象接口。
pub mod api_client;
pub mod auth_api;
pub mod geolocation;
pub mod repositories;
pub mod storage;
