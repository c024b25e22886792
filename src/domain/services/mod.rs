// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 认证存储（auth_store）：保存和清除访问令牌
/// - 历史存储（history_service）：搜索历史的内存视图及其增删改
/// - 查询控制器（search_controller）：输入校验、查询以及最后请求优先
pub mod auth_store;
pub mod history_service;
pub mod search_controller;
