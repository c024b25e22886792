// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 历史后端（history_backend）：搜索历史的持久化，远程服务或本地存储
/// - 存储仓库（storage_repository）：按键读写的本地持久化存储
pub mod history_backend;
pub mod storage_repository;
