// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供历史后端接口的两种实现：远程搜索历史服务和本地存储
pub mod local_history_repo;
pub mod remote_history_repo;

pub use local_history_repo::LocalHistoryBackend;
pub use remote_history_repo::RemoteHistoryBackend;
