// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含数据传输对象以及按配置组装组件的应用上下文
pub mod context;
pub mod dto;
