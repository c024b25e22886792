// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义外部服务（地理定位服务、认证与搜索历史API）的请求与响应格式，
/// 以及它们与领域模型之间的转换
pub mod geo_response;
pub mod history_request;
pub mod login_request;
