// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod helpers;
pub mod local_history_test;
pub mod remote_history_test;
pub mod search_flow_test;
