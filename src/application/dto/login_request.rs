// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequestDto {
    #[validate(
        length(min = 1, message = "Please fill in all fields"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponseDto {
    pub token: String,
    pub user: Option<UserDto>,
}
