// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for the crop tool.

pub mod crop;
pub mod display;
pub mod settings;
