// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the tee sign maker.

pub mod canvas;
pub mod cropper;
pub mod preview;
pub mod properties;
pub mod toolbar;
