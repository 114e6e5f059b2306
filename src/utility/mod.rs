// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! args
//!   split_args()                  quote-aware tokenizer
//! fs
//!   ensure_dir(), recreate_dir()  directory lifecycle
//!   write_atomic()                temp file + rename
//!   make_executable()             chmod +x
//! ```

pub mod args;
pub mod fs;
