// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line string tokenizer.
//!
//! ```text
//! -G "Ninja Multi-Config" -DX="a b"  ->  [-G, Ninja Multi-Config, -DX=a b]
//! ```
//!
//! Whitespace outside double quotes separates arguments. Quotes are removed.
//! Inside quotes, `\"` is a literal quote; every other backslash is kept.

/// Splits `line` into arguments.
#[must_use]
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            if c != '"' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                escaped = true;
                in_arg = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                in_arg = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if escaped {
        current.push('\\');
    }
    if in_arg {
        args.push(current);
    }
    args
}
