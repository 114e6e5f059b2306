// run-vcpkg-rs: vcpkg bootstrapper and CMake driver for CI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inspection of CMake argument lists.

/// Generator named by `-G <name>` or `-G<name>`, if any.
#[must_use]
pub fn generator_name(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-G" {
            return iter.next().map(String::as_str);
        }
        if let Some(name) = arg.strip_prefix("-G") {
            return Some(name.trim_start());
        }
    }
    None
}

/// Returns true if the arguments select a Ninja-based generator.
#[must_use]
pub fn is_ninja_generator(args: &[String]) -> bool {
    generator_name(args).is_some_and(|name| name.to_ascii_lowercase().contains("ninja"))
}

/// Returns true if the arguments already set `CMAKE_MAKE_PROGRAM`.
#[must_use]
pub fn is_make_program(args: &[String]) -> bool {
    args.iter().any(|arg| arg.starts_with("-DCMAKE_MAKE_PROGRAM"))
}

/// `--config` prefix for build arguments of multi-config generators.
///
/// Empty when not multi-config or when `build_args` already has `--config`.
#[must_use]
pub fn build_config_prefix(build_args: &str, multi_config: bool, build_type: &str) -> String {
    if multi_config && !build_args.contains("--config") {
        format!(" --config {build_type} ")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{build_config_prefix, generator_name, is_make_program, is_ninja_generator};
    use crate::utility::args::split_args;

    #[test]
    fn test_generator_detection() {
        let cases = [
            ("-GNinja", Some("Ninja"), true),
            (r#"-G "Ninja Multi-Config" -DX=1"#, Some("Ninja Multi-Config"), true),
            ("-G ninja", Some("ninja"), true),
            (r#"-G "CodeBlocks - Ninja""#, Some("CodeBlocks - Ninja"), true),
            (r#"-G "Unix Makefiles" -DUSE_NINJA=ON"#, Some("Unix Makefiles"), false),
            ("-DCMAKE_BUILD_TYPE=Release", None, false),
        ];
        for (line, name, ninja) in cases {
            let args = split_args(line);
            assert_eq!(generator_name(&args), name, "{line}");
            assert_eq!(is_ninja_generator(&args), ninja, "{line}");
        }
    }

    #[test]
    fn test_make_program_detection() {
        assert!(is_make_program(&split_args("-GNinja -DCMAKE_MAKE_PROGRAM=/x/ninja")));
        assert!(is_make_program(&split_args("-DCMAKE_MAKE_PROGRAM:FILEPATH=/x/ninja")));
        assert!(!is_make_program(&split_args("-GNinja")));
    }

    #[test]
    fn test_build_config_prefix() {
        assert_eq!(build_config_prefix("", true, "Release"), " --config Release ");
        assert_eq!(build_config_prefix("--config Debug", true, "Release"), "");
        assert_eq!(build_config_prefix("", false, "Release"), "");
    }
}
