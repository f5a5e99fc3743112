//! CLI integration tests for Mason.
//!
//! These tests exercise the full flow: manifest loading, origin-validated
//! resolution, sandbox checks, target dispatch and (when a compiler is
//! available) the real build pipeline.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const MIN_VALID_APP: &str = r#"PROJ_NAME = "hello"
PROJ_TYPE = "app"
"#;

/// Get a mason command in the given project directory, with a scrubbed
/// environment so ambient variables never act as declarations.
fn mason(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mason").unwrap();
    cmd.current_dir(dir);
    for name in mason::core::vars::known_names() {
        cmd.env_remove(name);
    }
    cmd
}

fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Mason.toml"), manifest).unwrap();
    tmp
}

fn host_segment() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

fn have_gcc() -> bool {
    Command::new("gcc")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

// ============================================================================
// print-vars
// ============================================================================

#[test]
fn test_print_vars_defaults_for_minimal_app() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("print-vars")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJ_NAME = hello"))
        .stdout(predicate::str::contains("PROJ_VERSION = 0.1.0"))
        .stdout(predicate::str::contains("DEBUG = 0"))
        .stdout(predicate::str::contains("CUSTOM_BUILD = 0"))
        .stdout(predicate::str::contains("CROSS_COMPILE = "))
        .stdout(predicate::str::contains("CC = gcc"))
        .stdout(predicate::str::contains("CXX = g++"))
        .stdout(predicate::str::contains("AS = as"))
        .stdout(predicate::str::contains("LD = gcc"));
}

#[test]
fn test_print_vars_default_output_dir() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "VARS=O O_BASE"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "O = output/{}/release",
            host_segment()
        )))
        .stdout(predicate::str::contains("O_BASE = output"));
}

#[test]
fn test_print_vars_custom_output_dir_pins_base() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "VARS=O O_BASE", "O=build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("O = build"))
        .stdout(predicate::str::contains("O_BASE = build"));
}

#[test]
fn test_print_vars_dist_subdir_reaches_derived_dir() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "VARS=O_DIST_DIR", "DIST_SUBDIR=subDir"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "O_DIST_DIR = output/{}/release/dist/subDir",
            host_segment()
        )));
}

#[test]
fn test_print_vars_build_subdir_with_explicit_o() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "VARS=O_BUILD_DIR", "O=output", "BUILD_SUBDIR=subDir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("O_BUILD_DIR = output/build/subDir"));
}

#[test]
fn test_print_vars_empty_selector_is_missing_value() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "VARS="])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[VARS] Missing value"));

    mason(tmp.path())
        .args(["print-vars", "VARS=   "])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[VARS] Missing value"));
}

// ============================================================================
// Origin policy
// ============================================================================

#[test]
fn test_proj_name_rejected_from_command_line() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("PROJ_NAME=some_val")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "[PROJ_NAME] Unexpected origin: \"command line\" (expected: \"file\")",
        ));
}

#[test]
fn test_proj_version_rejected_from_environment() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .env("PROJ_VERSION", "some_val")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "[PROJ_VERSION] Unexpected origin: \"environment\" (expected: \"file\")",
        ));
}

#[test]
fn test_custom_build_rejected_from_command_line() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("CUSTOM_BUILD=0")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "[CUSTOM_BUILD] Unexpected origin: \"command line\" (expected: \"file\")",
        ));
}

#[test]
fn test_cross_compile_rejected_from_command_line() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("CROSS_COMPILE=some-compiler-")
        .assert()
        .failure()
        .code(2)
        .stderr(
            predicate::str::contains("CROSS_COMPILE")
                .and(predicate::str::contains("command line")),
        );
}

#[test]
fn test_cross_compile_from_environment_prefixes_toolchain() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .env("CROSS_COMPILE", "some-compiler-")
        .arg("print-vars")
        .assert()
        .success()
        .stdout(predicate::str::contains("CC = some-compiler-gcc"))
        .stdout(predicate::str::contains("CXX = some-compiler-g++"))
        .stdout(predicate::str::contains("AS = some-compiler-as"))
        .stdout(predicate::str::contains("LD = some-compiler-gcc"))
        .stdout(predicate::str::contains("CROSS_COMPILE = some-compiler-"));
}

// ============================================================================
// Value validation
// ============================================================================

#[test]
fn test_missing_proj_name() {
    let tmp = project("PROJ_TYPE = \"app\"\n");

    mason(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[PROJ_NAME] Missing value"));
}

#[test]
fn test_proj_name_with_spaces() {
    let tmp = project("PROJ_NAME = \"hello world\"\nPROJ_TYPE = \"app\"\n");

    mason(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "[PROJ_NAME] Value cannot have whitespaces",
        ));
}

#[test]
fn test_invalid_proj_version() {
    let tmp = project("PROJ_NAME = \"hello\"\nPROJ_TYPE = \"app\"\nPROJ_VERSION = \"abc\"\n");

    mason(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[PROJ_VERSION] Invalid value"));
}

#[test]
fn test_invalid_proj_type() {
    let tmp = project("PROJ_NAME = \"hello\"\nPROJ_TYPE = \"plugin\"\n");

    mason(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[PROJ_TYPE] Invalid value"));
}

#[test]
fn test_invalid_debug_value() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("DEBUG=invalid")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[DEBUG] Invalid value"));
}

#[test]
fn test_reserved_variable_rejected() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("O_DIST_DIR=test")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[O_DIST_DIR] Reserved variable"));
}

#[test]
fn test_incompatible_framework_version() {
    let tmp = project("PROJ_NAME = \"hello\"\nPROJ_TYPE = \"app\"\nMASON_MIN_VERSION = \"9\"\n");

    mason(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[MASON_MIN_VERSION]"))
        .stderr(predicate::str::contains("9+"));
}

// ============================================================================
// Sandbox
// ============================================================================

#[test]
fn test_o_equal_project_root_rejected() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("O=.")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[O]").and(predicate::str::contains("Project root")));
}

#[test]
fn test_o_base_equal_project_root_rejected() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["O_BASE=.", "O=output"])
        .assert()
        .failure()
        .code(2)
        .stderr(
            predicate::str::contains("[O_BASE]").and(predicate::str::contains("Project root")),
        );
}

#[test]
fn test_o_outside_base_rejected() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["O_BASE=build", "O=output"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("outside O_BASE"))
        .stderr(predicate::str::contains("O=output"))
        .stderr(predicate::str::contains("O_BASE=build"));
}

#[test]
fn test_dist_subdir_escape_rejected() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("DIST_SUBDIR=../dir_outside_build")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[DIST_SUBDIR] Invalid path"));
}

// ============================================================================
// Target dispatch
// ============================================================================

#[test]
fn test_deps_conflicts_with_other_targets() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["deps", "print-vars"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "deps cannot be invoked along with other targets (extra targets: print-vars)",
        ));
}

#[test]
fn test_print_vars_conflicts_with_other_targets() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .args(["print-vars", "help"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(
            "print-vars cannot be invoked along with other targets (extra targets: help)",
        ));
}

#[test]
fn test_deps_prints_toolchain_facts() {
    let tmp = project(MIN_VALID_APP);

    mason(tmp.path())
        .arg("deps")
        .assert()
        .success()
        .stdout(predicate::str::contains("CC = gcc"))
        .stdout(predicate::str::contains("O_BUILD_DIR = "));
}

#[test]
fn test_variable_errors_come_before_target_conflicts() {
    let tmp = project("PROJ_TYPE = \"app\"\n");

    mason(tmp.path())
        .args(["deps", "print-vars"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("[PROJ_NAME] Missing value"));
}

// ============================================================================
// Build pipeline (requires a real compiler)
// ============================================================================

fn c_app_project() -> TempDir {
    let tmp = project(MIN_VALID_APP);
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::write(
        tmp.path().join("src/main.c"),
        "int main(void) { return 0; }\n",
    )
    .unwrap();
    tmp
}

#[test]
fn test_build_standard_verbosity() {
    if !have_gcc() {
        eprintln!("skipping: gcc not available");
        return;
    }

    let tmp = c_app_project();
    let out = format!("output/{}/release", host_segment());

    mason(tmp.path())
        .args(["O=output"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[CC] output/build/src/main.c.o"))
        .stdout(predicate::str::contains("[LD] output/build/hello"))
        .stdout(predicate::str::contains("[DIST] output/dist/bin/hello"))
        .stdout(predicate::str::contains("gcc").not())
        .stdout(predicate::str::contains("cp ").not());

    assert!(tmp.path().join("output/dist/bin/hello").exists());
    assert!(!tmp.path().join(out).exists());
}

#[test]
fn test_build_verbose_shows_command_lines() {
    if !have_gcc() {
        eprintln!("skipping: gcc not available");
        return;
    }

    let tmp = c_app_project();

    let output = mason(tmp.path())
        .args(["O=output", "V=1"])
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    let cc_line = lines
        .iter()
        .position(|l| l.contains("[CC] output/build/src/main.c.o"))
        .expect("missing [CC] line");
    assert_eq!(
        lines[cc_line + 1],
        "gcc -MMD -MP -Isrc -Wall -O2 -s -c src/main.c -o output/build/src/main.c.o"
    );

    let ld_line = lines
        .iter()
        .position(|l| l.contains("[LD] output/build/hello"))
        .expect("missing [LD] line");
    assert_eq!(
        lines[ld_line + 1],
        "gcc -o output/build/hello output/build/src/main.c.o -s"
    );

    let dist_line = lines
        .iter()
        .position(|l| l.contains("[DIST] output/dist/bin/hello"))
        .expect("missing [DIST] line");
    assert!(lines[dist_line + 1].starts_with("cp output/build/hello"));
}

#[test]
fn test_build_lib_archives_and_ships_headers() {
    if !have_gcc() {
        eprintln!("skipping: gcc not available");
        return;
    }

    let tmp = project("PROJ_NAME = \"hello\"\nPROJ_TYPE = \"lib\"\n");
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::write(
        tmp.path().join("src/util.c"),
        "int util(void) { return 1; }\n",
    )
    .unwrap();
    fs::create_dir(tmp.path().join("include")).unwrap();
    fs::write(tmp.path().join("include/util.h"), "int util(void);\n").unwrap();

    mason(tmp.path())
        .args(["O=output"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[LD] output/build/libhello.a"))
        .stdout(predicate::str::contains("[DIST] output/dist/lib/libhello.a"))
        .stdout(predicate::str::contains("[DIST] output/dist/include/util.h"));

    assert!(tmp.path().join("output/dist/lib/libhello.a").exists());
    assert!(tmp.path().join("output/dist/include/util.h").exists());
}

#[test]
fn test_build_default_layout_is_host_qualified() {
    if !have_gcc() {
        eprintln!("skipping: gcc not available");
        return;
    }

    let tmp = c_app_project();
    let out = format!("output/{}/release", host_segment());

    mason(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "[CC] {out}/build/src/main.c.o"
        )));

    assert!(tmp.path().join(format!("{out}/dist/bin/hello")).exists());
}

#[test]
fn test_build_failure_propagates_compiler_exit() {
    if !have_gcc() {
        eprintln!("skipping: gcc not available");
        return;
    }

    let tmp = project(MIN_VALID_APP);
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/main.c"), "this is not C\n").unwrap();

    mason(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[CC]").and(predicate::str::contains("failed")));
}

// ============================================================================
// mason-scan
// ============================================================================

#[test]
fn test_scan_lists_declared_names() {
    let tmp = project(MIN_VALID_APP);

    Command::cargo_bin("mason-scan")
        .unwrap()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJ_NAME"))
        .stdout(predicate::str::contains("PROJ_TYPE"));
}
