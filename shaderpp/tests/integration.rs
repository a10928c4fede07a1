//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use similar_asserts::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SHADERPP: &str = env!("CARGO_BIN_EXE_shaderpp");

/// Unescape newlines from .out file format
fn unescape_newlines(input: &str) -> String {
    input.replace("\\n", "\n")
}

enum ExpectedErr {
    Exact(String),
    Regex(String),
}

struct TestPlan {
    dir: PathBuf,
    args: Vec<String>,
    expected_out: String,
    expected_err: ExpectedErr,
    expected_exit_code: i32,
}

/// Parse the .out file format (key=value lines)
fn parse_out_file(content: &str) -> (String, ExpectedErr, i32) {
    let mut stdout = String::new();
    let mut stderr = ExpectedErr::Exact(String::new());
    let mut status = 0i32;

    for line in content.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key {
                "stdout" => stdout = unescape_newlines(value),
                "stderr" => stderr = ExpectedErr::Exact(unescape_newlines(value)),
                "stderr_regex" => stderr = ExpectedErr::Regex(unescape_newlines(value)),
                "status" => status = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    (stdout, stderr, status)
}

/// Every fixture is a directory holding the input files, an `args` file with the command line and
/// an `expected.out` file. The command runs from inside the fixture directory.
fn load_fixture(name: &str) -> TestPlan {
    let dir = Path::new("fixtures/integration_tests").join(name);

    let args_path = dir.join("args");
    let out_path = dir.join("expected.out");

    let args_content = fs::read_to_string(&args_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", args_path.display()));
    let out_content = fs::read_to_string(&out_path)
        .unwrap_or_else(|_| panic!("Failed to read {}", out_path.display()));
    let (expected_out, expected_err, expected_exit_code) = parse_out_file(&out_content);

    TestPlan {
        dir,
        args: args_content.split_whitespace().map(String::from).collect(),
        expected_out,
        expected_err,
        expected_exit_code,
    }
}

fn run_shaderpp(dir: &Path, args: &[String]) -> Output {
    Command::new(SHADERPP)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|_| panic!("failed to spawn {SHADERPP}"))
}

fn run_test(plan: TestPlan) {
    let output = run_shaderpp(&plan.dir, &plan.args);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.as_ref(), plan.expected_out.as_str(), "stdout mismatch");

    let stderr = String::from_utf8_lossy(&output.stderr);
    match &plan.expected_err {
        ExpectedErr::Exact(expected) => {
            assert_eq!(stderr.as_ref(), expected.as_str(), "stderr mismatch")
        }
        ExpectedErr::Regex(pattern) => {
            let re = regex_lite::Regex::new(pattern).unwrap();
            assert!(
                re.is_match(&stderr),
                "stderr doesn't match regex: {}\nActual stderr: {}",
                pattern,
                stderr
            );
        }
    }

    assert_eq!(
        output.status.code(),
        Some(plan.expected_exit_code),
        "exit code mismatch"
    );
}

// Macro for standard fixture tests
macro_rules! shaderpp_test {
    ($name:ident) => {
        #[test]
        fn $name() {
            run_test(load_fixture(stringify!($name)));
        }
    };
}

shaderpp_test!(plain);
shaderpp_test!(header_guard);
shaderpp_test!(nested_include);
shaderpp_test!(repeat_include);
shaderpp_test!(define_flag);
shaderpp_test!(include_root);
shaderpp_test!(unbalanced_endif);
shaderpp_test!(undef_unknown);
shaderpp_test!(unterminated);
shaderpp_test!(missing_include);
shaderpp_test!(include_cycle);
shaderpp_test!(malformed_directive);
shaderpp_test!(invalid_define);
shaderpp_test!(trailing_comments);

#[test]
fn wrap_header_and_source() {
    let out_dir = tempfile::tempdir().unwrap();
    let header = out_dir.path().join("blur.h");
    let source = out_dir.path().join("blur.cc");
    let args = vec![
        "--header".to_owned(),
        header.to_string_lossy().into_owned(),
        "--source".to_owned(),
        source.to_string_lossy().into_owned(),
        "file_d".to_owned(),
    ];

    let output = run_shaderpp(Path::new("fixtures/integration_tests/nested_include"), &args);
    assert_eq!(String::from_utf8_lossy(&output.stderr).as_ref(), "");
    assert_eq!(String::from_utf8_lossy(&output.stdout).as_ref(), "");
    assert!(output.status.success());

    let header = fs::read_to_string(header).unwrap();
    assert!(header.starts_with("#ifndef FILE_D_H_\n#define FILE_D_H_\n"));
    assert!(header.contains("namespace file_d {"));
    assert!(header.contains("inline const char* Code() {"));
    assert!(header.ends_with("#endif // FILE_D_H_\n"));

    let source = fs::read_to_string(source).unwrap();
    assert!(source.starts_with("namespace file_d {\n"));
    assert!(source.contains(" = R\"(\nfoo\nbar\nbaz\nblah\nbuzz\nqux\nbruh\n\n)\";\n"));
}

#[test]
fn wrap_failure_leaves_no_output() {
    let out_dir = tempfile::tempdir().unwrap();
    let header = out_dir.path().join("blur.h");
    let source = out_dir.path().join("missing").join("blur.cc");
    let args = vec![
        "--header".to_owned(),
        header.to_string_lossy().into_owned(),
        "--source".to_owned(),
        source.to_string_lossy().into_owned(),
        "file_d".to_owned(),
    ];

    let output = run_shaderpp(Path::new("fixtures/integration_tests/nested_include"), &args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("shaderpp: can't write output: "), "{stderr}");
    assert!(!header.exists());
    assert!(!source.exists());
    assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn header_requires_source() {
    let output = run_shaderpp(
        Path::new("fixtures/integration_tests/plain"),
        &["--header".to_owned(), "out.h".to_owned(), "plain.glsl".to_owned()],
    );
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
    assert!(!Path::new("fixtures/integration_tests/plain/out.h").exists());
}
