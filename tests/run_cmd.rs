use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

fn cargo_bin() -> Command { Command::cargo_bin("bf_run").unwrap() }

const HELLO: &str = "something something ++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+hello there.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.[-]";

fn source_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn interprets_commented_hello_world() {
    let tf = source_tempfile(HELLO);
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello World!\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn raw_mode_prints_the_same() {
    let tf = source_tempfile(HELLO);
    cargo_bin()
        .args(["-m", "raw"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn reads_program_input_from_stdin() {
    let tf = source_tempfile(",[.,]");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("echo me")
        .assert()
        .success()
        .stdout("echo me");
}

#[test]
fn bf2c_prints_c_to_stdout() {
    let tf = source_tempfile("+++.");
    cargo_bin()
        .args(["--mode", "bf2c"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("#include <stdio.h>")
                .and(predicate::str::contains("*ptr += 3;"))
                .and(predicate::str::contains("putchar(*ptr);")),
        );
}

#[test]
fn bf2js_writes_output_file() {
    let tf = source_tempfile("+[-]>.");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("prog.js");
    cargo_bin()
        .args(["--mode", "bf2js", "--output"])
        .arg(&out)
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Transpiled to JavaScript:"));

    let code = fs::read_to_string(&out).unwrap();
    assert!(code.contains("memory[pointer] = 0;"));
    assert!(code.contains("pointer += 1;"));
}

#[test]
fn unmatched_bracket_fails_before_running() {
    let tf = source_tempfile("+.[");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unmatched bracket '['"));
}

#[test]
fn pointer_underflow_is_a_runtime_error() {
    let tf = source_tempfile("+.<");
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout("\u{1}")
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn output_flag_requires_transpile_mode() {
    let tf = source_tempfile("+.");
    cargo_bin()
        .args(["--output", "x.c"])
        .arg(tf.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--output only applies"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .current_dir(dir.path())
        .arg("-absent.bf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read -absent.bf"));
}

#[test]
fn unknown_mode_is_rejected() {
    let tf = source_tempfile("+.");
    cargo_bin()
        .args(["--mode", "jit"])
        .arg(tf.path())
        .assert()
        .failure();
}

#[test]
fn wrong_argument_count_prints_usage() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}
