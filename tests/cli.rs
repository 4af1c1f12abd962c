extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn renders_a_color_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frac.png");
    Command::cargo_bin("frac")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "16x12", "-i", "40"])
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn renders_a_euclidean_distance_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dist.png");
    // A window around the origin always contains in-set cells, so the
    // distance stage has something to measure from.
    Command::cargo_bin("frac")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "10x10",
            "-c",
            "0,0",
            "-w",
            "4",
            "-i",
            "25",
            "-k",
            "euclid",
        ])
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn renders_a_flood_fill_distance_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("flood.png");
    Command::cargo_bin("frac")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "10x10",
            "-c",
            "0,0",
            "-w",
            "4",
            "-i",
            "25",
            "-k",
            "flood",
        ])
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn rejects_a_malformed_size() {
    Command::cargo_bin("frac")
        .unwrap()
        .args(&["-o", "unused.png", "-s", "16by12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_an_unknown_kind() {
    Command::cargo_bin("frac")
        .unwrap()
        .args(&["-o", "unused.png", "-k", "sepia"])
        .assert()
        .failure();
}
