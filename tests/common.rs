#![allow(dead_code)]

use assert_cmd::{Command, cargo_bin_cmd};

/// Returns a `Command` for the `stempeluhr` binary.
pub fn stmp() -> Command {
    cargo_bin_cmd!("stempeluhr")
}
