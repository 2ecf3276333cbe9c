//! Plain terminal output for CLI handlers.

use std::fmt::Display;

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{title}");
}

/// Print an indented `label: value` line.
pub fn field(label: &str, value: impl Display) {
    println!("  {label:<24} {value}");
}

pub fn success(message: &str) {
    println!("ok: {message}");
}

pub fn warning(message: &str) {
    println!("warning: {message}");
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}
