//! Human-facing diagnostics. Everything here goes to stderr so that stdout
//! only ever carries the generated lock file or Nix expression.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

fn use_color() -> bool {
    static USE_COLOR: OnceLock<bool> = OnceLock::new();
    *USE_COLOR.get_or_init(|| env::var_os("NO_COLOR").is_none() && is_tty())
}

fn is_tty() -> bool {
    static IS_TTY: OnceLock<bool> = OnceLock::new();
    *IS_TTY.get_or_init(|| io::stderr().is_terminal())
}

fn paint(code: &str, text: &str) -> String {
    if use_color() {
        format!("\u{1b}[{}m{}\u{1b}[0m", code, text)
    } else {
        text.to_string()
    }
}

fn dim(text: &str) -> String {
    paint("2", text)
}

fn cyan(text: &str) -> String {
    paint("36", text)
}

fn yellow(text: &str) -> String {
    paint("33", text)
}

fn red(text: &str) -> String {
    paint("31", text)
}

pub fn step_with_count(message: &str, count: usize) {
    if is_tty() {
        eprint!("\r\u{1b}[K{} {}\n", dim(message), cyan(&format!("[{}]", count)));
        let _ = io::stderr().flush();
    } else {
        eprintln!("{} [{}]", message, count);
    }
}

pub fn warn(message: &str) {
    let tag = yellow("warn");
    eprintln!("{} {}", tag, message);
}

pub fn error(message: &str) {
    let tag = red("error");
    eprintln!("{} {}", tag, message);
}

pub fn verbose(message: &str) {
    tracing::debug!("{}", message);
}

pub fn is_logging_enabled() -> bool {
    tracing::enabled!(tracing::Level::DEBUG)
}
