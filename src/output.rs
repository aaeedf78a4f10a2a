use std::cell::RefCell;
use std::fmt::Display;
use std::path::Path;

use colored::{ColoredString, Colorize};

#[derive(Clone, Copy, Debug)]
pub enum MsgColor {
    Green,
    Cyan,
    Red,
}

thread_local! {
    static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
}

/// Returns the previous value.
pub fn set_minimal(new_value: bool) -> bool {
    IS_MINIMAL.with(|value| value.replace(new_value))
}

pub fn is_minimal() -> bool {
    IS_MINIMAL.with(|value| *value.borrow())
}

/// Print a status line to stderr, unless `--minimal`.
///
/// Program output owns stdout.
pub fn message(color: MsgColor, left: &str, right: impl Display) {
    if is_minimal() {
        return;
    }
    eprintln!("{} {right}", status(color, left));
}

pub fn file_message(color: MsgColor, left: &str, path: &Path) {
    message(color, left, format!("target {}", path.display()));
}

fn status(color: MsgColor, left: &str) -> ColoredString {
    let left = format!("{left:>12}");
    match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    }
}
