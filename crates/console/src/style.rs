//! Raw ANSI styling for the line-mode console.

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

pub fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

pub fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

pub fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

pub fn magenta(text: &str) -> String {
    ansi_wrap(text, "\x1b[35m", "\x1b[39m")
}

pub fn green(text: &str) -> String {
    ansi_wrap(text, "\x1b[32m", "\x1b[39m")
}

pub fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

pub fn red(text: &str) -> String {
    ansi_wrap(text, "\x1b[31m", "\x1b[39m")
}

/// Moves back over a one-column glyph and clears to end of line.
pub const ERASE_PREVIOUS_COLUMN: &str = "\x08\x1b[K";

/// Filled/empty bar, `width` columns wide, for a ratio of `filled` to `total`.
pub fn meter(filled: usize, total: usize, width: usize) -> String {
    let cells = if total == 0 {
        0
    } else {
        (filled.min(total) * width) / total
    };
    format!("{}{}", "█".repeat(cells), "░".repeat(width - cells))
}

/// Text a terminal would leave visible: CSI sequences dropped, backspaces applied.
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' if chars.peek() == Some(&'[') => {
                chars.next();
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            '\x08' => {
                plain.pop();
            }
            _ => plain.push(ch),
        }
    }
    plain
}
