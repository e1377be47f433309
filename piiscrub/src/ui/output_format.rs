// piiscrub/src/ui/output_format.rs
//! Status messages printed to stderr.
//!
//! Colour is applied only when the caller says the stream supports it, so
//! redirected output and test captures stay plain.

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    color: AnsiColors,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", prefix.color(color).bold(), msg)
    } else {
        writeln!(writer, "{} {}", prefix, msg)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[piiscrub]", msg, AnsiColors::Cyan, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[piiscrub WARN]", msg, AnsiColors::Yellow, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[piiscrub ERROR]", msg, AnsiColors::Red, supports_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_has_no_escapes() {
        let mut buf = Vec::new();
        print_warn_message(&mut buf, "careful", false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[piiscrub WARN] careful\n");
    }

    #[test]
    fn test_colored_output_wraps_prefix() {
        let mut buf = Vec::new();
        print_error_message(&mut buf, "bad", true).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains('\u{1b}'));
        assert!(out.ends_with(" bad\n"));
    }
}
