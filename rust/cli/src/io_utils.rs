//! Input helpers for interactive commands.

use std::io::BufRead;

/// Reads one line, trimmed. `None` on EOF or a read error.
///
/// ```rust
/// use std::io::Cursor;
/// # use pokerroom_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("  call \n");
/// assert_eq!(read_stdin_line(&mut input).as_deref(), Some("call"));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Strips a leading UTF-8 byte order mark in place.
pub fn strip_utf8_bom(s: &mut String) {
    if s.starts_with('\u{feff}') {
        s.drain(..'\u{feff}'.len_utf8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_eof() {
        let mut input = Cursor::new("fold\n\nq\n");
        assert_eq!(read_stdin_line(&mut input).as_deref(), Some("fold"));
        assert_eq!(read_stdin_line(&mut input).as_deref(), Some(""));
        assert_eq!(read_stdin_line(&mut input).as_deref(), Some("q"));
        assert_eq!(read_stdin_line(&mut input), None);
    }

    #[test]
    fn strips_only_a_leading_bom() {
        let mut s = "\u{feff}As Kd".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "As Kd");
        strip_utf8_bom(&mut s);
        assert_eq!(s, "As Kd");
    }
}
