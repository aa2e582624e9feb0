//! ANSI rendering: the escape sequences the line editor uses to keep the
//! terminal's visible line and physical cursor in sync with
//! `PromptState`.

pub const BEL: u8 = 0x07;

fn cursor_left(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}D")
    }
}

/// A full redraw: clear the current line and reprint `prompt` + `buffer`,
/// leaving the physical cursor at column `prompt.len() + cursor`.
pub fn redraw_line(prompt: &str, buffer: &[u8], cursor: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(prompt.len() + buffer.len() + 8);
    out.push(b'\r');
    out.extend_from_slice(b"\x1b[K");
    out.extend_from_slice(prompt.as_bytes());
    out.extend_from_slice(buffer);
    let trailing = buffer.len() - cursor;
    if trailing > 0 {
        out.extend_from_slice(cursor_left(trailing).as_bytes());
    }
    out
}

/// `ESC [ 2 J` then `ESC [ H`: clear screen and home the cursor (`^L`).
pub fn clear_screen_and_home() -> Vec<u8> {
    b"\x1b[2J\x1b[H".to_vec()
}

/// Candidates, two-space separated, on a line of their own.
pub fn format_candidates(candidates: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(candidates.join("  ").as_bytes());
    out.extend_from_slice(b"\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bytes: &[u8]) -> vt100::Parser {
        let mut parser = vt100::Parser::new(24, 80, 0);
        parser.process(bytes);
        parser
    }

    #[test]
    fn redraw_at_end_of_buffer_leaves_cursor_after_text() {
        let out = redraw_line("$ ", b"echo hi", 7);
        let parser = render(&out);
        assert_eq!(parser.screen().cursor_position(), (0, 9));
    }

    #[test]
    fn redraw_mid_buffer_leaves_cursor_at_logical_column() {
        let out = redraw_line("$ ", b"echo hi", 4);
        let parser = render(&out);
        assert_eq!(parser.screen().cursor_position(), (0, 6));
    }

    #[test]
    fn clear_screen_and_home_resets_cursor_to_origin() {
        let mut parser = vt100::Parser::new(24, 80, 0);
        parser.process(b"some leftover text");
        parser.process(&clear_screen_and_home());
        assert_eq!(parser.screen().cursor_position(), (0, 0));
    }

    #[test]
    fn format_candidates_joins_with_two_spaces() {
        let out = format_candidates(&["cd".to_string(), "cat".to_string()]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("cd  cat"));
    }
}
