/// Multi-line text buffer behind the code pane. Columns count chars, not bytes.
#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

const INDENT: &str = "    ";

impl Default for Editor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl Editor {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `(row, col)` of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_at(&self, row: usize, col: usize) -> usize {
        self.lines[row]
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.lines[row].len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.row, self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn insert_indent(&mut self) {
        for c in INDENT.chars() {
            self.insert_char(c);
        }
    }

    /// Splits the line at the cursor and carries the current indentation over.
    pub fn insert_newline(&mut self) {
        let at = self.byte_at(self.row, self.col);
        let rest = self.lines[self.row].split_off(at);
        let indent: String = self.lines[self.row]
            .chars()
            .take_while(|c| *c == ' ')
            .collect();
        self.col = indent.chars().count();
        self.row += 1;
        self.lines.insert(self.row, format!("{indent}{rest}"));
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let at = self.byte_at(self.row, self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_at(self.row, self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_and_newline_keep_indentation() {
        let mut e = Editor::default();
        for c in "def f():".chars() {
            e.insert_char(c);
        }
        e.insert_newline();
        e.insert_indent();
        for c in "if x:".chars() {
            e.insert_char(c);
        }
        e.insert_newline();
        assert_eq!(e.cursor(), (2, 4));
        for c in "pass".chars() {
            e.insert_char(c);
        }
        assert_eq!(e.text(), "def f():\n    if x:\n    pass");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut e = Editor::from_text("ab\ncd");
        e.move_down();
        e.home();
        e.backspace();
        assert_eq!(e.text(), "abcd");
        assert_eq!(e.cursor(), (0, 2));
    }

    #[test]
    fn delete_at_line_end_pulls_next_line() {
        let mut e = Editor::from_text("ab\ncd");
        e.end();
        e.delete();
        assert_eq!(e.text(), "abcd");
    }

    #[test]
    fn multibyte_chars_are_edited_by_char() {
        let mut e = Editor::from_text("naïve");
        e.end();
        e.move_left();
        e.move_left();
        e.backspace();
        assert_eq!(e.text(), "nave");
        e.insert_char('ï');
        assert_eq!(e.text(), "naïve");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut e = Editor::from_text("long line\nab");
        e.end();
        e.move_down();
        assert_eq!(e.cursor(), (1, 2));
        e.move_up();
        assert_eq!(e.cursor(), (0, 2));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let e = Editor::from_text("a\r\nb");
        assert_eq!(e.lines(), &["a".to_string(), "b".to_string()]);
    }
}
