// ABOUTME: TUI state types — chat messages, the transcript, and the editable input buffer.
// ABOUTME: Plain data owned by the ChatWidget; no I/O happens here.

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
}

/// A single message in the transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    origin: Origin,
}

impl Message {
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Origin::User)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Origin::Assistant)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// Ordered, append-only list of displayed messages.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Editable, possibly multi-line input text with a character-indexed cursor.
#[derive(Debug, Default)]
pub struct InputBuffer {
    pub text: String,
    pub cursor_pos: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer contents and move the cursor to the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.move_cursor_end();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_pos = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Clamp the cursor position to the valid character range of the buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.char_len());
    }

    /// Return the current cursor byte index in the UTF-8 buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.text, self.cursor_pos)
    }

    /// Return the total number of characters in the buffer.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.text.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert a string at the cursor (paste) and advance past it.
    pub fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.text.insert_str(byte_index, s);
        self.cursor_pos += s.chars().count();
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.text, self.cursor_pos - 1);
        self.text.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.text, self.cursor_pos + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to the start of the current line.
    pub fn move_cursor_home(&mut self) {
        self.cursor_pos -= self.cursor_column().min(self.cursor_pos);
    }

    /// Move cursor to the end of the current line.
    pub fn move_cursor_end_of_line(&mut self) {
        let line = self.cursor_line();
        let col = self.cursor_column();
        let line_len = self
            .lines()
            .get(line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        self.cursor_pos += line_len.saturating_sub(col);
    }

    /// Move cursor to the end of the buffer.
    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.char_len();
    }

    /// The buffer split into logical lines. Always at least one line.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines().len()
    }

    /// Zero-based logical line holding the cursor.
    pub fn cursor_line(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor_pos)
            .filter(|&c| c == '\n')
            .count()
    }

    /// Character column of the cursor within its line.
    pub fn cursor_column(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor_pos)
            .collect::<Vec<_>>()
            .iter()
            .rev()
            .take_while(|&&c| c != '\n')
            .count()
    }

    /// Move the cursor up one line, keeping the column where possible.
    /// Returns false when already on the first line.
    pub fn move_cursor_up(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line == 0 {
            return false;
        }
        let col = self.cursor_column();
        self.move_to_line_col(line - 1, col);
        true
    }

    /// Move the cursor down one line, keeping the column where possible.
    /// Returns false when already on the last line.
    pub fn move_cursor_down(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line + 1 >= self.line_count() {
            return false;
        }
        let col = self.cursor_column();
        self.move_to_line_col(line + 1, col);
        true
    }

    fn move_to_line_col(&mut self, target_line: usize, col: usize) {
        let lines = self.lines();
        let before: usize = lines
            .iter()
            .take(target_line)
            .map(|l| l.chars().count() + 1)
            .sum();
        let len = lines
            .get(target_line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        self.cursor_pos = before + col.min(len);
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
