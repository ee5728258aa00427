//! Code writer - builds target source text with indentation tracking.
//!
//! This is the output sink of a generation run: a dumb line buffer with scoped block open/close.
//! It never inspects what it is given.

use std::fmt::Write;

use super::config::EmitConfig;

/// A buffer for building source code with proper indentation.
#[derive(Debug)]
pub struct CodeWriter {
    buffer: String,
    indent_level: usize,
    indent_str: String,
}

impl CodeWriter {
    pub fn new(config: &EmitConfig) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: " ".repeat(config.indent_width),
        }
    }

    /// Get the generated code.
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation.
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a formatted line with current indentation.
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        let _ = self.buffer.write_fmt(args);
        self.buffer.push('\n');
    }

    /// Write text verbatim, terminating it with a newline if it lacks one.
    pub fn raw(&mut self, s: &str) {
        self.buffer.push_str(s);
        if !s.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    /// Write a blank line.
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only.
    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.indent_str);
        }
    }

    /// Increase indent level.
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level.
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a line one level to the left of the current indentation (labels, `case`, `public:`).
    pub fn outdented_line(&mut self, s: &str) {
        self.dedent();
        self.line(s);
        self.indent();
    }

    /// Open a brace block: `header {` (or a bare `{` for an empty header).
    pub fn open_block(&mut self, header: &str) {
        if header.is_empty() {
            self.line("{");
        } else {
            self.linef(format_args!("{} {{", header));
        }
        self.indent();
    }

    /// Close a brace block with `}`.
    pub fn close_block(&mut self) {
        self.close_block_with("}");
    }

    /// Close a brace block with custom closing text (e.g. `};` or `} while (x);`).
    pub fn close_block_with(&mut self, closing: &str) {
        self.dedent();
        self.line(closing);
    }
}
