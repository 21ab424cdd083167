//! Output buffer with indentation tracking
//!
//! Every block writes into a [`JsWriter`]. The writer owns indentation so blocks only describe structure (`indent`,
//! `dedent`, line breaks) and never compute leading whitespace themselves.

/// Spaces per indentation level of beautified output.
pub const INDENT_WIDTH: usize = 4;

/// Writer that tracks indentation and builds JavaScript text
#[derive(Debug)]
pub struct JsWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl Default for JsWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Get the output
    pub fn finish(self) -> String {
        self.output
    }

    /// Take the text written so far, leaving the writer empty at line start.
    ///
    /// The indentation level is kept.
    pub fn take(&mut self) -> String {
        self.at_line_start = true;
        std::mem::take(&mut self.output)
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Restore a previously observed indentation level.
    pub fn set_indent(&mut self, level: usize) {
        self.indent_level = level;
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent_level * INDENT_WIDTH {
                self.output.push(' ');
            }
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Append text that already carries its own indentation (a captured region).
    pub fn write_raw(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.output.push_str(s);
        self.at_line_start = s.ends_with('\n');
    }

    /// Start capturing into an empty buffer; the text written so far is stashed in the returned mark.
    ///
    /// Used where a prologue (the `var` list of temporaries) depends on what the body turns out to need.
    pub fn begin_capture(&mut self) -> CaptureMark {
        let mark = CaptureMark {
            output: std::mem::take(&mut self.output),
            at_line_start: self.at_line_start,
        };
        self.at_line_start = true;
        mark
    }

    /// Stop capturing: restore the stashed text and return what was written since [`JsWriter::begin_capture`].
    pub fn end_capture(&mut self, mark: CaptureMark) -> String {
        let captured = std::mem::replace(&mut self.output, mark.output);
        self.at_line_start = mark.at_line_start;
        captured
    }
}

/// Text stashed by [`JsWriter::begin_capture`].
#[derive(Debug)]
pub struct CaptureMark {
    output: String,
    at_line_start: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_writer_empty_output() {
        let writer = JsWriter::new();
        assert_eq!(writer.current_indent(), 0);
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_write_empty_string_writes_no_indent() {
        let mut writer = JsWriter::new();
        writer.indent();
        writer.write("");
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_writeln_multiple() {
        let mut writer = JsWriter::new();
        writer.writeln("line1");
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\nline2\n");
    }

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = JsWriter::new();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_nested_indentation() {
        let mut writer = JsWriter::new();
        writer.writeln("function () {");
        writer.indent();
        writer.writeln("if (a) {");
        writer.indent();
        writer.writeln("b();");
        writer.dedent();
        writer.writeln("}");
        writer.dedent();
        writer.write("}");
        assert_eq!(writer.finish(), "function () {\n    if (a) {\n        b();\n    }\n}");
    }

    #[test]
    fn test_capture_restores_surrounding_text() {
        let mut writer = JsWriter::new();
        writer.indent();
        writer.write("head");
        let mark = writer.begin_capture();
        writer.writeln("body;");
        let captured = writer.end_capture(mark);
        assert_eq!(captured, "    body;\n");
        writer.newline();
        writer.write_raw(&captured);
        writer.write("tail");
        assert_eq!(writer.finish(), "    head\n    body;\n    tail");
    }

    #[test]
    fn test_take_keeps_indent_level() {
        let mut writer = JsWriter::new();
        writer.indent();
        writer.write("x");
        assert_eq!(writer.take(), "    x");
        assert_eq!(writer.current_indent(), 1);
        writer.write("y");
        assert_eq!(writer.finish(), "    y");
    }
}
