//! Debug console for forwarded renderer logs
//!
//! Each record becomes one `file@line->message\r\n` line, built on the
//! stack and sent in a single write so lines from different call sites
//! never interleave on the wire.

use core::fmt::Write as _;

use heapless::String;

use crate::renderer::LogRecord;

/// Longest line written, including the trailing CRLF
pub const LOG_LINE_LEN: usize = 128;

const LINE_END: &str = "\r\n";

/// Fixed-capacity line that silently drops what does not fit
///
/// Room for the line ending is always kept free.
struct LineBuf(String<LOG_LINE_LEN>);

impl core::fmt::Write for LineBuf {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let room = LOG_LINE_LEN - LINE_END.len();
        for c in s.chars() {
            if self.0.len() + c.len_utf8() > room {
                break;
            }
            // Capacity checked above
            let _ = self.0.push(c);
        }
        Ok(())
    }
}

/// Format a record into a single terminated line
pub fn format_record(record: &LogRecord<'_>) -> String<LOG_LINE_LEN> {
    let mut line = LineBuf(String::new());
    let _ = write!(line, "{}@{}->{}", record.file, record.line, record.message);
    let _ = line.0.push_str(LINE_END);
    line.0
}

/// Serial-style sink for renderer log lines
pub struct DebugConsole<W> {
    writer: W,
}

impl<W: embedded_io::Write> DebugConsole<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one record as a single line
    pub fn write_record(&mut self, record: &LogRecord<'_>) -> Result<(), W::Error> {
        let line = format_record(record);
        self.writer.write_all(line.as_bytes())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn release(self) -> W {
        self.writer
    }
}
