// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line-oriented output sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destination for expanded text.
pub trait LineSink {
    /// Write text without a line terminator.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write a line followed by a newline.
    fn writeln(&mut self, line: &str) -> io::Result<()> {
        self.write(line)?;
        self.write("\n")
    }

    /// Flush buffered output.
    fn finish(&mut self) -> io::Result<()>;

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.writeln(line)?;
        }
        Ok(())
    }
}

/// Writes to any stream, such as stdout.
pub struct StreamSink<W: Write> {
    out: W,
}

impl<W: Write> StreamSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for StreamSink<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writes to a file, created or truncated on construction.
pub struct FileSink {
    out: BufWriter<File>,
}

impl FileSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
        })
    }
}

impl LineSink for FileSink {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::{LineSink, StreamSink};

    #[test]
    fn stream_sink_terminates_each_line() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write("a").unwrap();
        sink.writeln("b").unwrap();
        sink.write_lines(&["c".to_string(), String::new()]).unwrap();
        sink.finish().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "ab\nc\n\n");
    }
}
