use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub command_line: String,
    /// stdout followed by stderr
    pub output: String,
}

/// Transcript of an update, one entry per executed command in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpdateLog {
    entries: Vec<LogEntry>,
}

impl UpdateLog {
    pub fn push(&mut self, command_line: String, output: String) {
        self.entries.push(LogEntry {
            command_line,
            output,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shell-transcript rendering: `$ <command>` followed by its output, entries
/// separated by a newline.
impl fmt::Display for UpdateLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "$ {}\n{}", entry.command_line, entry.output)?;
        }
        Ok(())
    }
}
