//! Human-readable report.
//!
//! ```text
//! Scanning for files in: /home/user/Music
//!
//! --- Duplicates Found by Name ---
//!
//! Name: song.mp3
//! Original: /home/user/Music/a/song.mp3 (4.0 MiB)
//! Duplicate: /home/user/Music/b/song.mp3 (4.0 MiB)
//!
//! --- Commands to Remove Name Duplicates ---
//! rm '/home/user/Music/b/song.mp3'
//! --------------------------------------------------
//! ```

use std::io::Write;

use bytesize::ByteSize;

use super::plan::{RemovalPlan, Section};
use crate::duplicates::{DuplicateGroup, ScanMode, ScanResult};
use crate::scanner::FileRecord;

const SEPARATOR_WIDTH: usize = 50;

/// Formatter for the text report.
pub struct TextReport<'a> {
    result: &'a ScanResult,
    plan: RemovalPlan,
    mode: ScanMode,
}

impl<'a> TextReport<'a> {
    /// Create a report covering both sections.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self {
            result,
            plan: RemovalPlan::from_result(result),
            mode: ScanMode::Both,
        }
    }

    /// Only print the sections `mode` produced.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "Scanning for files in: {}", self.result.root.display())?;
        writeln!(writer)?;

        if self.mode.by_name() {
            self.write_section(writer, Section::Name, &self.result.name_groups)?;
        }
        if self.mode.by_content() {
            self.write_section(writer, Section::Content, &self.result.content_groups)?;
        }
        Ok(())
    }

    fn write_section<W: Write>(
        &self,
        writer: &mut W,
        section: Section,
        groups: &[DuplicateGroup],
    ) -> std::io::Result<()> {
        let label = match section {
            Section::Name => "name",
            Section::Content => "content",
        };

        if groups.is_empty() {
            writeln!(writer, "No duplicates found by {label}.")?;
            writeln!(writer)?;
            return Ok(());
        }

        writeln!(writer, "--- Duplicates Found by {section} ---")?;
        for group in groups {
            writeln!(writer)?;
            match section {
                Section::Name => writeln!(writer, "Name: {}", group.key)?,
                Section::Content => writeln!(writer, "Hash: {}", group.key)?,
            }
            if let Some(original) = group.original() {
                writeln!(writer, "Original: {}", describe(original))?;
            }
            for dup in group.duplicates() {
                writeln!(writer, "Duplicate: {}", describe(dup))?;
            }
        }

        let mut commands = self.plan.section(section).peekable();
        if commands.peek().is_some() {
            writeln!(writer)?;
            writeln!(writer, "--- Commands to Remove {section} Duplicates ---")?;
            for removal in commands {
                writeln!(writer, "{}", removal.command())?;
            }
        }
        writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        writeln!(writer)?;
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn describe(file: &FileRecord) -> String {
    format!("{} ({})", file.path.display(), ByteSize::b(file.size))
}
