//! Shell script generation for duplicate file deletion.
//!
//! Renders the removal plan as a POSIX shell script the user can review and
//! run. The script defaults to dry-run mode and only deletes when invoked
//! with `--confirm`; dupescan itself never deletes anything.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dupescan::output::script::ScriptOutput;
//!
//! let output = ScriptOutput::new(&result);
//! output.write_to(&mut std::io::stdout()).unwrap();
//! ```

use std::io::Write;

use super::plan::{escape_posix, RemovalPlan, Section};
use crate::duplicates::{DuplicateGroup, ScanResult};

/// Formatter for shell script output.
pub struct ScriptOutput<'a> {
    result: &'a ScanResult,
    plan: RemovalPlan,
}

impl<'a> ScriptOutput<'a> {
    /// Create a new script output formatter.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self {
            result,
            plan: RemovalPlan::from_result(result),
        }
    }

    /// Write the generated script to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "#!/bin/sh")?;
        writeln!(writer, "# dupescan duplicate deletion script")?;
        writeln!(
            writer,
            "# Generated on: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(
            writer,
            "# Scanned: {}",
            comment_text(&self.result.root.display().to_string())
        )?;
        writeln!(writer, "#")?;
        writeln!(
            writer,
            "# WARNING: This script will PERMANENTLY DELETE files."
        )?;
        writeln!(writer, "# Please review carefully before executing.")?;
        writeln!(writer, "#")?;
        writeln!(writer, "# Planned removals: {}", self.plan.len())?;
        writeln!(
            writer,
            "# Space freed: {}",
            bytesize::ByteSize::b(self.plan.total_bytes())
        )?;
        writeln!(writer)?;

        writeln!(writer, "DRY_RUN=1")?;
        writeln!(writer, "if [ \"$1\" = \"--confirm\" ]; then")?;
        writeln!(writer, "    DRY_RUN=0")?;
        writeln!(writer, "fi")?;
        writeln!(writer)?;

        writeln!(writer, "if [ \"$DRY_RUN\" -eq 1 ]; then")?;
        writeln!(
            writer,
            "    echo \"DRY RUN MODE. No files will be deleted.\""
        )?;
        writeln!(
            writer,
            "    echo \"Run with --confirm to actually delete files.\""
        )?;
        writeln!(writer, "    echo")?;
        writeln!(writer, "fi")?;
        writeln!(writer)?;

        writeln!(writer, "DELETED_COUNT=0")?;
        writeln!(writer, "RECLAIMED_BYTES=0")?;
        writeln!(writer)?;

        self.write_section(writer, Section::Name, &self.result.name_groups)?;
        self.write_section(writer, Section::Content, &self.result.content_groups)?;

        writeln!(writer, "if [ \"$DRY_RUN\" -eq 0 ]; then")?;
        writeln!(
            writer,
            "    echo \"Deletion complete. Deleted $DELETED_COUNT files.\""
        )?;
        writeln!(writer, "    echo \"Reclaimed $RECLAIMED_BYTES bytes.\"")?;
        writeln!(writer, "else")?;
        writeln!(
            writer,
            "    echo \"Dry run complete. No files were deleted.\""
        )?;
        writeln!(writer, "fi")?;

        Ok(())
    }

    fn write_section<W: Write>(
        &self,
        writer: &mut W,
        section: Section,
        groups: &[DuplicateGroup],
    ) -> std::io::Result<()> {
        for (i, group) in groups.iter().enumerate() {
            let removals: Vec<_> = self
                .plan
                .section(section)
                .filter(|r| group.files.iter().any(|f| f.path == r.path))
                .collect();

            writeln!(
                writer,
                "# {} group {}: {}",
                section,
                i + 1,
                comment_text(&group.key.to_string())
            )?;
            for file in &group.files {
                let path_str = escape_posix(&file.path);
                let comment = comment_text(&path_str);
                match removals.iter().find(|r| r.path == file.path) {
                    Some(removal) => {
                        writeln!(writer, "# DELETE: {}", comment)?;
                        writeln!(writer, "if [ \"$DRY_RUN\" -eq 0 ]; then")?;
                        writeln!(writer, "    {} && \\", removal.command())?;
                        writeln!(writer, "    DELETED_COUNT=$((DELETED_COUNT + 1)) && \\")?;
                        writeln!(
                            writer,
                            "    RECLAIMED_BYTES=$((RECLAIMED_BYTES + {}))",
                            removal.size
                        )?;
                        writeln!(writer, "else")?;
                        writeln!(writer, "    printf 'would delete: %s\\n' {}", path_str)?;
                        writeln!(writer, "fi")?;
                    }
                    None if self.plan.contains(&file.path) => {
                        writeln!(writer, "# PLANNED ABOVE: {}", comment)?;
                    }
                    None => writeln!(writer, "# KEEP:   {}", comment)?,
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Keep text on one comment line.
fn comment_text(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}
