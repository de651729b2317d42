//! Plain or colored terminal output

use std::io::Write;

use anyhow::Result;
use termcolor::{Ansi, Color, ColorSpec, WriteColor};

use crate::diff::{DiffStats, RowDiff, SchemaDiff};

use super::{row_repr, OutputFormatter, RenderContext};

const SEPARATOR_WIDTH: usize = 50;

/// Line-oriented report; detail grows with verbosity.
///
/// * 1: schema changes and one line per row record (with the row for
///   added/deleted rows)
/// * 2: plus each changed value and a separator after every row record
/// * 3: plus a header and a summary
pub struct TerminalOutput {
    color: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn line(
        &self,
        writer: &mut dyn Write,
        color: Option<Color>,
        indent: usize,
        text: &str,
    ) -> Result<()> {
        match color {
            Some(color) if self.color => {
                let mut out = Ansi::new(&mut *writer);
                out.set_color(ColorSpec::new().set_fg(Some(color)))?;
                write!(out, "{:indent$}{}", "", text, indent = indent)?;
                out.reset()?;
                writeln!(out)?;
            }
            _ => writeln!(writer, "{:indent$}{}", "", text, indent = indent)?,
        }
        Ok(())
    }

    fn separator(&self, ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        if ctx.verbosity >= 2 {
            self.line(writer, None, 0, &"-".repeat(SEPARATOR_WIDTH))?;
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn begin(&mut self, ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        if ctx.verbosity >= 3 {
            self.line(
                writer,
                None,
                0,
                &format!(
                    "csvdiff: {} → {}",
                    ctx.old_path.display(),
                    ctx.new_path.display()
                ),
            )?;
        }
        Ok(())
    }

    fn schema(
        &mut self,
        diff: &SchemaDiff,
        ctx: &RenderContext<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if ctx.verbosity < 1 {
            return Ok(());
        }
        for change in diff.changes() {
            self.line(writer, Some(Color::Yellow), 0, &change.to_string())?;
        }
        Ok(())
    }

    fn rows_skipped(&mut self, ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        if ctx.verbosity >= 2 {
            self.line(writer, None, 0, "Fields changed, skipping row diff!")?;
        }
        Ok(())
    }

    fn row(&mut self, diff: &RowDiff, ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        if ctx.verbosity < 1 {
            return Ok(());
        }
        match diff {
            RowDiff::Added { position, row } => {
                self.line(writer, Some(Color::Green), 0, &format!("Row {} added", position))?;
                self.line(writer, None, 0, &row_repr(row))?;
            }
            RowDiff::Deleted { position, row } => {
                self.line(writer, Some(Color::Red), 0, &format!("Row {} deleted", position))?;
                self.line(writer, None, 0, &row_repr(row))?;
            }
            RowDiff::Changed {
                position, changes, ..
            } => {
                self.line(writer, Some(Color::Yellow), 0, &format!("Row {} changed", position))?;
                if ctx.verbosity >= 2 {
                    for change in changes {
                        self.line(
                            writer,
                            None,
                            4,
                            &format!(
                                "Value in field '{}' changed: '{}' -> '{}'",
                                ctx.old_schema.display_name(change.position),
                                change.old,
                                change.new
                            ),
                        )?;
                    }
                }
            }
        }
        self.separator(ctx, writer)
    }

    fn finish(
        &mut self,
        stats: Option<&DiffStats>,
        ctx: &RenderContext<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if ctx.verbosity < 3 {
            return Ok(());
        }
        match stats {
            Some(stats) => self.line(
                writer,
                None,
                0,
                &format!(
                    "Summary: +{} added, -{} deleted, ~{} changed (out of {} → {} rows)",
                    stats.rows_added,
                    stats.rows_deleted,
                    stats.rows_changed,
                    stats.old_row_count,
                    stats.new_row_count
                ),
            ),
            None => self.line(writer, None, 0, "Summary: schemas differ, rows not compared"),
        }
    }
}
