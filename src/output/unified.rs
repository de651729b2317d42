//! Git-style unified diff output

use std::io::Write;

use anyhow::Result;

use crate::diff::{RowDiff, SchemaDiff};

use super::{OutputFormatter, RenderContext};

/// Unified diff output (Git-style). Positions are 0-based data row indices.
pub struct UnifiedOutput;

impl UnifiedOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnifiedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for UnifiedOutput {
    fn begin(&mut self, ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "--- {}", ctx.old_path.display())?;
        writeln!(writer, "+++ {}", ctx.new_path.display())?;
        Ok(())
    }

    fn schema(
        &mut self,
        diff: &SchemaDiff,
        ctx: &RenderContext<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }
        writeln!(writer, "@@ header @@")?;
        writeln!(writer, "-{}", ctx.old_schema.fields().join(","))?;
        writeln!(writer, "+{}", ctx.new_schema.fields().join(","))?;
        Ok(())
    }

    fn row(&mut self, diff: &RowDiff, _ctx: &RenderContext<'_>, writer: &mut dyn Write) -> Result<()> {
        match diff {
            RowDiff::Added { position, row } => {
                writeln!(writer, "@@ +{} @@", position)?;
                writeln!(writer, "+{}", row.join(","))?;
            }
            RowDiff::Deleted { position, row } => {
                writeln!(writer, "@@ -{} @@", position)?;
                writeln!(writer, "-{}", row.join(","))?;
            }
            RowDiff::Changed {
                position,
                old_row,
                new_row,
                ..
            } => {
                writeln!(writer, "@@ -{} +{} @@", position, position)?;
                writeln!(writer, "-{}", old_row.join(","))?;
                writeln!(writer, "+{}", new_row.join(","))?;
            }
        }
        Ok(())
    }
}
