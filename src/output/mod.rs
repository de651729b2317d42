//! Output formatting for diff results

mod json;
mod terminal;
mod unified;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::config::OutputFormat;
use crate::diff::{DiffEngine, DiffStats, RowDiff, SchemaDiff};
use crate::model::Schema;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;
pub use unified::UnifiedOutput;

/// What a formatter knows about the comparison being rendered
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub old_path: &'a Path,
    pub new_path: &'a Path,
    pub old_schema: &'a Schema,
    pub new_schema: &'a Schema,
    pub verbosity: u8,
}

/// Trait for output formatters.
///
/// Called in order: `begin`, `schema`, then either `rows_skipped` or one
/// `row` per row difference, then `finish`.
pub trait OutputFormatter {
    fn begin(&mut self, _ctx: &RenderContext<'_>, _writer: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn schema(
        &mut self,
        diff: &SchemaDiff,
        ctx: &RenderContext<'_>,
        writer: &mut dyn Write,
    ) -> Result<()>;

    fn rows_skipped(&mut self, _ctx: &RenderContext<'_>, _writer: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn row(&mut self, diff: &RowDiff, ctx: &RenderContext<'_>, writer: &mut dyn Write)
        -> Result<()>;

    fn finish(
        &mut self,
        _stats: Option<&DiffStats>,
        _ctx: &RenderContext<'_>,
        _writer: &mut dyn Write,
    ) -> Result<()> {
        Ok(())
    }
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new().with_color(color)),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Unified => Box::new(UnifiedOutput::new()),
        }
    }
}

/// Diff schemas, then rows only when the schemas match, feeding every result
/// to `formatter` as it is produced. Returns whether any difference was found.
pub fn render_diff(
    engine: &mut DiffEngine,
    formatter: &mut dyn OutputFormatter,
    old_path: &Path,
    new_path: &Path,
    writer: &mut dyn Write,
) -> Result<bool> {
    let old_schema = engine.schema_a().clone();
    let new_schema = engine.schema_b().clone();
    let ctx = RenderContext {
        old_path,
        new_path,
        old_schema: &old_schema,
        new_schema: &new_schema,
        verbosity: engine.options().verbosity,
    };

    formatter.begin(&ctx, writer)?;

    let schema = engine.diff_schema();
    formatter.schema(&schema, &ctx, writer)?;

    if !schema.is_empty() {
        debug!("Fields changed, skipping row diff");
        formatter.rows_skipped(&ctx, writer)?;
        formatter.finish(None, &ctx, writer)?;
        return Ok(engine.difference_detected());
    }

    let mut rows = engine.diff_rows()?;
    for diff in rows.by_ref() {
        formatter.row(&diff?, &ctx, writer)?;
    }
    let stats = rows.stats().clone();
    formatter.finish(Some(&stats), &ctx, writer)?;

    Ok(engine.difference_detected())
}

/// Render to stdout
pub fn render_to_stdout(
    engine: &mut DiffEngine,
    format: OutputFormat,
    color: bool,
    old_path: &Path,
    new_path: &Path,
) -> Result<bool> {
    let mut formatter = OutputFactory::create(format, color);
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let found = render_diff(engine, formatter.as_mut(), old_path, new_path, &mut lock)?;
    lock.flush()?;
    Ok(found)
}

/// Render a row as `('a', 'b', 'c')`
pub(crate) fn row_repr(row: &[String]) -> String {
    let cells: Vec<String> = row.iter().map(|c| format!("'{}'", c)).collect();
    if cells.len() == 1 {
        format!("({},)", cells[0])
    } else {
        format!("({})", cells.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffOptions;
    use crate::model::{Row, Table};

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn table(names: &[&str], data: &[&[&str]]) -> Table {
        let rows: Vec<Row> = data.iter().map(|r| fields(r)).collect();
        Table::with_fields(fields(names), rows)
    }

    fn render(a: Table, b: Table, verbosity: u8) -> (String, bool) {
        let mut engine =
            DiffEngine::new(a, b, DiffOptions::default().with_verbosity(verbosity)).unwrap();
        let mut formatter = TerminalOutput::new();
        let mut out = Vec::new();
        let found = render_diff(
            &mut engine,
            &mut formatter,
            Path::new("a.csv"),
            Path::new("b.csv"),
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), found)
    }

    const SEP: &str = "--------------------------------------------------\n";

    #[test]
    fn test_same() {
        let (out, found) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            2,
        );
        assert_eq!(out, "");
        assert!(!found);
    }

    #[test]
    fn test_added() {
        let (out, found) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            table(&["1", "2", "3"], &[&["a", "b", "c"], &["e", "f", "g"]]),
            2,
        );
        assert_eq!(out, format!("Row 1 added\n('e', 'f', 'g')\n{}", SEP));
        assert!(found);
    }

    #[test]
    fn test_deleted() {
        let (out, _) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"], &["e", "f", "g"]]),
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            2,
        );
        assert_eq!(out, format!("Row 1 deleted\n('e', 'f', 'g')\n{}", SEP));
    }

    #[test]
    fn test_changed_and_added() {
        let (out, _) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            table(&["1", "2", "3"], &[&["a", "b", "d"], &["e", "f", "g"]]),
            2,
        );
        assert_eq!(
            out,
            format!(
                "Row 0 changed\n    Value in field '3' changed: 'c' -> 'd'\n{}Row 1 added\n('e', 'f', 'g')\n{}",
                SEP, SEP
            )
        );
    }

    #[test]
    fn test_verbosity_one_is_terse() {
        let (out, _) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            table(&["1", "2", "3"], &[&["a", "b", "d"]]),
            1,
        );
        assert_eq!(out, "Row 0 changed\n");
    }

    #[test]
    fn test_schema_change_skips_rows() {
        let (out, found) = render(
            table(&["1", "2", "3"], &[&["a", "b", "c"]]),
            table(&["1", "2", "3", "4"], &[&["x", "y", "z", "w"]]),
            2,
        );
        assert_eq!(
            out,
            "Field '4' added at position 3\nFields changed, skipping row diff!\n"
        );
        assert!(found);
    }

    #[test]
    fn test_row_repr() {
        assert_eq!(row_repr(&fields(&["a"])), "('a',)");
        assert_eq!(row_repr(&fields(&["a", "b"])), "('a', 'b')");
    }
}
