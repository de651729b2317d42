//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::diff::{DiffStats, RowDiff, SchemaChange, SchemaDiff};
use crate::model::Schema;

use super::{OutputFormatter, RenderContext};

/// JSON output formatter; buffers records and writes one document at the end
pub struct JsonOutput {
    pretty: bool,
    schema_changes: Vec<SchemaChange>,
    rows_skipped: bool,
    row_changes: Vec<JsonRowChange>,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self {
            pretty: true,
            schema_changes: Vec::new(),
            rows_skipped: false,
            row_changes: Vec::new(),
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::new()
        }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable row change for JSON output
#[derive(Serialize)]
struct JsonRowChange {
    #[serde(rename = "type")]
    change_type: &'static str,
    position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cells: Option<Vec<JsonCell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changes: Option<Vec<JsonCellChange>>,
}

#[derive(Serialize)]
struct JsonCell {
    column: String,
    value: String,
}

#[derive(Serialize)]
struct JsonCellChange {
    column: String,
    position: usize,
    old_value: String,
    new_value: String,
}

#[derive(Serialize)]
struct JsonDiffOutput<'a> {
    old_file: String,
    new_file: String,
    schema_changes: &'a [SchemaChange],
    rows_skipped: bool,
    row_changes: &'a [JsonRowChange],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a DiffStats>,
}

fn named_cells(row: &[String], schema: &Schema) -> Vec<JsonCell> {
    row.iter()
        .enumerate()
        .map(|(i, value)| JsonCell {
            column: schema.display_name(i),
            value: value.clone(),
        })
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn schema(
        &mut self,
        diff: &SchemaDiff,
        _ctx: &RenderContext<'_>,
        _writer: &mut dyn Write,
    ) -> Result<()> {
        self.schema_changes = diff.changes();
        Ok(())
    }

    fn rows_skipped(&mut self, _ctx: &RenderContext<'_>, _writer: &mut dyn Write) -> Result<()> {
        self.rows_skipped = true;
        Ok(())
    }

    fn row(&mut self, diff: &RowDiff, ctx: &RenderContext<'_>, _writer: &mut dyn Write) -> Result<()> {
        let change = match diff {
            RowDiff::Added { position, row } => JsonRowChange {
                change_type: "added",
                position: *position,
                cells: Some(named_cells(row, ctx.new_schema)),
                changes: None,
            },
            RowDiff::Deleted { position, row } => JsonRowChange {
                change_type: "deleted",
                position: *position,
                cells: Some(named_cells(row, ctx.old_schema)),
                changes: None,
            },
            RowDiff::Changed {
                position, changes, ..
            } => JsonRowChange {
                change_type: "changed",
                position: *position,
                cells: None,
                changes: Some(
                    changes
                        .iter()
                        .map(|c| JsonCellChange {
                            column: ctx.old_schema.display_name(c.position),
                            position: c.position,
                            old_value: c.old.clone(),
                            new_value: c.new.clone(),
                        })
                        .collect(),
                ),
            },
        };
        self.row_changes.push(change);
        Ok(())
    }

    fn finish(
        &mut self,
        stats: Option<&DiffStats>,
        ctx: &RenderContext<'_>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let output = JsonDiffOutput {
            old_file: ctx.old_path.display().to_string(),
            new_file: ctx.new_path.display().to_string(),
            schema_changes: &self.schema_changes,
            rows_skipped: self.rows_skipped,
            row_changes: &self.row_changes,
            stats,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffEngine, DiffOptions};
    use crate::model::Table;
    use crate::output::render_diff;
    use std::path::Path;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_json_document() {
        let a = Table::with_fields(fields(&["id", "name"]), vec![fields(&["1", "ann"])]);
        let b = Table::with_fields(
            fields(&["id", "name"]),
            vec![fields(&["1", "anne"]), fields(&["2", "bob"])],
        );
        let mut engine = DiffEngine::new(a, b, DiffOptions::default()).unwrap();
        let mut out = Vec::new();
        let found = render_diff(
            &mut engine,
            &mut JsonOutput::compact(),
            Path::new("a.csv"),
            Path::new("b.csv"),
            &mut out,
        )
        .unwrap();
        assert!(found);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["old_file"], "a.csv");
        assert_eq!(value["rows_skipped"], false);
        let rows = value["row_changes"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["type"], "changed");
        assert_eq!(rows[0]["changes"][0]["column"], "name");
        assert_eq!(rows[0]["changes"][0]["new_value"], "anne");
        assert_eq!(rows[1]["type"], "added");
        assert_eq!(rows[1]["cells"][1]["value"], "bob");
        assert_eq!(value["stats"]["rows_added"], 1);
    }

    #[test]
    fn test_json_schema_change() {
        let a = Table::with_fields(fields(&["id"]), Vec::new());
        let b = Table::with_fields(fields(&["id", "name"]), Vec::new());
        let mut engine = DiffEngine::new(a, b, DiffOptions::default()).unwrap();
        let mut out = Vec::new();
        render_diff(
            &mut engine,
            &mut JsonOutput::new(),
            Path::new("a.csv"),
            Path::new("b.csv"),
            &mut out,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rows_skipped"], true);
        assert_eq!(value["schema_changes"][0]["type"], "field_added");
        assert_eq!(value["schema_changes"][0]["name"], "name");
        assert!(value.get("stats").is_none());
    }
}
