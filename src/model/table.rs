//! Table and row source

use std::fmt;

use crate::error::Result;

use super::schema::Schema;

/// A row is an ordered sequence of cell values
pub type Row = Vec<String>;

/// Single-pass stream of rows
pub type RowSource = Box<dyn Iterator<Item = Result<Row>>>;

/// A schema plus a stream of rows, read once
pub struct Table {
    schema: Schema,
    rows: Option<RowSource>,
}

impl Table {
    /// Build a table from a fallible row stream.
    ///
    /// With explicit `fields` the stream is left untouched. Otherwise the first
    /// row is either consumed as labels (`label_first_row`) or used to count
    /// columns and then yielded again as the first data row.
    pub fn from_source(
        mut source: RowSource,
        fields: Option<Vec<String>>,
        label_first_row: bool,
    ) -> Result<Self> {
        if let Some(fields) = fields {
            return Ok(Self {
                schema: Schema::explicit(fields, label_first_row),
                rows: Some(source),
            });
        }

        let first = match source.next() {
            Some(row) => row?,
            None => {
                let schema = if label_first_row {
                    Schema::from_labels(Vec::new())
                } else {
                    Schema::synthesized(0)
                };
                return Ok(Self {
                    schema,
                    rows: Some(source),
                });
            }
        };

        if label_first_row {
            Ok(Self {
                schema: Schema::from_labels(first),
                rows: Some(source),
            })
        } else {
            let schema = Schema::synthesized(first.len());
            let rows: RowSource = Box::new(std::iter::once(Ok(first)).chain(source));
            Ok(Self {
                schema,
                rows: Some(rows),
            })
        }
    }

    /// Build a table from rows that are already in memory
    pub fn new<I>(rows: I, fields: Option<Vec<String>>, label_first_row: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Row>,
        I::IntoIter: 'static,
    {
        Self::from_source(Box::new(rows.into_iter().map(Ok)), fields, label_first_row)
    }

    /// Build a table with explicit field names
    pub fn with_fields<I>(fields: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
        I::IntoIter: 'static,
    {
        Self {
            schema: Schema::explicit(fields, false),
            rows: Some(Box::new(rows.into_iter().map(Ok))),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &[String] {
        self.schema.fields()
    }

    pub fn is_labelled(&self) -> bool {
        self.schema.is_labelled()
    }

    /// Mark an explicit schema as label-derived
    pub fn labelled(mut self) -> Self {
        self.schema = Schema::explicit(self.schema.fields().to_vec(), true);
        self
    }

    /// Hand out the row stream; `None` once it has been taken
    pub fn take_rows(&mut self) -> Option<RowSource> {
        self.rows.take()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema)
            .field("rows_available", &self.rows.is_some())
            .finish()
    }
}
