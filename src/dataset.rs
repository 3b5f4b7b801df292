/**
 * File: /src/dataset.rs
 * Created Date: Saturday, October 17th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 18th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-17		Zihan	Microdata reader and domain builders
 */
use crate::domain::{AttributeDomain, DomainError, GeneralizationHierarchy, NumericRange};
use crate::mondrian::Record;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Which raw columns are projected, QIDs first, sensitive value last
#[derive(Debug, Clone)]
pub struct DatasetSchema {
    pub qid_columns: Vec<usize>,
    pub sensitive_column: usize,
}

impl DatasetSchema {
    pub fn new(qid_columns: Vec<usize>, sensitive_column: usize) -> Self {
        Self {
            qid_columns,
            sensitive_column,
        }
    }

    fn max_column(&self) -> usize {
        self.qid_columns
            .iter()
            .copied()
            .chain(std::iter::once(self.sensitive_column))
            .max()
            .unwrap_or(0)
    }
}

/// Read comma separated microdata.
///
/// Empty lines and lines with a missing value (`?`) are skipped, spaces are
/// removed, and each kept line is projected onto the schema's columns.
pub fn read_records<R: BufRead>(reader: R, schema: &DatasetSchema) -> io::Result<Vec<Record>> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.contains('?') {
            continue;
        }
        let line = line.replace(' ', "");
        let items: Vec<&str> = line.split(',').collect();
        if items.len() <= schema.max_column() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "line {} has {} columns, schema needs {}",
                    line_no + 1,
                    items.len(),
                    schema.max_column() + 1
                ),
            ));
        }

        let mut record: Record = schema
            .qid_columns
            .iter()
            .map(|&column| items[column].to_string())
            .collect();
        record.push(items[schema.sensitive_column].to_string());
        records.push(record);
    }
    Ok(records)
}

/// Numeric domain over column `attribute` of projected records
pub fn numeric_domain(records: &[Record], attribute: usize) -> Result<NumericRange, DomainError> {
    NumericRange::from_column(records.iter().map(|record| record[attribute].as_str()))
}

/// Generalization hierarchy from a `leaf;parent;...;*` file
pub fn read_hierarchy_file(path: impl AsRef<Path>) -> Result<GeneralizationHierarchy, DomainError> {
    GeneralizationHierarchy::parse(&fs::read_to_string(path)?)
}

/// Kind of QID column, used to build its domain
#[derive(Debug, Clone)]
pub enum AttributeKind {
    Numeric,
    Categorical(GeneralizationHierarchy),
}

/// One domain per QID, numeric ones scanned from `records`
pub fn build_domains(
    records: &[Record],
    kinds: Vec<AttributeKind>,
) -> Result<Vec<AttributeDomain>, DomainError> {
    kinds
        .into_iter()
        .enumerate()
        .map(|(attribute, kind)| match kind {
            AttributeKind::Numeric => numeric_domain(records, attribute).map(AttributeDomain::from),
            AttributeKind::Categorical(tree) => Ok(AttributeDomain::from(tree)),
        })
        .collect()
}

/// Write anonymized rows, one `;` separated line each
pub fn write_rows<W: Write>(mut writer: W, rows: &[Record]) -> io::Result<()> {
    for row in rows {
        writeln!(writer, "{}", row.join(";"))?;
    }
    writer.flush()
}
