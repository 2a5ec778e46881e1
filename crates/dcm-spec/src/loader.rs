//! CSV loaders for specifications and alternative sets.
//!
//! # Specification CSV
//!
//! One row per expression.  `Expression` is required, `Description` is
//! optional, and every other column is a segment holding coefficients.
//! Blank coefficient cells are filled with `0.0`.  Lines starting with `#`
//! are comments.
//!
//! ```csv
//! Description,Expression,work,school
//! Early departure,start < 7,-0.51,
//! Duration by age,duration * age,0.02,0.01
//! Constant,1,1.0,
//! ```
//!
//! # Alternatives CSV
//!
//! One row per alternative; row `i` becomes `AltId(i)`.  `start` and `end`
//! are required.  A column whose every cell parses as a number is numeric,
//! otherwise it is categorical.  `duration` is derived and must not appear.
//!
//! ```csv
//! start,end
//! 5,5
//! 5,6
//! 6,9
//! ```

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use dcm_core::Column;

use crate::{AlternativeSet, SpecError, SpecResult, Specification};

const EXPRESSION: &str = "Expression";
const DESCRIPTION: &str = "Description";

// ── Specification ─────────────────────────────────────────────────────────────

/// Load and compile a specification from a CSV file.
pub fn load_spec_csv(path: &Path) -> SpecResult<Specification> {
    let file = std::fs::File::open(path).map_err(SpecError::Io)?;
    load_spec_reader(file)
}

/// Like [`load_spec_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for specifications
/// embedded in a binary.
pub fn load_spec_reader<R: Read>(reader: R) -> SpecResult<Specification> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let expr_col = find_header(&headers, EXPRESSION)
        .ok_or_else(|| SpecError::MissingColumn(EXPRESSION.to_owned()))?;
    let desc_col = find_header(&headers, DESCRIPTION);

    let segment_cols: Vec<usize> = (0..headers.len())
        .filter(|&i| i != expr_col && Some(i) != desc_col)
        .collect();
    let mut spec = Specification::new(segment_cols.iter().map(|&i| headers[i].to_owned()))?;

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let expression = record.get(expr_col).unwrap_or("");
        if expression.is_empty() {
            return Err(SpecError::Parse(format!("row {row}: empty expression")));
        }
        let description = desc_col.and_then(|i| record.get(i)).unwrap_or("");

        let coefficients = segment_cols
            .iter()
            .map(|&i| parse_coefficient(record.get(i).unwrap_or(""), row, &headers[i]))
            .collect::<SpecResult<Vec<_>>>()?;

        spec.push_row(description, expression, &coefficients)?;
    }

    Ok(spec)
}

// ── Alternatives ──────────────────────────────────────────────────────────────

/// Load an alternative set from a CSV file.
pub fn load_alternatives_csv(path: &Path) -> SpecResult<AlternativeSet> {
    let file = std::fs::File::open(path).map_err(SpecError::Io)?;
    load_alternatives_reader(file)
}

/// Like [`load_alternatives_csv`] but accepts any `Read` source.
pub fn load_alternatives_reader<R: Read>(reader: R) -> SpecResult<AlternativeSet> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in csv_reader.records() {
        let record = record?;
        for (col, cell) in cells.iter_mut().zip(record.iter()) {
            col.push(cell.to_owned());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| (name.to_owned(), infer_column(values)))
        .collect();

    AlternativeSet::new(columns)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader)
}

fn find_header(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn parse_coefficient(cell: &str, row: usize, segment: &str) -> SpecResult<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        SpecError::Parse(format!(
            "row {row}, segment {segment:?}: invalid coefficient {cell:?}"
        ))
    })
}

/// Numeric if every cell parses as `f64`, categorical otherwise.
fn infer_column(values: Vec<String>) -> Column {
    let numbers: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
    match numbers {
        Some(nums) => Column::Num(nums),
        None => Column::categorical(values),
    }
}
