//! Typed attribute columns shared by agent tables and alternative sets.
//!
//! A column is either numeric (`f64`, booleans stored as 1.0 / 0.0) or
//! categorical.  Categorical columns are dictionary encoded: each row holds a
//! `u32` code into a small `levels` list, so comparing a column against a
//! string literal is one lookup plus an integer scan.

use rustc_hash::FxHashMap;

// ── Scalar ────────────────────────────────────────────────────────────────────

/// One cell of a [`Column`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Num(f64),
    Text(&'a str),
}

// ── Categorical ───────────────────────────────────────────────────────────────

/// Dictionary-encoded string column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Categorical {
    codes:  Vec<u32>,
    levels: Vec<String>,
}

impl Categorical {
    /// Intern `labels` in first-seen order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup: FxHashMap<String, u32> = FxHashMap::default();
        let mut levels = Vec::new();
        let codes = labels
            .into_iter()
            .map(|label| {
                let label = label.as_ref();
                match lookup.get(label) {
                    Some(&code) => code,
                    None => {
                        let code = levels.len() as u32;
                        levels.push(label.to_owned());
                        lookup.insert(label.to_owned(), code);
                        code
                    }
                }
            })
            .collect();
        Self { codes, levels }
    }

    /// Build from pre-computed codes.  Returns `None` if any code is out of
    /// range for `levels`.
    pub fn from_codes(codes: Vec<u32>, levels: Vec<String>) -> Option<Self> {
        if codes.iter().any(|&c| c as usize >= levels.len()) {
            return None;
        }
        Some(Self { codes, levels })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Code of `label`, or `None` if no row carries it.
    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.levels.iter().position(|l| l == label).map(|i| i as u32)
    }

    /// Label of row `row`.
    #[inline]
    pub fn label(&self, row: usize) -> &str {
        &self.levels[self.codes[row] as usize]
    }

    /// Gather `rows` into a new column sharing the same level list.
    pub fn take(&self, rows: &[usize]) -> Categorical {
        Categorical {
            codes:  rows.iter().map(|&r| self.codes[r]).collect(),
            levels: self.levels.clone(),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

/// A named table column: numeric or categorical.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Num(Vec<f64>),
    Cat(Categorical),
}

impl Column {
    /// Numeric column from anything convertible to `f64`.
    pub fn numeric<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        Column::Num(values.into_iter().map(Into::into).collect())
    }

    /// Categorical column from string labels.
    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Column::Cat(Categorical::from_labels(labels))
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Num(v) => v.len(),
            Column::Cat(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `"numeric"` or `"categorical"`, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Num(_) => "numeric",
            Column::Cat(_) => "categorical",
        }
    }

    pub fn as_num(&self) -> Option<&[f64]> {
        match self {
            Column::Num(v) => Some(v),
            Column::Cat(_) => None,
        }
    }

    pub fn as_cat(&self) -> Option<&Categorical> {
        match self {
            Column::Num(_) => None,
            Column::Cat(c) => Some(c),
        }
    }

    /// Cell at `row`.  Panics if `row` is out of bounds.
    #[inline]
    pub fn get(&self, row: usize) -> Scalar<'_> {
        match self {
            Column::Num(v) => Scalar::Num(v[row]),
            Column::Cat(c) => Scalar::Text(c.label(row)),
        }
    }

    /// Gather `rows` (in the given order) into a new column.
    pub fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Num(v) => Column::Num(rows.iter().map(|&r| v[r]).collect()),
            Column::Cat(c) => Column::Cat(c.take(rows)),
        }
    }
}
