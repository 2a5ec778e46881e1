//! Validated construction of an [`AgentTable`].
//!
//! # Usage
//!
//! ```rust
//! use dcm_agent::AgentTableBuilder;
//! use dcm_core::{AgentId, ChunkId, Column};
//!
//! let tours = AgentTableBuilder::new((0..5).map(AgentId))
//!     .segments(["work", "school", "work", "work", "school"])
//!     .column("age", Column::numeric([34.0, 9.0, 51.0, 28.0, 12.0]))
//!     .chunk_size(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tours.chunk_ids()[4], ChunkId(2));
//! assert_eq!(tours.select("work").len(), 3);
//! ```
//!
//! Chunk ids are computed here, from the row number, with
//! [`chunk_of`](dcm_core::chunk_of).  A table that must share chunking with
//! another (tours inheriting their household's chunk) passes explicit ids
//! with [`chunk_ids`](AgentTableBuilder::chunk_ids) instead.

use dcm_core::{AgentId, ChunkId, Column, CoreResult, SegmentId, chunk_of};
use rustc_hash::FxHashMap;

use crate::{AgentError, AgentResult, AgentTable};

enum Chunking {
    Size(usize),
    Explicit(Vec<ChunkId>),
}

enum Segments {
    Unset,
    Uniform(String),
    PerRow(Vec<String>),
}

/// Builder for [`AgentTable`].
pub struct AgentTableBuilder {
    ids:      Vec<AgentId>,
    segments: Segments,
    chunking: Chunking,
    columns:  Vec<(String, Column)>,
}

impl AgentTableBuilder {
    /// Start a table with one row per id, in the given order.
    ///
    /// Defaults to `chunk_size(0)`: a single chunk.
    pub fn new(ids: impl IntoIterator<Item = AgentId>) -> Self {
        Self {
            ids:      ids.into_iter().collect(),
            segments: Segments::Unset,
            chunking: Chunking::Size(0),
            columns:  Vec::new(),
        }
    }

    /// One segment label per row.
    pub fn segments<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = Segments::PerRow(labels.into_iter().map(Into::into).collect());
        self
    }

    /// The same segment label for every row.
    pub fn segment(mut self, label: impl Into<String>) -> Self {
        self.segments = Segments::Uniform(label.into());
        self
    }

    /// Assign `chunk_of(row, size)` to each row.  `0` puts all rows in one
    /// chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunking = Chunking::Size(size);
        self
    }

    /// Use caller-supplied chunk ids, one per row.
    pub fn chunk_ids(mut self, ids: Vec<ChunkId>) -> Self {
        self.chunking = Chunking::Explicit(ids);
        self
    }

    /// Add a named attribute column.
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    pub fn build(self) -> AgentResult<AgentTable> {
        let n = self.ids.len();

        for (i, (name, _)) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|(other, _)| other == name) {
                return Err(AgentError::DuplicateColumn(name.clone()));
            }
        }

        let (segments, segment_labels) = match self.segments {
            Segments::Unset => return Err(AgentError::MissingSegments),
            Segments::Uniform(label) => (vec![SegmentId(0); n], vec![label]),
            Segments::PerRow(labels) => intern(&labels)?,
        };

        let chunk_ids = match self.chunking {
            Chunking::Size(size) => (0..n)
                .map(|row| chunk_of(row, size))
                .collect::<CoreResult<Vec<_>>>()?,
            Chunking::Explicit(ids) => ids,
        };

        AgentTable::from_parts(self.ids, segments, segment_labels, chunk_ids, self.columns)
    }
}

/// Intern labels into `SegmentId`s in first-seen order.
fn intern(labels: &[String]) -> AgentResult<(Vec<SegmentId>, Vec<String>)> {
    let mut lookup: FxHashMap<&str, SegmentId> = FxHashMap::default();
    let mut distinct: Vec<String> = Vec::new();
    let mut ids = Vec::with_capacity(labels.len());
    for label in labels {
        let id = match lookup.get(label.as_str()) {
            Some(&id) => id,
            None => {
                let id = u16::try_from(distinct.len())
                    .ok()
                    .filter(|&i| i != u16::MAX)
                    .map(SegmentId)
                    .ok_or(AgentError::TooManySegments(distinct.len() + 1))?;
                distinct.push(label.clone());
                lookup.insert(label.as_str(), id);
                id
            }
        };
        ids.push(id);
    }
    Ok((ids, distinct))
}
