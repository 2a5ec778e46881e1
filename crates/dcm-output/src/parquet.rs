//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `choices.parquet`
//! - `choice_shares.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::ChoiceWriter;
use crate::{ChoiceRow, OutputResult, ShareRow};

fn choice_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id", DataType::UInt64,  false),
        Field::new("segment",  DataType::Utf8,    false),
        Field::new("tdd",      DataType::UInt32,  false),
        Field::new("start",    DataType::Float64, false),
        Field::new("end",      DataType::Float64, false),
        Field::new("duration", DataType::Float64, false),
    ]))
}

fn share_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("model",  DataType::Utf8,    false),
        Field::new("alt_id", DataType::UInt32,  false),
        Field::new("start",  DataType::Float64, false),
        Field::new("end",    DataType::Float64, false),
        Field::new("count",  DataType::UInt64,  false),
        Field::new("share",  DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes scheduled choices to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    choices:       Option<ArrowWriter<File>>,
    shares:        Option<ArrowWriter<File>>,
    choice_schema: Arc<Schema>,
    share_schema:  Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let choice_schema = choice_schema();
        let share_schema = share_schema();

        let choices = ArrowWriter::try_new(
            File::create(dir.join("choices.parquet"))?,
            Arc::clone(&choice_schema),
            Some(snappy_props()),
        )?;
        let shares = ArrowWriter::try_new(
            File::create(dir.join("choice_shares.parquet"))?,
            Arc::clone(&share_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            choices: Some(choices),
            shares: Some(shares),
            choice_schema,
            share_schema,
        })
    }
}

impl ChoiceWriter for ParquetWriter {
    fn write_choices(&mut self, rows: &[ChoiceRow]) -> OutputResult<()> {
        let Some(writer) = self.choices.as_mut() else { return Ok(()) };
        if rows.is_empty() {
            return Ok(());
        }

        let mut agent_id = UInt64Builder::with_capacity(rows.len());
        let mut segment = StringBuilder::new();
        let mut tdd = UInt32Builder::with_capacity(rows.len());
        let mut start = Float64Builder::with_capacity(rows.len());
        let mut end = Float64Builder::with_capacity(rows.len());
        let mut duration = Float64Builder::with_capacity(rows.len());

        for row in rows {
            agent_id.append_value(row.agent_id);
            segment.append_value(&row.segment);
            tdd.append_value(row.tdd);
            start.append_value(row.start);
            end.append_value(row.end);
            duration.append_value(row.duration);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.choice_schema),
            vec![
                Arc::new(agent_id.finish()),
                Arc::new(segment.finish()),
                Arc::new(tdd.finish()),
                Arc::new(start.finish()),
                Arc::new(end.finish()),
                Arc::new(duration.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_summary(&mut self, rows: &[ShareRow]) -> OutputResult<()> {
        let Some(writer) = self.shares.as_mut() else { return Ok(()) };
        if rows.is_empty() {
            return Ok(());
        }

        let mut model = StringBuilder::new();
        let mut alt_id = UInt32Builder::with_capacity(rows.len());
        let mut start = Float64Builder::with_capacity(rows.len());
        let mut end = Float64Builder::with_capacity(rows.len());
        let mut count = UInt64Builder::with_capacity(rows.len());
        let mut share = Float64Builder::with_capacity(rows.len());

        for row in rows {
            model.append_value(&row.model);
            alt_id.append_value(row.alt_id);
            start.append_value(row.start);
            end.append_value(row.end);
            count.append_value(row.count);
            share.append_value(row.share);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.share_schema),
            vec![
                Arc::new(model.finish()),
                Arc::new(alt_id.finish()),
                Arc::new(start.finish()),
                Arc::new(end.finish()),
                Arc::new(count.finish()),
                Arc::new(share.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.choices.take() {
            w.close()?;
        }
        if let Some(w) = self.shares.take() {
            w.close()?;
        }
        Ok(())
    }
}
