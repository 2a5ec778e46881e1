//! Integration tests for dcm-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{ChoiceRow, ShareRow};
    use crate::writer::ChoiceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn choice_row(agent_id: u64, tdd: u32) -> ChoiceRow {
        ChoiceRow {
            agent_id,
            segment:  "work".into(),
            tdd,
            start:    7.0,
            end:      17.5,
            duration: 10.5,
        }
    }

    fn share_row(alt_id: u32) -> ShareRow {
        ShareRow { model: "tdd_work".into(), alt_id, start: 6.0, end: 9.0, count: 3, share: 0.75 }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("choices.csv").exists());
        assert!(dir.path().join("choice_shares.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("choices.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["agent_id", "segment", "tdd", "start", "end", "duration"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("choice_shares.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["model", "alt_id", "start", "end", "count", "share"]);
    }

    #[test]
    fn csv_choice_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_choices(&[choice_row(10, 0), choice_row(11, 4), choice_row(12, 2)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("choices.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "10");
        assert_eq!(&rows[0][1], "work");
        assert_eq!(&rows[1][2], "4");
        assert_eq!(&rows[2][5], "10.5");
    }

    #[test]
    fn csv_share_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_summary(&[share_row(3)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("choice_shares.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "tdd_work");
        assert_eq!(&rows[0][1], "3");
        assert_eq!(&rows[0][4], "3");
        assert_eq!(&rows[0][5], "0.75");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_choices(&[]).unwrap();
        w.write_summary(&[]).unwrap();
    }
}

// ── Row conversion ────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use dcm_agent::{AgentTable, AgentTableBuilder};
    use dcm_core::{AgentId, Column, RunConfig};
    use dcm_schedule::{ScheduleColumns, TourScheduler};
    use dcm_spec::{AlternativeSet, Specification};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{ChoiceRow, ShareRow};
    use crate::{OutputError, write_schedule};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn alternatives() -> AlternativeSet {
        AlternativeSet::from_windows(&[(6.0, 15.0), (8.0, 17.0), (10.0, 14.0)]).unwrap()
    }

    fn spec() -> Specification {
        let mut spec = Specification::new(["work", "school"]).unwrap();
        spec.push_named("duration", &[("work", 0.3), ("school", -0.2)]).unwrap();
        spec
    }

    fn tours(n: u64) -> AgentTable {
        AgentTableBuilder::new((0..n).map(AgentId))
            .segments((0..n).map(|i| if i % 3 == 0 { "school" } else { "work" }))
            .chunk_size(4)
            .build()
            .unwrap()
    }

    #[test]
    fn from_tours_skips_unscheduled() {
        let mut t = tours(3);
        t.set_column("tdd", Column::numeric([1.0, f64::NAN, 0.0])).unwrap();
        t.set_column("start", Column::numeric([8.0, f64::NAN, 6.0])).unwrap();
        t.set_column("end", Column::numeric([17.0, f64::NAN, 15.0])).unwrap();
        t.set_column("duration", Column::numeric([9.0, f64::NAN, 9.0])).unwrap();

        let rows = ChoiceRow::from_tours(&t, &ScheduleColumns::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].agent_id, 0);
        assert_eq!(rows[0].segment, "school");
        assert_eq!(rows[0].tdd, 1);
        assert_eq!(rows[1].agent_id, 2);
        assert_eq!(rows[1].start, 6.0);
    }

    #[test]
    fn from_tours_missing_column() {
        let err = ChoiceRow::from_tours(&tours(2), &ScheduleColumns::default()).unwrap_err();
        assert!(matches!(err, OutputError::MissingColumn(name) if name == "tdd"));
    }

    #[test]
    fn from_pass_lists_every_alternative() {
        let alts = alternatives();
        let mut t = tours(9);
        let pass = TourScheduler::new(&alts, RunConfig::default())
            .with_model("work", spec())
            .unwrap()
            .schedule(&mut t, "work")
            .unwrap();

        let rows = ShareRow::from_pass(&pass);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.model == "tdd_work"));
        assert_eq!(rows.iter().map(|r| r.count).sum::<u64>(), 6);
        assert_eq!(rows[2].start, 10.0);
    }

    #[test]
    fn integration_csv() {
        let alts = alternatives();
        let scheduler = TourScheduler::new(&alts, RunConfig { seed: 5, ..RunConfig::default() })
            .with_model("work", spec())
            .unwrap()
            .with_model("school", spec())
            .unwrap();

        let mut t = tours(30);
        let passes = vec![
            scheduler.schedule(&mut t, "work").unwrap(),
            scheduler.schedule(&mut t, "school").unwrap(),
        ];

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        write_schedule(&mut w, &t, scheduler.columns(), &passes).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("choices.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 30, "every tour is scheduled after both passes");

        let mut rdr2 = csv::Reader::from_path(dir.path().join("choice_shares.csv")).unwrap();
        let shares: Vec<_> = rdr2.records().map(|r| r.unwrap()).collect();
        assert_eq!(shares.len(), 6, "2 passes × 3 alternatives");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::OutputError;
    use crate::row::{ChoiceRow, ShareRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::ChoiceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_choice_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows: Vec<_> = (0..3)
            .map(|i| ChoiceRow {
                agent_id: 100 + i,
                segment:  "school".into(),
                tdd:      i as u32,
                start:    8.0,
                end:      15.0,
                duration: 7.0,
            })
            .collect();
        w.write_choices(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM choices", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
        let segment: String = conn
            .query_row("SELECT segment FROM choices WHERE agent_id = 101", [], |r| r.get(0))
            .unwrap();
        assert_eq!(segment, "school");
    }

    #[test]
    fn sqlite_rejects_agent_id_above_integer_range() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = |agent_id| ChoiceRow {
            agent_id,
            segment:  "work".into(),
            tdd:      0,
            start:    6.0,
            end:      9.0,
            duration: 3.0,
        };
        let err = w.write_choices(&[row(1), row(i64::MAX as u64 + 1)]).unwrap_err();
        assert!(matches!(err, OutputError::IdRange(id) if id == i64::MAX as u64 + 1));

        w.write_choices(&[row(i64::MAX as u64)]).unwrap();
        w.finish().unwrap();
        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let ids: Vec<i64> = conn
            .prepare("SELECT agent_id FROM choices")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(ids, [i64::MAX]);
    }

    #[test]
    fn sqlite_share_row() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_summary(&[ShareRow {
            model: "tdd_work".into(), alt_id: 7, start: 9.0, end: 18.0, count: 42, share: 0.5,
        }])
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (count, share, end): (i64, f64, f64) = conn
            .query_row(
                r#"SELECT count, share, "end" FROM choice_shares WHERE model = 'tdd_work' AND alt_id = 7"#,
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(count, 42);
        assert_eq!(share, 0.5);
        assert_eq!(end, 18.0);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::array::{Array, StringArray, UInt64Array};
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::row::ChoiceRow;
    use crate::writer::ChoiceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn row(agent_id: u64) -> ChoiceRow {
        ChoiceRow {
            agent_id,
            segment:  "work".into(),
            tdd:      2,
            start:    7.0,
            end:      16.0,
            duration: 9.0,
        }
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("choices.parquet").exists());
        assert!(dir.path().join("choice_shares.parquet").exists());
    }

    #[test]
    fn parquet_choice_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_choices(&[row(5), row(6)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("choices.parquet")).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 2);

        let ids = batches[0].column(0).as_any().downcast_ref::<UInt64Array>().unwrap();
        assert_eq!(ids.value(0), 5);
        let segments = batches[0].column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(segments.value(1), "work");
    }

    #[test]
    fn parquet_segment_column_type() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_choices(&[row(0)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("choices.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        assert_eq!(*schema.field_with_name("segment").unwrap().data_type(), DataType::Utf8);
        assert_eq!(*schema.field_with_name("tdd").unwrap().data_type(), DataType::UInt32);
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_choices(&[row(0)]).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("choices.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
