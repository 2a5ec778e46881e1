//! Unit tests for dcm-agent.

use dcm_core::{AgentId, ChunkId, Column, Scalar, SegmentId};

use crate::{AgentError, AgentTable, AgentTableBuilder};

/// Six tours: ids 100..106, alternating work/school, chunk size 4.
fn tours() -> AgentTable {
    AgentTableBuilder::new((100..106).map(AgentId))
        .segments(["work", "school", "work", "school", "work", "school"])
        .column("age", Column::numeric([30.0, 8.0, 45.0, 12.0, 61.0, 15.0]))
        .column("ptype", Column::categorical(["ft", "child", "pt", "child", "ft", "child"]))
        .chunk_size(4)
        .build()
        .unwrap()
}

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn assigns_chunks_from_row_number() {
        let t = tours();
        let expected: Vec<ChunkId> = [0, 0, 0, 0, 1, 1].into_iter().map(ChunkId).collect();
        assert_eq!(t.chunk_ids(), expected.as_slice());
    }

    #[test]
    fn zero_chunk_size_is_one_chunk() {
        let t = AgentTableBuilder::new((0..50).map(AgentId)).segment("work").build().unwrap();
        assert!(t.chunk_ids().iter().all(|&c| c == ChunkId(0)));
        assert_eq!(t.chunk_rows().len(), 1);
    }

    #[test]
    fn explicit_chunk_ids_are_kept() {
        let t = AgentTableBuilder::new([AgentId(7), AgentId(3)])
            .segment("work")
            .chunk_ids(vec![ChunkId(5), ChunkId(2)])
            .build()
            .unwrap();
        assert_eq!(t.chunk_id(0), ChunkId(5));
        assert_eq!(t.chunk_id(1), ChunkId(2));
    }

    #[test]
    fn segments_interned_in_first_seen_order() {
        let t = tours();
        assert_eq!(t.segment_labels(), ["work", "school"]);
        assert_eq!(t.segment_id(3), SegmentId(1));
        assert_eq!(t.segment_label(4), "work");
        assert_eq!(t.segment_id_of("escort"), None);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = AgentTableBuilder::new([AgentId(1), AgentId(2), AgentId(1)])
            .segment("work")
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::DuplicateAgent(AgentId(1))));
    }

    #[test]
    fn missing_segments_rejected() {
        let err = AgentTableBuilder::new([AgentId(1)]).build().unwrap_err();
        assert!(matches!(err, AgentError::MissingSegments));
    }

    #[test]
    fn short_column_rejected() {
        let err = AgentTableBuilder::new([AgentId(1), AgentId(2)])
            .segment("work")
            .column("age", Column::numeric([1.0]))
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::Core(_)));
    }

    #[test]
    fn wrong_segment_count_rejected() {
        let err = AgentTableBuilder::new([AgentId(1), AgentId(2)])
            .segments(["work"])
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::Length { expected: 2, got: 1, .. }));
    }

    #[test]
    fn duplicate_column_rejected() {
        let err = AgentTableBuilder::new([AgentId(1)])
            .segment("work")
            .column("age", Column::numeric([1.0]))
            .column("age", Column::numeric([2.0]))
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::DuplicateColumn(name) if name == "age"));
    }
}

#[cfg(test)]
mod table {
    use super::*;

    #[test]
    fn row_lookup_by_id() {
        let t = tours();
        assert_eq!(t.row_of(AgentId(103)), Some(3));
        assert_eq!(t.row_of(AgentId(7)), None);
        assert_eq!(t.id(5), AgentId(105));
    }

    #[test]
    fn chunk_rows_grouped_ascending() {
        let groups = tours().chunk_rows();
        let keys: Vec<ChunkId> = groups.keys().copied().collect();
        assert_eq!(keys, [ChunkId(0), ChunkId(1)]);
        assert_eq!(groups[&ChunkId(0)], [0, 1, 2, 3]);
        assert_eq!(groups[&ChunkId(1)], [4, 5]);
    }

    #[test]
    fn rechunk_reassigns_from_row_number() {
        let mut work = tours().select("work");
        assert_eq!(work.chunk_count(), 2);
        work.rechunk(1).unwrap();
        assert_eq!(work.chunk_ids(), [ChunkId(0), ChunkId(1), ChunkId(2)]);
        work.rechunk(0).unwrap();
        assert_eq!(work.chunk_count(), 1);
    }

    #[test]
    fn select_keeps_ids_and_chunks() {
        let work = tours().select("work");
        assert_eq!(work.ids(), [AgentId(100), AgentId(102), AgentId(104)]);
        assert_eq!(work.chunk_ids(), [ChunkId(0), ChunkId(0), ChunkId(1)]);
        assert_eq!(work.column("age").unwrap().as_num().unwrap(), [30.0, 45.0, 61.0]);
        assert_eq!(work.row_of(AgentId(104)), Some(2));
        // Label list is shared with the parent table.
        assert_eq!(work.segment_labels(), ["work", "school"]);
    }

    #[test]
    fn select_unknown_segment_is_empty() {
        assert!(tours().select("escort").is_empty());
    }

    #[test]
    fn take_reorders_rows() {
        let t = tours().take(&[5, 0]).unwrap();
        assert_eq!(t.ids(), [AgentId(105), AgentId(100)]);
        assert_eq!(t.column("ptype").unwrap().get(0), Scalar::Text("child"));
        assert_eq!(t.segment_label(1), "work");
    }

    #[test]
    fn take_rejects_repeats_and_out_of_range() {
        let t = tours();
        assert!(matches!(t.take(&[1, 1]), Err(AgentError::DuplicateAgent(AgentId(101)))));
        assert!(matches!(t.take(&[6]), Err(AgentError::RowOutOfRange { row: 6, len: 6 })));
    }

    #[test]
    fn set_column_adds_and_replaces() {
        let mut t = tours();
        t.set_column("start", Column::numeric([f64::NAN; 6])).unwrap();
        assert!(t.has_column("start"));
        t.set_column("start", Column::numeric([7.0; 6])).unwrap();
        assert_eq!(t.column("start").unwrap().as_num().unwrap()[0], 7.0);
        assert_eq!(t.column_names().filter(|&n| n == "start").count(), 1);
        assert!(t.set_column("end", Column::numeric([1.0])).is_err());
        assert!(t.remove_column("start").is_some());
        assert!(!t.has_column("start"));
    }
}
