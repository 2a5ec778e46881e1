//! Unit tests for dcm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, AltId, ChunkId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = AltId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AltId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u64::MAX);
        assert_eq!(AltId::INVALID.0, u32::MAX);
        assert_eq!(SegmentId::INVALID.0, u16::MAX);
        assert_eq!(ChunkId::default(), ChunkId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(AltId(3).to_string(), "AltId(3)");
    }

    #[test]
    fn segment_overflow_rejected() {
        assert!(SegmentId::try_from(70_000usize).is_err());
    }
}

#[cfg(test)]
mod chunk {
    use crate::{ChunkId, CoreError, chunk_of};

    #[test]
    fn zero_size_is_one_chunk() {
        assert_eq!(chunk_of(0, 0).unwrap(), ChunkId(0));
        assert_eq!(chunk_of(9_999_999, 0).unwrap(), ChunkId(0));
    }

    #[test]
    fn floor_division() {
        assert_eq!(chunk_of(0, 500).unwrap(), ChunkId(0));
        assert_eq!(chunk_of(499, 500).unwrap(), ChunkId(0));
        assert_eq!(chunk_of(500, 500).unwrap(), ChunkId(1));
        assert_eq!(chunk_of(1_234, 7).unwrap(), ChunkId(176));
    }

    #[test]
    fn size_one_gives_one_row_per_chunk() {
        for row in 0..10 {
            assert_eq!(chunk_of(row, 1).unwrap(), ChunkId(row as u32));
        }
    }

    #[test]
    fn chunk_index_past_id_range_is_error() {
        // Lands on the INVALID sentinel on 32-bit targets, past u32 on 64-bit.
        assert!(matches!(
            chunk_of(usize::MAX, 1),
            Err(CoreError::ChunkOverflow { row: usize::MAX, chunk_size: 1 })
        ));
        assert_eq!(chunk_of(usize::MAX, usize::MAX).unwrap(), ChunkId(1));
    }
}

#[cfg(test)]
mod column {
    use crate::{Categorical, Column, Scalar};

    #[test]
    fn categorical_interns_first_seen_order() {
        let c = Categorical::from_labels(["work", "school", "work", "univ"]);
        assert_eq!(c.levels(), ["work", "school", "univ"]);
        assert_eq!(c.codes(), [0, 1, 0, 2]);
        assert_eq!(c.code_of("school"), Some(1));
        assert_eq!(c.code_of("escort"), None);
        assert_eq!(c.label(3), "univ");
    }

    #[test]
    fn from_codes_rejects_out_of_range() {
        assert!(Categorical::from_codes(vec![0, 2], vec!["a".into(), "b".into()]).is_none());
        assert!(Categorical::from_codes(vec![0, 1], vec!["a".into(), "b".into()]).is_some());
    }

    #[test]
    fn take_preserves_order_and_levels() {
        let col = Column::categorical(["a", "b", "c"]);
        let taken = col.take(&[2, 0]);
        assert_eq!(taken.get(0), Scalar::Text("c"));
        assert_eq!(taken.get(1), Scalar::Text("a"));
        assert_eq!(taken.as_cat().unwrap().levels().len(), 3);
    }

    #[test]
    fn numeric_from_ints() {
        let col = Column::numeric([1u32, 2, 3]);
        assert_eq!(col.as_num(), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(col.kind(), "numeric");
        assert_eq!(col.take(&[1]).get(0), Scalar::Num(2.0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, ChoiceRng, RunConfig};

    #[test]
    fn deterministic_same_inputs() {
        let rng = ChoiceRng::new(12345);
        for i in 0..100 {
            let a = rng.draw(AgentId(i), "work_scheduling", "choice");
            let b = rng.draw(AgentId(i), "work_scheduling", "choice");
            assert_eq!(a, b);
        }
    }

    #[test]
    fn draws_in_unit_interval() {
        let stream = ChoiceRng::new(0).stream("m", "c");
        for i in 0..10_000 {
            let v = stream.draw(AgentId(i));
            assert!((0.0..1.0).contains(&v), "draw {v} out of range");
        }
    }

    #[test]
    fn different_agents_differ() {
        let rng = ChoiceRng::new(1);
        let a = rng.draw(AgentId(0), "m", "c");
        let b = rng.draw(AgentId(1), "m", "c");
        assert_ne!(a, b, "draws for adjacent agents should diverge");
    }

    #[test]
    fn models_and_channels_are_independent() {
        let rng = ChoiceRng::new(7);
        let work = rng.draw(AgentId(5), "work_scheduling", "choice");
        let school = rng.draw(AgentId(5), "school_scheduling", "choice");
        let other = rng.draw(AgentId(5), "work_scheduling", "other");
        assert_ne!(work, school);
        assert_ne!(work, other);
    }

    #[test]
    fn seed_changes_draws() {
        let a = ChoiceRng::new(1).draw(AgentId(9), "m", "c");
        let b = ChoiceRng::new(2).draw(AgentId(9), "m", "c");
        assert_ne!(a, b);
    }

    #[test]
    fn draws_ignore_order_of_request() {
        let stream = ChoiceRng::new(99).stream("m", "c");
        let forward = stream.draws(&[AgentId(1), AgentId(2), AgentId(3)]);
        let reverse = stream.draws(&[AgentId(3), AgentId(2), AgentId(1)]);
        assert_eq!(forward[0], reverse[2]);
        assert_eq!(forward[1], reverse[1]);
        assert_eq!(forward[2], reverse[0]);
    }

    #[test]
    fn context_stream_matches_direct_draw() {
        let config = RunConfig { seed: 42, ..RunConfig::default() };
        let ctx = config.context("work_scheduling");
        assert_eq!(
            ctx.stream().draw(AgentId(11)),
            ChoiceRng::new(42).draw(AgentId(11), "work_scheduling", "choice"),
        );
    }

    #[test]
    fn name_hash_is_fixed_width_fnv1a() {
        use crate::rng::{fnv1a, mix64};

        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(mix64(0), 0);
        assert_ne!(mix64(1), 1);
    }

    #[test]
    fn model_and_channel_are_not_interchangeable() {
        let rng = ChoiceRng::new(3);
        assert_ne!(rng.stream("tdd_work", "choice"), rng.stream("choice", "tdd_work"));
        assert_ne!(
            rng.draw(AgentId(5), "tdd_work", "choice"),
            rng.draw(AgentId(5), "choice", "tdd_work"),
        );
    }
}

#[cfg(test)]
mod config {
    use crate::{AgentId, RunConfig};

    #[test]
    fn default_disables_chunking() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.chunk_size, 0);
        assert!(cfg.trace_agent.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_threads_rejected() {
        let cfg = RunConfig { num_threads: Some(0), ..RunConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn context_carries_trace_and_channel() {
        let cfg = RunConfig { trace_agent: Some(AgentId(3)), ..RunConfig::default() };
        let ctx = cfg.context("school_scheduling").with_channel("tdd");
        assert_eq!(ctx.model, "school_scheduling");
        assert_eq!(ctx.channel, "tdd");
        assert!(ctx.is_traced(AgentId(3)));
        assert!(!ctx.is_traced(AgentId(4)));
    }
}
