//! Unit tests for dcm-schedule.

use dcm_agent::{AgentTable, AgentTableBuilder};
use dcm_core::{AgentId, AltId, ChunkId, Column, RunConfig};
use dcm_engine::{ChoiceResult, ChoiceRunner, EngineError, TraceCollector};
use dcm_spec::{AlternativeSet, Specification};

use crate::{ChoiceSummary, ScheduleColumns, ScheduleError, TourScheduler};

fn windows() -> AlternativeSet {
    AlternativeSet::from_windows(&[(6.0, 9.0), (7.0, 17.0), (9.0, 12.0), (12.0, 15.0)]).unwrap()
}

fn spec() -> Specification {
    let mut spec = Specification::new(["work", "school"]).unwrap();
    spec.push_named("duration > 6", &[("work", 2.0)]).unwrap();
    spec.push_named("(start < 8) * (age < 14)", &[("school", 1.5)]).unwrap();
    spec.push_named("end > 16", &[("school", -1.0)]).unwrap();
    spec
}

/// 40 tours, every fourth one a school tour.
fn tours() -> AgentTable {
    let n = 40;
    AgentTableBuilder::new((0..n as u64).map(|i| AgentId(500 + i)))
        .segments((0..n).map(|i| if i % 4 == 0 { "school" } else { "work" }))
        .column("age", Column::numeric((0..n).map(|i| (6 + i) as f64)))
        .chunk_size(8)
        .build()
        .unwrap()
}

fn config() -> RunConfig {
    RunConfig { seed: 77, chunk_size: 8, ..RunConfig::default() }
}

fn scheduler(alts: &AlternativeSet) -> TourScheduler<'_> {
    TourScheduler::new(alts, config())
        .with_model("work", spec())
        .unwrap()
        .with_model("school", spec())
        .unwrap()
}

fn num<'t>(tours: &'t AgentTable, name: &str) -> &'t [f64] {
    tours.column(name).unwrap().as_num().unwrap()
}

#[cfg(test)]
mod scheduling {
    use super::*;

    #[test]
    fn work_pass_fills_only_work_rows() {
        let alts = windows();
        let mut t = tours();
        let pass = scheduler(&alts).schedule(&mut t, "work").unwrap();

        assert_eq!(pass.model, "tdd_work");
        assert_eq!(pass.result.len(), 30);
        for row in 0..t.len() {
            let start = num(&t, "start")[row];
            if t.segment_label(row) == "work" {
                assert!(start.is_finite());
            } else {
                assert!(start.is_nan());
            }
        }
    }

    #[test]
    fn written_columns_match_chosen_window() {
        let alts = windows();
        let mut t = tours();
        let pass = scheduler(&alts).schedule(&mut t, "work").unwrap();

        for (agent, alt) in pass.result.iter() {
            let row = t.row_of(agent).unwrap();
            let w = alts.window(alt).unwrap();
            assert_eq!(num(&t, "tdd")[row], f64::from(alt.0));
            assert_eq!(num(&t, "start")[row], w.start);
            assert_eq!(num(&t, "end")[row], w.end);
            assert_eq!(num(&t, "duration")[row], num(&t, "end")[row] - num(&t, "start")[row]);
        }
    }

    #[test]
    fn second_pass_keeps_first() {
        let alts = windows();
        let s = scheduler(&alts);
        let mut t = tours();
        s.schedule(&mut t, "work").unwrap();
        let after_work = num(&t, "tdd").to_vec();
        s.schedule(&mut t, "school").unwrap();

        let tdd = num(&t, "tdd");
        assert!(tdd.iter().all(|x| x.is_finite()));
        for row in t.segment_rows("work") {
            assert_eq!(tdd[row], after_work[row]);
        }
    }

    #[test]
    fn pass_equals_direct_engine_run() {
        let alts = windows();
        let mut t = tours();
        let pass = scheduler(&alts).schedule(&mut t, "school").unwrap();

        let spec = spec();
        let direct = ChoiceRunner::new(&alts, &spec)
            .run(&tours().select("school"), &config().context("tdd_school"))
            .unwrap();
        assert_eq!(pass.result.choices(), direct.choices());
    }

    #[test]
    fn custom_column_names() {
        let alts = windows();
        let cols = ScheduleColumns {
            tdd:      "work_tdd".into(),
            start:    "work_start".into(),
            end:      "work_end".into(),
            duration: "work_duration".into(),
        };
        let mut t = tours();
        scheduler(&alts).with_columns(cols).schedule(&mut t, "work").unwrap();
        assert!(t.has_column("work_tdd"));
        assert!(!t.has_column("tdd"));
    }

    #[test]
    fn unregistered_segment_is_error() {
        let alts = windows();
        let err = scheduler(&alts).schedule(&mut tours(), "escort").unwrap_err();
        assert!(matches!(err, ScheduleError::NoModel(s) if s == "escort"));
    }

    #[test]
    fn model_without_coefficient_column_is_error() {
        let alts = windows();
        let err = TourScheduler::new(&alts, config()).with_model("escort", spec()).err().unwrap();
        assert!(matches!(err, ScheduleError::Spec(_)));
    }

    #[test]
    fn duplicate_model_is_error() {
        let alts = windows();
        let err = scheduler(&alts).with_model("work", spec()).err().unwrap();
        assert!(matches!(err, ScheduleError::DuplicateModel(_)));
    }

    #[test]
    fn categorical_result_column_is_error() {
        let alts = windows();
        let mut t = tours();
        t.set_column("start", Column::categorical(vec!["x"; 40])).unwrap();
        let err = scheduler(&alts).schedule(&mut t, "work").unwrap_err();
        assert!(matches!(err, ScheduleError::ColumnType { .. }));
    }

    #[test]
    fn unchunked_tours_split_at_configured_chunk_size() {
        let alts = windows();
        let build = || {
            AgentTableBuilder::new((0..40).map(AgentId))
                .segment("work")
                .column("age", Column::numeric((0..40).map(|i| (20 + i) as f64)))
                .build()
                .unwrap()
        };
        let cfg = RunConfig { seed: 77, chunk_size: 5, ..RunConfig::default() };
        let s = TourScheduler::new(&alts, cfg).with_model("work", spec()).unwrap();

        let mut chunked = build();
        let mut observer = TraceCollector::default();
        let pass = s.schedule_observed(&mut chunked, "work", &mut observer).unwrap();
        assert_eq!(observer.chunks, (0..8).map(ChunkId).collect::<Vec<_>>());

        let mut whole = build();
        let single = TourScheduler::new(&alts, RunConfig { seed: 77, ..RunConfig::default() })
            .with_model("work", spec())
            .unwrap()
            .schedule(&mut whole, "work")
            .unwrap();
        assert_eq!(pass.result, single.result);
    }

    #[test]
    fn chunk_larger_than_configured_size_is_error() {
        let alts = windows();
        let cfg = RunConfig { chunk_size: 4, ..RunConfig::default() };
        let s = TourScheduler::new(&alts, cfg).with_model("work", spec()).unwrap();
        let mut t = tours();
        let err = s.schedule(&mut t, "work").unwrap_err();
        assert!(matches!(err, ScheduleError::Engine(EngineError::ChunkTooLarge { limit: 4, .. })));
        assert!(!t.has_column("tdd"));
    }

    #[test]
    fn segment_with_no_tours_writes_nan_columns() {
        let alts = windows();
        let mut t = AgentTableBuilder::new((0..3).map(AgentId))
            .segment("work")
            .column("age", Column::numeric([30.0, 40.0, 50.0]))
            .build()
            .unwrap();
        let pass = scheduler(&alts).schedule(&mut t, "school").unwrap();
        assert_eq!(pass.summary.total, 0);
        assert!(num(&t, "tdd").iter().all(|x| x.is_nan()));
    }
}

#[cfg(test)]
mod summary {
    use super::*;

    #[test]
    fn counts_and_shares() {
        let alts = windows();
        let result = ChoiceResult::new(
            (0..4).map(AgentId).collect(),
            vec![AltId(1), AltId(1), AltId(3), AltId(1)],
        )
        .unwrap();
        let s = ChoiceSummary::from_choices(&result, &alts).unwrap();

        assert_eq!(s.total, 4);
        assert_eq!(s.count(AltId(1)), 3);
        assert_eq!(s.count(AltId(0)), 0);
        assert_eq!(s.shares[3].share, 0.25);
        assert!((s.shares.iter().map(|x| x.share).sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(s.mean_start(), (7.0 * 3.0 + 12.0) / 4.0);
        assert_eq!(s.mean_duration(), (10.0 * 3.0 + 3.0) / 4.0);
    }

    #[test]
    fn display_lists_chosen_alternatives() {
        let alts = windows();
        let result = ChoiceResult::new(vec![AgentId(1)], vec![AltId(2)]).unwrap();
        let text = ChoiceSummary::from_choices(&result, &alts).unwrap().to_string();
        assert!(text.contains("100.00%"));
        assert!(text.contains("total"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn unknown_alternative_is_error() {
        let alts = windows();
        let result = ChoiceResult::new(vec![AgentId(1)], vec![AltId(9)]).unwrap();
        assert!(matches!(
            ChoiceSummary::from_choices(&result, &alts),
            Err(ScheduleError::UnknownAlternative(AltId(9)))
        ));
    }
}
