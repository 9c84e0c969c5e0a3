use queueplot::{
    OpCounts, PlotError, aggregate_log,
    aggregate::{parse_op_counts, parse_summary_block},
};

const NAME: &str = "log_cas_t4_d60_b1_mixed.txt";

struct Block {
    duration: f64,
    enq: (u64, u64),
    deq: (u64, u64),
    freelist: (u64, u64),
    cas: (u64, u64),
}

fn block(duration: f64, enq_succ: u64, freelist_max: u64) -> Block {
    Block {
        duration,
        enq: (enq_succ, 2),
        deq: (enq_succ - 10, 4),
        freelist: (6, freelist_max),
        cas: (enq_succ * 2, 8),
    }
}

fn log(threads: u32, duration: u32, repetitions: u32, blocks: &[Block]) -> String {
    let mut out = format!(
        "INFO: Threads:     {threads}\nINFO: Duration:    {duration}\nINFO: Repetitions: {repetitions}\n\
         INFO: Enque batches: [1 2 3 4 ]\nINFO: Deque batch: 2\n\n"
    );
    for b in blocks {
        out.push_str("Thread: 0 STATS:\n duration: 99.0 sec\n enq_succ: 1\n\n");
        out.push_str(&format!(
            "Summary STATS:\n duration: {:.6} sec\n enq_succ: {}\n enq_fail: {}\n deq_succ: {}\n deq_fail: {}\n \
             freelist_insert: {}\n freelist_max: {}\n cas_succ: {}\n cas_fail: {}\n\n\n",
            b.duration, b.enq.0, b.enq.1, b.deq.0, b.deq.1, b.freelist.0, b.freelist.1, b.cas.0, b.cas.1
        ));
    }
    out
}

#[test]
fn test_aggregate_averages_repetitions() {
    let content = log(4, 60, 2, &[block(60.0, 100, 3), block(62.0, 300, 9)]);
    let record = aggregate_log(NAME, &content).unwrap();
    assert_eq!(record.repetitions, 2);
    assert_eq!(record.duration_secs, 61.0);
    assert_eq!(record.enq_succ, 200.0);
    assert_eq!(record.enq_fail, 2.0);
    assert_eq!(record.deq_succ, 190.0);
    assert_eq!(record.deq_fail, 4.0);
    assert_eq!(record.freelist_insert, 6.0);
    assert_eq!(record.cas_succ, 400.0);
    assert_eq!(record.cas_fail, 8.0);
    assert_eq!(record.identity.threads, 4);
    assert_eq!(record.identity.pattern, "mixed");
}

#[test]
fn test_freelist_max_is_maximum_not_mean() {
    let content = log(4, 60, 3, &[block(60.0, 100, 3), block(60.0, 100, 17), block(60.0, 100, 5)]);
    let record = aggregate_log(NAME, &content).unwrap();
    assert_eq!(record.freelist_max, 17);
}

#[test]
fn test_raw_counts_resolved_once() {
    let content = log(4, 60, 1, &[block(60.0, 100, 3)]);
    let record = aggregate_log(NAME, &content).unwrap();
    assert_eq!(record.enqueues, OpCounts::Sequence(vec![1, 2, 3, 4]));
    assert_eq!(record.dequeues, OpCounts::Scalar(2));
}

#[test]
fn test_aggregation_is_idempotent() {
    let content = log(4, 60, 2, &[block(60.123456, 101, 3), block(59.5, 333, 9)]);
    let first = aggregate_log(NAME, &content).unwrap();
    let second = aggregate_log(NAME, &content).unwrap();
    assert_eq!(first.duration_secs.to_bits(), second.duration_secs.to_bits());
    assert_eq!(first.enq_succ.to_bits(), second.enq_succ.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_missing_summary_block_fails() {
    let content = log(4, 60, 3, &[block(60.0, 100, 3), block(60.0, 100, 3)]);
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert_eq!(
        err,
        PlotError::RepetitionMismatch {
            file: NAME.into(),
            declared: 3,
            found: 2
        }
    );
}

#[test]
fn test_duration_mismatch_fails() {
    let content = log(4, 30, 1, &[block(30.0, 100, 3)]);
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert!(matches!(
        err,
        PlotError::DurationMismatch {
            filename: 60,
            declared: 30,
            ..
        }
    ));
    assert!(err.to_string().contains("(60)"));
    assert!(err.to_string().contains("(30)"));
}

#[test]
fn test_threads_mismatch_fails() {
    let content = log(8, 60, 1, &[block(60.0, 100, 3)]);
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert!(matches!(
        err,
        PlotError::ThreadsMismatch {
            filename: 4,
            declared: 8,
            ..
        }
    ));
}

#[test]
fn test_zero_repetitions_fails() {
    let content = log(4, 60, 0, &[]);
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert_eq!(err, PlotError::ZeroRepetitions(NAME.into()));
}

#[test]
fn test_malformed_token_fails() {
    let content = log(4, 60, 1, &[block(60.0, 100, 3)]).replace("enq_fail: 2", "enq_fail: two");
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert!(matches!(err, PlotError::Parse(ref msg) if msg.contains("two")));
}

#[test]
fn test_malformed_header_names_the_file() {
    let content =
        log(4, 60, 1, &[block(60.0, 100, 3)]).replace("Repetitions: 1", "Repetitions: one");
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert!(
        matches!(err, PlotError::Parse(ref msg) if msg.contains(NAME) && msg.contains("one"))
    );

    let content =
        log(4, 60, 1, &[block(60.0, 100, 3)]).replace("Deque batch: 2", "Deque batch: x");
    let err = aggregate_log(NAME, &content).unwrap_err();
    assert!(matches!(err, PlotError::Parse(ref msg) if msg.starts_with(NAME)));
}

#[test]
fn test_truncated_block_fails() {
    let content = "INFO: Threads:     4\nINFO: Duration:    60\nINFO: Repetitions: 1\n\
                   INFO: Enque batch: 1\nINFO: Deque batch: 1\n\nSummary STATS:\n duration: 60.0 sec\n enq_succ: 5\n";
    let err = aggregate_log(NAME, content).unwrap_err();
    assert!(matches!(err, PlotError::TruncatedLog(_)));
}

#[test]
fn test_short_header_fails() {
    let err = aggregate_log(NAME, "INFO: Threads: 4\n").unwrap_err();
    assert!(matches!(err, PlotError::TruncatedLog(_)));
}

#[test]
fn test_baseline_log_aggregates() {
    let content = log(1, 60, 1, &[block(60.0, 600, 1)]);
    let record = aggregate_log("log_seq_d60_b1.txt", &content).unwrap();
    assert!(record.is_baseline());
    assert_eq!(record.throughput(), (600.0 + 590.0) / 60.0);
}

#[test]
fn test_parse_op_counts_variants() {
    assert_eq!(
        parse_op_counts("INFO: Enque batch: 16").unwrap(),
        OpCounts::Scalar(16)
    );
    assert_eq!(
        parse_op_counts("INFO: Deque batches: [4 8 ]").unwrap(),
        OpCounts::Sequence(vec![4, 8])
    );
    assert_eq!(
        parse_op_counts("INFO: Enque batch: (1, 8)").unwrap(),
        OpCounts::Range { min: 1, max: 8 }
    );
    assert!(parse_op_counts("INFO: Enque batch: many").is_err());
}

#[test]
fn test_summary_block_field_order_enforced() {
    let lines = [
        " duration: 1.0 sec",
        " enq_fail: 1",
        " enq_succ: 1",
        " deq_succ: 1",
        " deq_fail: 1",
        " freelist_insert: 1",
        " freelist_max: 1",
        " cas_succ: 1",
        " cas_fail: 1",
    ];
    let err = parse_summary_block(&lines).unwrap_err();
    assert!(matches!(err, PlotError::UnexpectedField { ref expected, .. } if expected == "enq_succ"));
}
