//! Seeded generator of harness logs, used by the benches and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    aggregate::SUMMARY_MARKER,
    filename::{RunIdentity, SEQUENTIAL_PROGRAM},
};

pub const LOG_PREFIX: &str = "log";

/// Builds the file name the harness uses for `identity`.
pub fn log_file_name(identity: &RunIdentity) -> String {
    if identity.is_baseline() {
        format!(
            "{LOG_PREFIX}_{}_d{}_b{}.txt",
            identity.program, identity.duration, identity.batch
        )
    } else {
        format!(
            "{LOG_PREFIX}_{}_t{}_d{}_b{}_{}.txt",
            identity.program, identity.threads, identity.duration, identity.batch, identity.pattern
        )
    }
}

pub fn baseline_identity(duration: u32, batch: u32) -> RunIdentity {
    RunIdentity {
        program: SEQUENTIAL_PROGRAM.to_string(),
        threads: 1,
        duration,
        batch,
        pattern: String::new(),
    }
}

pub fn concurrent_identity(
    program: &str,
    threads: u32,
    duration: u32,
    batch: u32,
    pattern: &str,
) -> RunIdentity {
    RunIdentity {
        program: program.to_string(),
        threads,
        duration,
        batch,
        pattern: pattern.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct SyntheticLog {
    pub file_name: String,
    pub content: String,
}

/// Generates a well-formed log for `identity` with `repetitions` summary
/// blocks. Each repetition is preceded by per-thread blocks, as the harness
/// prints them.
pub fn synthetic_log(identity: &RunIdentity, repetitions: u32, seed: u64) -> SyntheticLog {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut content = format!(
        "INFO: Threads:     {}\nINFO: Duration:    {}\nINFO: Repetitions: {repetitions}\n\
         INFO: Enque batch: {}\nINFO: Deque batch: {}\n\n",
        identity.threads, identity.duration, identity.batch, identity.batch
    );
    let seconds = f64::from(identity.duration);
    for _ in 0..repetitions {
        let mut total = [0u64; 8];
        for thread in 0..identity.threads {
            let counters = thread_counters(&mut rng, identity.duration);
            content.push_str(&format!("Thread: {thread} "));
            content.push_str(&stats_block(seconds, &counters));
            for (idx, (sum, value)) in total.iter_mut().zip(counters).enumerate() {
                *sum = if idx == FREELIST_MAX { (*sum).max(value) } else { *sum + value };
            }
        }
        let jitter: f64 = rng.gen_range(0.0..0.01);
        content.push_str(&format!("\n{SUMMARY_MARKER}"));
        content.push_str(&stats_block(seconds + jitter, &total)["STATS:".len()..]);
        content.push_str("\n\n");
    }
    SyntheticLog {
        file_name: log_file_name(identity),
        content,
    }
}

/// Slot of `freelist_max` in the counter arrays; it combines by max.
const FREELIST_MAX: usize = 5;

fn thread_counters(rng: &mut StdRng, duration: u32) -> [u64; 8] {
    let scale = u64::from(duration.max(1));
    let enq_succ = rng.gen_range(10_000..20_000) * scale;
    let deq_succ = enq_succ - rng.gen_range(0..1_000);
    [
        enq_succ,
        rng.gen_range(0..100),
        deq_succ,
        rng.gen_range(0..2_000),
        rng.gen_range(0..500),
        rng.gen_range(1..64),
        enq_succ + deq_succ,
        rng.gen_range(0..5_000) * scale,
    ]
}

fn stats_block(duration: f64, counters: &[u64; 8]) -> String {
    format!(
        "STATS:\n duration: {duration:.6} sec\n enq_succ: {}\n enq_fail: {}\n deq_succ: {}\n \
         deq_fail: {}\n freelist_insert: {}\n freelist_max: {}\n cas_succ: {}\n cas_fail: {}\n",
        counters[0],
        counters[1],
        counters[2],
        counters[3],
        counters[4],
        counters[5],
        counters[6],
        counters[7]
    )
}

/// Logs for one (duration, batch) combination: a baseline plus every
/// program × pattern × thread count.
pub fn synthetic_dataset(
    programs: &[&str],
    patterns: &[&str],
    threads: &[u32],
    duration: u32,
    batch: u32,
    repetitions: u32,
    seed: u64,
) -> Vec<SyntheticLog> {
    let mut logs = vec![synthetic_log(
        &baseline_identity(duration, batch),
        repetitions,
        seed,
    )];
    let mut run_seed = seed;
    for program in programs {
        for pattern in patterns {
            for &count in threads {
                run_seed = run_seed.wrapping_add(1);
                let identity = concurrent_identity(program, count, duration, batch, pattern);
                logs.push(synthetic_log(&identity, repetitions, run_seed));
            }
        }
    }
    logs
}
