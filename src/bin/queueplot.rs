use std::process;

use clap::Parser;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use queueplot::{
    PlotConfig, PlotError, RunRecord,
    config::{Cli, Command},
    generate_report, summarize_runs,
};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Plot(args) => run_plot(PlotConfig::from(args)),
        Command::Summary(args) => run_summary(PlotConfig {
            data_dir: args.data_dir,
            ..PlotConfig::default()
        }),
    };
    if let Err(err) = result {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_plot(config: PlotConfig) -> Result<(), PlotError> {
    let renderer = config.format.renderer();
    let summary = generate_report(&config, renderer.as_ref())?;
    println!(
        "logs={} charts_written={} groups_skipped={}",
        summary.logs,
        summary.written.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn run_summary(config: PlotConfig) -> Result<(), PlotError> {
    for record in summarize_runs(&config)? {
        let payload = serde_json::to_string(&record_to_value(&record))
            .map_err(|e| PlotError::render(e.to_string()))?;
        println!("{payload}");
    }
    Ok(())
}

fn record_to_value(record: &RunRecord) -> Value {
    let mut object = Map::new();
    object.insert("file".into(), Value::String(record.file_name.clone()));
    object.insert("program".into(), json!(record.identity.program));
    object.insert("pattern".into(), json!(record.identity.pattern));
    object.insert("threads".into(), json!(record.identity.threads));
    object.insert("duration".into(), json!(record.identity.duration));
    object.insert("batch".into(), json!(record.identity.batch));
    object.insert("repetitions".into(), json!(record.repetitions));
    // per-thread batch sizes; null for random ranges or mismatched lists
    let slots = record.threads() as usize;
    object.insert("enq_batches".into(), json!(record.enqueues.broadcast(slots).ok()));
    object.insert("deq_batches".into(), json!(record.dequeues.broadcast(slots).ok()));
    object.insert("avg_duration_secs".into(), json!(record.duration_secs));
    object.insert("enq_succ".into(), json!(record.enq_succ));
    object.insert("enq_fail".into(), json!(record.enq_fail));
    object.insert("deq_succ".into(), json!(record.deq_succ));
    object.insert("deq_fail".into(), json!(record.deq_fail));
    object.insert("freelist_insert".into(), json!(record.freelist_insert));
    object.insert("freelist_max".into(), json!(record.freelist_max));
    object.insert("throughput".into(), json!(record.throughput()));
    object.insert("throughput_all".into(), json!(record.throughput_all()));
    object.insert(
        "cas_success_rate".into(),
        record.cas_success_rate().map(|rate| json!(rate)).unwrap_or(Value::Null),
    );
    Value::Object(object)
}
