use rand::rngs::SmallRng;
use rand::SeedableRng;
use treebench::config::SweepConfig;
use treebench::runner::{discover_workloads, SweepRunner};
use treebench::util::format_count;
use treebench::workload::generate_workloads;
use treebench::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SweepConfig::load()?;
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let generated = generate_workloads(&config, &mut rng)?;
    println!(
        "Generated {} workloads in {}",
        generated.len(),
        config.test_dir.display()
    );

    if config.candidates.is_empty() {
        println!("No candidates configured; nothing to benchmark.");
        return Ok(());
    }

    let workloads = discover_workloads(&config.test_dir)?;
    let runner = SweepRunner::new(config.candidates.clone());
    let report = runner.run_all(&workloads).await;

    println!();
    println!("{:<24} {:>10}  elapsed", "workload", "ops");
    for workload in report.workloads() {
        let records: Vec<_> = report
            .records
            .iter()
            .filter(|r| r.workload == workload)
            .collect();
        let ops = records.first().map(|r| r.ops).unwrap_or(0);
        let cells: Vec<String> = records
            .iter()
            .map(|r| {
                let time = match r.elapsed_ms() {
                    Some(ms) => format!("{} ms", ms),
                    None => "-".to_string(),
                };
                let marker = if r.status.is_failure() { "!" } else { "" };
                format!("{}={}{}", r.candidate, time, marker)
            })
            .collect();
        println!(
            "{:<24} {:>10}  {}",
            workload,
            format_count(ops),
            cells.join("  ")
        );
    }

    Ok(())
}
