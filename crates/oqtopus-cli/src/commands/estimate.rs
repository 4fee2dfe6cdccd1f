//! Estimate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use oqtopus_adapter_cloud::EstimationBackend;

use super::common::{
    Connection, JobArgs, load_circuit, parse_operator, poll_config, print_estimation,
    with_spinner,
};

/// Execute the estimate command.
pub async fn execute(
    connection: &Connection,
    input: &Path,
    terms: &[String],
    args: &JobArgs,
) -> Result<()> {
    let operator = parse_operator(terms)?;
    println!(
        "{} Estimating {} term(s) on {} with {} ({} shots)",
        style("→").cyan().bold(),
        operator.len(),
        style(input.display()).green(),
        style(&args.device).yellow(),
        args.shots
    );

    let circuit = load_circuit(input)?;
    let options = args.submit_options()?;
    let backend = EstimationBackend::new(&connection.load()?)?;
    let job = backend
        .estimate(&circuit, &operator, &args.device, args.shots, &options)
        .await?;

    println!(
        "{} Submitted job {}",
        style("✓").green().bold(),
        style(job.id()).cyan()
    );

    if !args.wait {
        println!("  Use 'oqtopus result {}' to fetch the result.", job.id());
        return Ok(());
    }

    let poll = poll_config(args.timeout);
    let result = with_spinner(
        format!("Waiting for job {}...", job.id()),
        job.result_with(&poll),
    )
    .await??;
    print_estimation(&result);

    Ok(())
}
