//! Sample command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use oqtopus_adapter_cloud::SamplingBackend;

use super::common::{Connection, JobArgs, load_circuit, poll_config, print_sampling, with_spinner};

/// Execute the sample command.
pub async fn execute(connection: &Connection, input: &Path, args: &JobArgs) -> Result<()> {
    println!(
        "{} Sampling {} on {} ({} shots)",
        style("→").cyan().bold(),
        style(input.display()).green(),
        style(&args.device).yellow(),
        args.shots
    );

    let circuit = load_circuit(input)?;
    println!(
        "  Loaded: {} qubits, depth {}",
        circuit.num_qubits(),
        circuit.depth()
    );

    let options = args.submit_options()?;
    let backend = SamplingBackend::new(&connection.load()?)?;
    let job = backend
        .sample(&circuit, &args.device, args.shots, &options)
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
    print_sampling(&result);

    Ok(())
}
