//! Result command implementation.
//!
//! Retrieve any job by id and wait for its result.

use anyhow::Result;
use console::style;

use oqtopus_adapter_cloud::{RetrievedJob, SamplingBackend};

use super::common::{Connection, poll_config, print_estimation, print_sampling, with_spinner};

/// Execute the result command.
pub async fn execute(connection: &Connection, job_id: &str, timeout: Option<u64>) -> Result<()> {
    println!(
        "{} Fetching job {}",
        style("→").cyan().bold(),
        style(job_id).dim()
    );

    let backend = SamplingBackend::new(&connection.load()?)?;
    let job = backend.retrieve_job(job_id).await?;
    let poll = poll_config(timeout);
    let message = format!("Waiting for {} job {job_id}...", job.kind());

    match job {
        RetrievedJob::Sampling(job) => {
            let result = with_spinner(message, job.result_with(&poll)).await??;
            print_sampling(&result);
        }
        RetrievedJob::Estimation(job) => {
            let result = with_spinner(message, job.result_with(&poll)).await??;
            print_estimation(&result);
        }
    }

    Ok(())
}
