//! Jobs command implementation.

use anyhow::Result;
use console::style;

use oqtopus_adapter_cloud::{JobStatus, SamplingBackend};

use super::common::Connection;

/// Execute the jobs command.
pub async fn execute(connection: &Connection) -> Result<()> {
    let backend = SamplingBackend::new(&connection.load()?)?;
    let jobs = backend.list_jobs().await?;

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    println!("{} {} job(s):\n", style("→").cyan().bold(), jobs.len());

    println!(
        "  {:<36}  {:<20}  {:<10}  {:<12}  {:<12}  {}",
        style("JOB ID").bold(),
        style("NAME").bold(),
        style("STATUS").bold(),
        style("TYPE").bold(),
        style("DEVICE").bold(),
        style("SUBMITTED").bold()
    );
    println!("  {}", "-".repeat(110));

    for job in &jobs {
        let status = JobStatus::from_wire(&job.status);
        let status_styled = match status {
            JobStatus::Succeeded => style(job.status.as_str()).green(),
            JobStatus::Failed | JobStatus::Cancelled => style(job.status.as_str()).red(),
            JobStatus::Pending => style(job.status.as_str()).yellow(),
            JobStatus::Running => style(job.status.as_str()).cyan(),
        };
        let submitted = job
            .submitted_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<36}  {:<20}  {:<10}  {:<12}  {:<12}  {}",
            style(&job.job_id).dim(),
            job.name.as_deref().unwrap_or("-"),
            status_styled,
            job.job_type.to_string(),
            job.device_id,
            submitted,
        );
    }

    Ok(())
}
