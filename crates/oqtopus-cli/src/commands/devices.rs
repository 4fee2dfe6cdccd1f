//! Devices command implementation.

use anyhow::Result;
use console::style;

use oqtopus_adapter_cloud::{DeviceRecord, SamplingBackend};

use super::common::Connection;

/// Execute the devices command.
pub async fn execute(connection: &Connection, device_id: Option<&str>) -> Result<()> {
    let backend = SamplingBackend::new(&connection.load()?)?;

    if let Some(device_id) = device_id {
        let device = backend.get_device(device_id).await?;
        print_device(&device);
        return Ok(());
    }

    let devices = backend.list_devices().await?;
    if devices.is_empty() {
        println!("No devices found.");
        return Ok(());
    }

    println!("{} {} device(s):\n", style("→").cyan().bold(), devices.len());

    println!(
        "  {:<20}  {:<10}  {:<12}  {:>6}  {:>7}  {}",
        style("DEVICE").bold(),
        style("TYPE").bold(),
        style("STATUS").bold(),
        style("QUBITS").bold(),
        style("PENDING").bold(),
        style("CALIBRATED").bold()
    );
    println!("  {}", "-".repeat(80));

    for device in &devices {
        let qubits = device
            .n_qubits
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        println!(
            "  {:<20}  {:<10}  {:<12}  {:>6}  {:>7}  {}",
            device.device_id,
            device.device_type.as_deref().unwrap_or("-"),
            status_styled(device),
            qubits,
            device.n_pending_jobs,
            format_time(device.calibrated_at()),
        );
    }

    Ok(())
}

fn status_styled(device: &DeviceRecord) -> console::StyledObject<&str> {
    if device.is_available() {
        style(device.status.as_str()).green()
    } else {
        style(device.status.as_str()).yellow()
    }
}

fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_device(device: &DeviceRecord) {
    println!("{} {}", style("Device:").bold(), device.device_id);
    println!("  Type:         {}", device.device_type.as_deref().unwrap_or("-"));
    println!("  Status:       {}", status_styled(device));
    if !device.is_available() {
        println!("  Available at: {}", format_time(device.available_at()));
    }
    println!("  Pending jobs: {}", device.n_pending_jobs);
    if let Some(n) = device.n_qubits {
        println!("  Qubits:       {n}");
    }
    if !device.basis_gates.is_empty() {
        println!("  Basis gates:  {}", device.basis_gates.join(", "));
    }
    if !device.supported_instructions.is_empty() {
        println!("  Instructions: {}", device.supported_instructions.join(", "));
    }
    println!("  Calibrated:   {}", format_time(device.calibrated_at()));
    if let Some(description) = &device.description {
        println!("  Description:  {description}");
    }
}
