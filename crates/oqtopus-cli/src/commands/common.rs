//! Shared helpers for CLI commands.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use oqtopus_adapter_cloud::{
    Counts, EstimationResult, OqtopusConfig, PollConfig, SamplingResult, SubmitOptions,
    TranspilerInfo,
};
use oqtopus_ir::{Circuit, Complex64, Operator, PauliLabel};
use oqtopus_qasm3::parse;

/// Where credentials come from.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    /// Credentials file section.
    pub profile: Option<String>,
    /// Explicit credentials file.
    pub config: Option<PathBuf>,
}

impl Connection {
    /// Resolve the connection settings.
    ///
    /// An explicit file wins; otherwise the environment, then `~/.oqtopus`.
    pub fn load(&self) -> Result<OqtopusConfig> {
        let section = self.profile.as_deref();
        let config = match &self.config {
            Some(path) => OqtopusConfig::from_path(path, section),
            None => OqtopusConfig::load(section),
        }
        .context("Failed to load OQTOPUS credentials")?;
        tracing::debug!(url = config.url(), "loaded credentials");
        Ok(config)
    }
}

/// Arguments shared by the submitting commands.
#[derive(Debug, Clone, Args)]
pub struct JobArgs {
    /// Target device ID
    #[arg(short, long)]
    pub device: String,

    /// Number of shots
    #[arg(short, long, default_value = "1000")]
    pub shots: u32,

    /// Job name
    #[arg(long)]
    pub name: Option<String>,

    /// Job description
    #[arg(long)]
    pub description: Option<String>,

    /// Server-side transpiler ("none" disables transpilation)
    #[arg(long)]
    pub transpiler: Option<String>,

    /// Wait for the job and print its result
    #[arg(short, long)]
    pub wait: bool,

    /// Give up waiting after this many seconds
    #[arg(long, requires = "wait")]
    pub timeout: Option<u64>,
}

impl JobArgs {
    /// Submission options from the flags.
    pub fn submit_options(&self) -> Result<SubmitOptions> {
        let mut options = SubmitOptions::new();
        if let Some(name) = &self.name {
            options = options.with_name(name);
        }
        if let Some(description) = &self.description {
            options = options.with_description(description);
        }
        if let Some(transpiler) = &self.transpiler {
            let info: TranspilerInfo = transpiler
                .parse()
                .with_context(|| format!("Invalid transpiler '{transpiler}'"))?;
            options = options.with_transpiler(info);
        }
        Ok(options)
    }
}

/// Poll settings for an optional timeout in seconds.
pub fn poll_config(timeout: Option<u64>) -> PollConfig {
    match timeout {
        Some(secs) => PollConfig::default().with_timeout(Duration::from_secs(secs)),
        None => PollConfig::default(),
    }
}

/// Read an OpenQASM 3 file.
pub fn read_program(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Parse an OpenQASM 3 program.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    let source = read_program(path)?;
    parse(&source).map_err(|e| anyhow::anyhow!("Parse error in {}: {e}", path.display()))
}

/// Parse `"<label>=<coefficient>"`.
///
/// The coefficient may be real (`0.5`) or complex (`1-0.5i`).
pub fn parse_term(term: &str) -> Result<(PauliLabel, Complex64)> {
    let (label, coeff) = term
        .rsplit_once('=')
        .ok_or_else(|| anyhow::anyhow!("Term '{term}' is not of the form <label>=<coefficient>"))?;
    let label: PauliLabel = label
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Term '{term}': {e}"))?;
    let coeff: Complex64 = coeff
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Term '{term}': invalid coefficient '{}'", coeff.trim()))?;
    Ok((label, coeff))
}

/// Build an operator from `--term` arguments.
pub fn parse_operator(terms: &[String]) -> Result<Operator> {
    let mut operator = Operator::new();
    for term in terms {
        let (label, coeff) = parse_term(term)?;
        operator.add_term(label, coeff);
    }
    Ok(operator)
}

/// Run `future` behind a spinner.
pub async fn with_spinner<T>(message: String, future: impl Future<Output = T>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    Ok(output)
}

/// Print counts as a histogram, most frequent first.
pub fn print_counts(counts: &Counts, width: usize) {
    let total = counts.total_shots() as f64;
    let mut sorted = counts.sorted();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for (outcome, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(format_outcome(*outcome, width)).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

/// Bit string of `outcome`, at least `width` characters wide.
pub fn format_outcome(outcome: u64, width: usize) -> String {
    format!("{outcome:0>width$b}")
}

/// Number of bits needed to show every outcome.
fn outcome_width(counts: &Counts) -> usize {
    counts
        .iter()
        .map(|(outcome, _)| (64 - outcome.leading_zeros()) as usize)
        .max()
        .unwrap_or(1)
        .max(1)
}

/// Print a sampling result.
pub fn print_sampling(result: &SamplingResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.counts.total_shots()
    );
    print_counts(&result.counts, outcome_width(&result.counts));

    if let Some(divided) = &result.divided_counts {
        for (index, counts) in divided {
            println!("\n  {} circuit {index}:", style("→").cyan());
            print_counts(counts, outcome_width(counts));
        }
    }

    for warning in &result.warnings {
        println!("\n  {} {warning}", style("warning:").yellow().bold());
    }
}

/// Print an estimation result.
pub fn print_estimation(result: &EstimationResult) {
    let value = result.exp_value;
    println!(
        "\n{} Expectation value: {}",
        style("✓").green().bold(),
        style(format!("{} {:+}i", value.re, value.im)).yellow()
    );
    if let Some(stds) = result.stds {
        println!("  Standard deviation: {stds}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_real_term() {
        let (label, coeff) = parse_term("X0 X1=1.0").unwrap();
        assert_eq!(label.to_string(), "X0 X1");
        assert_eq!(coeff, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_parse_complex_term() {
        let (label, coeff) = parse_term("Z2 = 1-0.5i").unwrap();
        assert_eq!(label.to_string(), "Z2");
        assert_eq!(coeff, Complex64::new(1.0, -0.5));
    }

    #[test]
    fn test_parse_identity_term() {
        let (label, coeff) = parse_term("I=-0.25").unwrap();
        assert!(label.is_identity());
        assert_eq!(coeff.re, -0.25);
    }

    #[test]
    fn test_parse_bad_terms() {
        assert!(parse_term("X0 X1").is_err());
        assert!(parse_term("Q0=1").is_err());
        assert!(parse_term("X0=abc").is_err());
    }

    #[test]
    fn test_parse_operator_accumulates() {
        let operator =
            parse_operator(&["Z0=1".to_string(), "Z0=0.5".to_string(), "X1=2".to_string()])
                .unwrap();
        assert_eq!(operator.len(), 2);
        let z0: PauliLabel = "Z0".parse().unwrap();
        assert_eq!(operator.coefficient(&z0), Complex64::new(1.5, 0.0));
    }

    #[test]
    fn test_submit_options() {
        let args = JobArgs {
            device: "sim".into(),
            shots: 10,
            name: Some("bell".into()),
            description: None,
            transpiler: Some("none".into()),
            wait: false,
            timeout: None,
        };
        let options = args.submit_options().unwrap();
        assert_eq!(options.name.as_deref(), Some("bell"));
        assert_eq!(options.transpiler, Some(TranspilerInfo::Disabled));

        let args = JobArgs {
            transpiler: Some(" ".into()),
            ..args
        };
        assert!(args.submit_options().is_err());
    }

    #[test]
    fn test_poll_config() {
        assert_eq!(poll_config(None).timeout, None);
        assert_eq!(poll_config(Some(30)).timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_format_outcome() {
        assert_eq!(format_outcome(3, 2), "11");
        assert_eq!(format_outcome(1, 4), "0001");
        let counts: Counts = [(0, 1), (5, 1)].into_iter().collect();
        assert_eq!(outcome_width(&counts), 3);
        assert_eq!(outcome_width(&Counts::new()), 1);
    }

    #[test]
    fn test_load_circuit() {
        let mut file = tempfile::Builder::new().suffix(".qasm").tempfile().unwrap();
        write!(
            file,
            "OPENQASM 3;\ninclude \"stdgates.inc\";\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n"
        )
        .unwrap();

        let circuit = load_circuit(file.path()).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_circuit(Path::new("/definitely/not/here.qasm")).is_err());
    }

    #[test]
    fn test_connection_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[default]\nurl = https://example.com\napi_token = t\n\n[staging]\nurl = https://staging.example.com\napi_token = s\n"
        )
        .unwrap();

        let connection = Connection {
            profile: Some("staging".into()),
            config: Some(file.path().to_path_buf()),
        };
        let config = connection.load().unwrap();
        assert_eq!(config.url(), "https://staging.example.com");
    }
}
