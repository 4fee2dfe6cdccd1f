//! Typed results decoded from terminal job records.

use std::collections::BTreeMap;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{CountsPayload, DividedCountsPayload, JobRecord};
use crate::error::{OqtopusError, OqtopusResult};

/// Measurement counts keyed by the observed bit pattern.
///
/// Bit `k` of a key is the value of classical bit `c[k]`. Keys are 64 bits
/// wide, so a circuit reading into more than 64 classical bits cannot be
/// decoded and its result fails with [`OqtopusError::InvalidResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<u64, u64>);

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `outcome`.
    pub fn insert(&mut self, outcome: u64, count: u64) {
        *self.0.entry(outcome).or_insert(0) += count;
    }

    /// Observations of one outcome (0 when never seen).
    pub fn get(&self, outcome: u64) -> u64 {
        self.0.get(&outcome).copied().unwrap_or(0)
    }

    /// Sum over all outcomes.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(outcome, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// The most frequent outcome; ties resolve to the smaller key.
    pub fn most_frequent(&self) -> Option<(u64, u64)> {
        self.iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    /// Relative frequencies.
    pub fn probabilities(&self) -> FxHashMap<u64, f64> {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return FxHashMap::default();
        }
        self.iter().map(|(k, v)| (k, v as f64 / total)).collect()
    }

    /// Pairs sorted by outcome.
    pub fn sorted(&self) -> Vec<(u64, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Decode a counts payload.
    pub(crate) fn decode(payload: &CountsPayload) -> OqtopusResult<Self> {
        let map = match payload {
            CountsPayload::Map(map) => map.clone(),
            CountsPayload::Encoded(raw) => serde_json::from_str(raw).map_err(|e| {
                OqtopusError::InvalidResponse(format!("counts are not a JSON object: {e}"))
            })?,
        };
        Self::from_keyed(&map)
    }

    fn from_keyed(map: &BTreeMap<String, u64>) -> OqtopusResult<Self> {
        let mut counts = Counts::new();
        for (key, &count) in map {
            counts.insert(parse_outcome(key)?, count);
        }
        Ok(counts)
    }
}

impl FromIterator<(u64, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (outcome, count) in iter {
            counts.insert(outcome, count);
        }
        counts
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (outcome, count)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{outcome}: {count}")?;
        }
        write!(f, "}}")
    }
}

/// Parse an outcome key.
///
/// Keys made only of `0`/`1` are bit strings (rightmost character is bit 0,
/// spaces between registers are ignored), `0x` keys are hexadecimal, other
/// digit strings are decimal.
fn parse_outcome(key: &str) -> OqtopusResult<u64> {
    let invalid = |e: ParseIntError| {
        let message = if matches!(e.kind(), IntErrorKind::PosOverflow) {
            format!("counts key '{key}' does not fit in 64 bits")
        } else {
            format!("invalid counts key '{key}'")
        };
        OqtopusError::InvalidResponse(message)
    };

    let trimmed = key.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).map_err(invalid);
    }

    let bits: String = trimmed.chars().filter(|c| *c != ' ').collect();
    if bits.is_empty() {
        return Err(OqtopusError::InvalidResponse("empty counts key".into()));
    }
    if bits.chars().all(|c| c == '0' || c == '1') {
        return u64::from_str_radix(&bits, 2).map_err(invalid);
    }
    bits.parse::<u64>().map_err(invalid)
}

/// Condition attached to a result that the caller should know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResultWarning {
    /// The counts do not add up to the requested shot count.
    ShotMismatch {
        /// Shots requested at submission.
        requested: u64,
        /// Sum of the returned counts.
        observed: u64,
    },
}

impl fmt::Display for ResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultWarning::ShotMismatch {
                requested,
                observed,
            } => write!(f, "requested {requested} shots but counts sum to {observed}"),
        }
    }
}

/// Result of a sampling job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingResult {
    /// Aggregate counts.
    pub counts: Counts,
    /// Per-circuit counts of a multi-circuit job, keyed by circuit index.
    pub divided_counts: Option<BTreeMap<u32, Counts>>,
    /// Shots requested at submission.
    pub shots: u64,
    /// Conditions detected while decoding.
    pub warnings: Vec<ResultWarning>,
}

impl SamplingResult {
    /// Decode the sampling payload of a succeeded job.
    pub fn from_record(record: &JobRecord) -> OqtopusResult<Self> {
        let sampling = record
            .job_info
            .result
            .as_ref()
            .and_then(|r| r.sampling.as_ref())
            .ok_or_else(|| {
                OqtopusError::InvalidResponse(format!(
                    "job {} has no sampling result",
                    record.job_id
                ))
            })?;

        let counts = Counts::decode(&sampling.counts)?;
        let divided_counts = sampling
            .divided_counts
            .as_ref()
            .map(decode_divided)
            .transpose()?;

        let shots = u64::from(record.shots);
        let mut warnings = Vec::new();
        let observed = counts.total_shots();
        if shots > 0 && observed != shots {
            warn!(
                job_id = %record.job_id,
                requested = shots,
                observed,
                "sampling counts do not match the requested shots"
            );
            warnings.push(ResultWarning::ShotMismatch {
                requested: shots,
                observed,
            });
        }

        Ok(Self {
            counts,
            divided_counts,
            shots,
            warnings,
        })
    }

    /// Whether no warning was attached.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn decode_divided(payload: &DividedCountsPayload) -> OqtopusResult<BTreeMap<u32, Counts>> {
    let map = match payload {
        DividedCountsPayload::Map(map) => map.clone(),
        DividedCountsPayload::Encoded(raw) => serde_json::from_str(raw).map_err(|e| {
            OqtopusError::InvalidResponse(format!("divided_counts are not a JSON object: {e}"))
        })?,
    };

    map.iter()
        .map(|(index, counts)| {
            let index = index.trim().parse::<u32>().map_err(|_| {
                OqtopusError::InvalidResponse(format!("invalid circuit index '{index}'"))
            })?;
            Ok((index, Counts::from_keyed(counts)?))
        })
        .collect()
}

/// Result of an estimation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Expectation value.
    pub exp_value: Complex64,
    /// Standard deviation, when reported.
    pub stds: Option<f64>,
}

impl EstimationResult {
    /// Decode the estimation payload of a succeeded job.
    pub fn from_record(record: &JobRecord) -> OqtopusResult<Self> {
        let estimation = record
            .job_info
            .result
            .as_ref()
            .and_then(|r| r.estimation.as_ref())
            .ok_or_else(|| {
                OqtopusError::InvalidResponse(format!(
                    "job {} has no estimation result",
                    record.job_id
                ))
            })?;

        let re = estimation.exp_value.ok_or_else(|| {
            OqtopusError::InvalidResponse(format!("job {} has no exp_value", record.job_id))
        })?;
        let im = estimation.exp_value_imag.unwrap_or(0.0);

        Ok(Self {
            exp_value: Complex64::new(re, im),
            stds: estimation.stds,
        })
    }
}
