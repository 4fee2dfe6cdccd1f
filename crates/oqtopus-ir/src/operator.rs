//! Pauli operators: sums of Pauli strings with complex coefficients.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A single-qubit Pauli matrix (identity is represented by absence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl Pauli {
    /// Single-letter name.
    pub fn as_char(self) -> char {
        match self {
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// A tensor product of Pauli matrices acting on distinct qubits.
///
/// Factors are kept sorted by qubit index, so two labels describing the same
/// product compare equal and print identically. The empty label is the
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PauliLabel(Vec<(QubitId, Pauli)>);

impl PauliLabel {
    /// The identity label.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a label from `(qubit, pauli)` factors.
    ///
    /// Fails if a qubit appears twice.
    pub fn new(factors: impl IntoIterator<Item = (QubitId, Pauli)>) -> IrResult<Self> {
        let mut factors: Vec<_> = factors.into_iter().collect();
        factors.sort_by_key(|(q, _)| *q);
        if let Some(w) = factors.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(IrError::InvalidPauliLabel {
                label: Self(factors.clone()).to_string(),
                reason: format!("qubit {} appears more than once", w[0].0.0),
            });
        }
        Ok(Self(factors))
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over factors in qubit order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        self.0.iter().copied()
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PauliLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "I");
        }
        for (i, (qubit, pauli)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", pauli.as_char(), qubit.0)?;
        }
        Ok(())
    }
}

impl FromStr for PauliLabel {
    type Err = IrError;

    /// Parse labels such as `"X0 Y1"`, `"X 0 Y 1"` or `"I"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| IrError::InvalidPauliLabel {
            label: s.to_string(),
            reason,
        };

        let mut factors = Vec::new();
        let mut tokens = s.split_whitespace().peekable();
        while let Some(token) = tokens.next() {
            let mut chars = token.chars();
            let letter = chars.next().unwrap_or('I');
            let rest = chars.as_str();

            let index = if rest.is_empty() {
                match tokens.peek() {
                    Some(next) if next.chars().all(|c| c.is_ascii_digit()) => tokens.next(),
                    _ if letter == 'I' => None,
                    _ => return Err(invalid(format!("missing qubit index after '{letter}'"))),
                }
            } else {
                Some(rest)
            };

            let pauli = match letter {
                'X' => Pauli::X,
                'Y' => Pauli::Y,
                'Z' => Pauli::Z,
                'I' => continue,
                other => return Err(invalid(format!("unknown Pauli '{other}'"))),
            };

            let index = index.unwrap_or_default();
            let qubit = index
                .parse::<u32>()
                .map_err(|_| invalid(format!("bad qubit index '{index}'")))?;
            factors.push((QubitId(qubit), pauli));
        }

        PauliLabel::new(factors).map_err(|e| match e {
            IrError::InvalidPauliLabel { reason, .. } => invalid(reason),
            other => other,
        })
    }
}

/// A linear combination of Pauli labels.
///
/// Terms are ordered by label, which makes iteration order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    terms: BTreeMap<PauliLabel, Complex64>,
}

impl Operator {
    /// Create an empty (zero) operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coeff * label`, accumulating onto an existing term.
    pub fn add_term(&mut self, label: PauliLabel, coeff: impl Into<Complex64>) -> &mut Self {
        *self.terms.entry(label).or_default() += coeff.into();
        self
    }

    /// Builder form of [`Operator::add_term`].
    #[must_use]
    pub fn with_term(mut self, label: PauliLabel, coeff: impl Into<Complex64>) -> Self {
        self.add_term(label, coeff);
        self
    }

    /// Coefficient of the identity term.
    pub fn constant(&self) -> Complex64 {
        self.coefficient(&PauliLabel::identity())
    }

    /// Coefficient of `label`, zero if absent.
    pub fn coefficient(&self, label: &PauliLabel) -> Complex64 {
        self.terms.get(label).copied().unwrap_or_default()
    }

    /// Iterate over `(label, coefficient)` pairs in label order.
    pub fn iter(&self) -> btree_map::Iter<'_, PauliLabel, Complex64> {
        self.terms.iter()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the operator has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<(PauliLabel, Complex64)> for Operator {
    fn from_iter<T: IntoIterator<Item = (PauliLabel, Complex64)>>(iter: T) -> Self {
        let mut op = Operator::new();
        for (label, coeff) in iter {
            op.add_term(label, coeff);
        }
        op
    }
}

impl<'a> IntoIterator for &'a Operator {
    type Item = (&'a PauliLabel, &'a Complex64);
    type IntoIter = btree_map::Iter<'a, PauliLabel, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn label(s: &str) -> PauliLabel {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_compact_and_spaced() {
        let compact = label("X0 X1");
        let spaced = label("X 0 X 1");
        assert_eq!(compact, spaced);
        assert_eq!(compact.to_string(), "X0 X1");
        assert_eq!(compact.weight(), 2);
    }

    #[test]
    fn test_parse_sorts_factors() {
        assert_eq!(label("Z3 X1").to_string(), "X1 Z3");
    }

    #[test]
    fn test_identity() {
        assert!(label("I").is_identity());
        assert!(label("").is_identity());
        assert_eq!(PauliLabel::identity().to_string(), "I");
        assert_eq!(label("I0 Z1").to_string(), "Z1");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "W0".parse::<PauliLabel>(),
            Err(IrError::InvalidPauliLabel { .. })
        ));
        assert!("X".parse::<PauliLabel>().is_err());
        assert!("Xa".parse::<PauliLabel>().is_err());
        let err = "X0 Y0".parse::<PauliLabel>().unwrap_err();
        assert!(err.to_string().contains("X0 Y0"));
    }

    #[test]
    fn test_operator_accumulates() {
        let mut op = Operator::new();
        op.add_term(label("Z0"), 0.5)
            .add_term(label("Z0"), 0.25)
            .add_term(PauliLabel::identity(), Complex64::new(0.0, 1.0));
        assert_eq!(op.len(), 2);
        assert_eq!(op.coefficient(&label("Z0")), Complex64::new(0.75, 0.0));
        assert_eq!(op.constant(), Complex64::new(0.0, 1.0));
    }

    #[test]
    fn test_operator_iteration_is_ordered() {
        let op = Operator::new()
            .with_term(label("Z0 Z1"), 1.0)
            .with_term(label("X0 X1"), 1.0)
            .with_term(PauliLabel::identity(), 2.0);
        let labels: Vec<String> = op.iter().map(|(l, _)| l.to_string()).collect();
        assert_eq!(labels, vec!["I", "X0 X1", "Z0 Z1"]);
    }

    proptest! {
        #[test]
        fn prop_display_parse_roundtrip(
            factors in proptest::collection::btree_map(0u32..16, 0u8..3, 0..6)
        ) {
            let factors = factors.into_iter().map(|(q, p)| {
                let pauli = match p { 0 => Pauli::X, 1 => Pauli::Y, _ => Pauli::Z };
                (QubitId(q), pauli)
            });
            let original = PauliLabel::new(factors).unwrap();
            let reparsed: PauliLabel = original.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, original);
        }
    }
}
