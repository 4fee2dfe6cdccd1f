//! Gate vocabulary shared by the circuit builder and the QASM layer.

use serde::{Deserialize, Serialize};

/// Gates the QASM layer knows by name.
///
/// Angles are radians. Not every gate here is accepted by the
/// cloud service; the adapter checks the accepted subset before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    /// `sqrt(X)`.
    SX,
    SXdg,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    /// Phase shift of `|1⟩`.
    P(f64),
    /// `U(theta, phi, lambda)`.
    U(f64, f64, f64),

    /// Controlled NOT, control first.
    CX,
    CY,
    CZ,
    CH,
    Swap,
    ISwap,
    CRx(f64),
    CRy(f64),
    CRz(f64),
    CP(f64),
    RXX(f64),
    RYY(f64),
    RZZ(f64),

    /// Toffoli, two controls then the target.
    CCX,
    /// Fredkin.
    CSwap,
}

impl StandardGate {
    /// OpenQASM mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "id",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::H => "h",
            Self::S => "s",
            Self::Sdg => "sdg",
            Self::T => "t",
            Self::Tdg => "tdg",
            Self::SX => "sx",
            Self::SXdg => "sxdg",
            Self::Rx(_) => "rx",
            Self::Ry(_) => "ry",
            Self::Rz(_) => "rz",
            Self::P(_) => "p",
            Self::U(_, _, _) => "u",
            Self::CX => "cx",
            Self::CY => "cy",
            Self::CZ => "cz",
            Self::CH => "ch",
            Self::Swap => "swap",
            Self::ISwap => "iswap",
            Self::CRx(_) => "crx",
            Self::CRy(_) => "cry",
            Self::CRz(_) => "crz",
            Self::CP(_) => "cp",
            Self::RXX(_) => "rxx",
            Self::RYY(_) => "ryy",
            Self::RZZ(_) => "rzz",
            Self::CCX => "ccx",
            Self::CSwap => "cswap",
        }
    }

    /// Arity on the wire list.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Self::I
            | Self::X
            | Self::Y
            | Self::Z
            | Self::H
            | Self::S
            | Self::Sdg
            | Self::T
            | Self::Tdg
            | Self::SX
            | Self::SXdg
            | Self::Rx(_)
            | Self::Ry(_)
            | Self::Rz(_)
            | Self::P(_)
            | Self::U(_, _, _) => 1,

            Self::CX
            | Self::CY
            | Self::CZ
            | Self::CH
            | Self::Swap
            | Self::ISwap
            | Self::CRx(_)
            | Self::CRy(_)
            | Self::CRz(_)
            | Self::CP(_)
            | Self::RXX(_)
            | Self::RYY(_)
            | Self::RZZ(_) => 2,

            Self::CCX | Self::CSwap => 3,
        }
    }

    /// Angles in the order they are written in QASM.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Rx(p)
            | Self::Ry(p)
            | Self::Rz(p)
            | Self::P(p)
            | Self::CRx(p)
            | Self::CRy(p)
            | Self::CRz(p)
            | Self::CP(p)
            | Self::RXX(p)
            | Self::RYY(p)
            | Self::RZZ(p) => vec![*p],

            Self::U(a, b, c) => vec![*a, *b, *c],

            _ => vec![],
        }
    }

    /// Inverse of [`StandardGate::name`] plus [`StandardGate::parameters`].
    ///
    /// `None` for an unknown mnemonic or the wrong number of angles.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        let gate = match (name, params) {
            ("id", []) => Self::I,
            ("x", []) => Self::X,
            ("y", []) => Self::Y,
            ("z", []) => Self::Z,
            ("h", []) => Self::H,
            ("s", []) => Self::S,
            ("sdg", []) => Self::Sdg,
            ("t", []) => Self::T,
            ("tdg", []) => Self::Tdg,
            ("sx", []) => Self::SX,
            ("sxdg", []) => Self::SXdg,
            ("rx", [a]) => Self::Rx(*a),
            ("ry", [a]) => Self::Ry(*a),
            ("rz", [a]) => Self::Rz(*a),
            ("p", [a]) => Self::P(*a),
            ("u", [a, b, c]) => Self::U(*a, *b, *c),
            ("cx", []) => Self::CX,
            ("cy", []) => Self::CY,
            ("cz", []) => Self::CZ,
            ("ch", []) => Self::CH,
            ("swap", []) => Self::Swap,
            ("iswap", []) => Self::ISwap,
            ("crx", [a]) => Self::CRx(*a),
            ("cry", [a]) => Self::CRy(*a),
            ("crz", [a]) => Self::CRz(*a),
            ("cp", [a]) => Self::CP(*a),
            ("rxx", [a]) => Self::RXX(*a),
            ("ryy", [a]) => Self::RYY(*a),
            ("rzz", [a]) => Self::RZZ(*a),
            ("ccx", []) => Self::CCX,
            ("cswap", []) => Self::CSwap,
            _ => return None,
        };
        Some(gate)
    }
}

/// An opaque gate known only by name and arity.
///
/// The circuit builder accepts these; the cloud translator rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    pub name: String,
    pub num_qubits: u32,
    pub params: Vec<f64>,
}

impl CustomGate {
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    Standard(StandardGate),
    Custom(CustomGate),
}

impl Gate {
    pub fn name(&self) -> &str {
        match self {
            Self::Standard(standard) => standard.name(),
            Self::Custom(custom) => &custom.name,
        }
    }

    pub fn num_qubits(&self) -> u32 {
        match self {
            Self::Standard(standard) => standard.num_qubits(),
            Self::Custom(custom) => custom.num_qubits,
        }
    }

    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Standard(standard) => standard.parameters(),
            Self::Custom(custom) => custom.params.clone(),
        }
    }

    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Self::Standard(standard) => Some(standard),
            Self::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}
