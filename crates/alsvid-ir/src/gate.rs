//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Angle tolerance for gate equality checks.
const ANGLE_EPS: f64 = 1e-10;

/// A quantum gate: the operation kind together with its numeric parameters.
///
/// The variant set is closed; extension happens at rule-registration
/// granularity via [`Gate::Custom`], never by open-ended type inspection.
/// Matrix semantics are deliberately absent — a gate is an opaque label
/// plus parameters as far as the pipeline is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gate {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around the X axis.
    Rx(f64),
    /// Rotation around the Y axis.
    Ry(f64),
    /// Rotation around the Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// SWAP gate.
    Swap,
    /// Quantum Fourier transform over a whole target register.
    Qft,
    /// A user-defined gate, decomposable only through registered rules.
    Custom(CustomGate),
}

/// Dispatch tag for rule lookup, one per gate kind.
///
/// Decomposition rules are registered against a `GateClass`; lookup is a
/// plain map access on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateClass {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S.
    S,
    /// S-dagger.
    Sdg,
    /// T.
    T,
    /// T-dagger.
    Tdg,
    /// X rotation.
    Rx,
    /// Y rotation.
    Ry,
    /// Z rotation.
    Rz,
    /// Phase.
    P,
    /// SWAP.
    Swap,
    /// Quantum Fourier transform.
    Qft,
    /// User-defined gates.
    Custom,
}

impl Gate {
    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::P(_) => "p",
            Gate::Swap => "swap",
            Gate::Qft => "qft",
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the dispatch tag of this gate.
    #[inline]
    pub fn class(&self) -> GateClass {
        match self {
            Gate::X => GateClass::X,
            Gate::Y => GateClass::Y,
            Gate::Z => GateClass::Z,
            Gate::H => GateClass::H,
            Gate::S => GateClass::S,
            Gate::Sdg => GateClass::Sdg,
            Gate::T => GateClass::T,
            Gate::Tdg => GateClass::Tdg,
            Gate::Rx(_) => GateClass::Rx,
            Gate::Ry(_) => GateClass::Ry,
            Gate::Rz(_) => GateClass::Rz,
            Gate::P(_) => GateClass::P,
            Gate::Swap => GateClass::Swap,
            Gate::Qft => GateClass::Qft,
            Gate::Custom(_) => GateClass::Custom,
        }
    }

    /// The number of target qubits this gate requires, or `None` for gates
    /// that act on a whole register of any size (`Qft`, `Custom`).
    pub fn fixed_arity(&self) -> Option<u32> {
        match self {
            Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::H
            | Gate::S
            | Gate::Sdg
            | Gate::T
            | Gate::Tdg
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_)
            | Gate::P(_) => Some(1),
            Gate::Swap => Some(2),
            Gate::Qft | Gate::Custom(_) => None,
        }
    }

    /// Numeric parameters of this gate, in declaration order.
    pub fn params(&self) -> &[f64] {
        match self {
            Gate::Rx(theta) | Gate::Ry(theta) | Gate::Rz(theta) | Gate::P(theta) => {
                std::slice::from_ref(theta)
            }
            Gate::Custom(g) => &g.params,
            _ => &[],
        }
    }
}

/// Check whether two angles are equivalent modulo `period`.
fn angles_equivalent(a: f64, b: f64, period: f64) -> bool {
    let d = (a - b).rem_euclid(period);
    d < ANGLE_EPS || period - d < ANGLE_EPS
}

impl PartialEq for Gate {
    /// Per-kind equality: axis rotations compare angles modulo 4π, phase
    /// gates modulo 2π, so identity rotations have degenerate equal forms
    /// (`Rx(0) == Rx(4π)`).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Gate::X, Gate::X)
            | (Gate::Y, Gate::Y)
            | (Gate::Z, Gate::Z)
            | (Gate::H, Gate::H)
            | (Gate::S, Gate::S)
            | (Gate::Sdg, Gate::Sdg)
            | (Gate::T, Gate::T)
            | (Gate::Tdg, Gate::Tdg)
            | (Gate::Swap, Gate::Swap)
            | (Gate::Qft, Gate::Qft) => true,
            (Gate::Rx(a), Gate::Rx(b))
            | (Gate::Ry(a), Gate::Ry(b))
            | (Gate::Rz(a), Gate::Rz(b)) => angles_equivalent(*a, *b, 4.0 * PI),
            (Gate::P(a), Gate::P(b)) => angles_equivalent(*a, *b, 2.0 * PI),
            (Gate::Custom(a), Gate::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        let params = self.params();
        if !params.is_empty() {
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p:.4}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A user-defined gate known to the pipeline only by name and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// Numeric parameters of the gate.
    pub params: Vec<f64>,
}

impl CustomGate {
    /// Create a new custom gate with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![],
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}
