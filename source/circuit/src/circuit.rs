// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.


use crate::{Backend, Error, WireMap};
use log::{debug, trace};
use ndarray::{Array1, Array2};
use qudit_simulators::{Amplitude, zero_state};
use std::fmt::{self, Display, Formatter};

/// Call shape of a plain (uncontrolled, jointly applied) gate append.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateShape {
    Single,
    Two,
    Three,
    Custom,
}

/// How a recorded gate step is interpreted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum GateKind {
    /// One application of the operator to the joint target list. The shape
    /// records which append call produced the step.
    Joint(GateShape),
    /// One application of a single-qudit operator per target, in order.
    Fan,
    /// Quantum-controlled application. Recorded and classified, but with no
    /// run-time interpretation in this generation: executing it fails with
    /// [`Error::Unsupported`].
    Controlled { controls: Vec<usize> },
    /// Classically-controlled application. Recorded and classified, but with
    /// no run-time interpretation in this generation: executing it fails with
    /// [`Error::Unsupported`].
    ClassicallyControlled { controls: Vec<usize> },
}

impl GateKind {
    /// The tag shown in diagnostics.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            GateKind::Joint(GateShape::Single) => "single",
            GateKind::Joint(GateShape::Two) => "two",
            GateKind::Joint(GateShape::Three) => "three",
            GateKind::Joint(GateShape::Custom) => "custom",
            GateKind::Fan => "fan",
            GateKind::Controlled { .. } => "ctrl",
            GateKind::ClassicallyControlled { .. } => "cctrl",
        }
    }
}

/// A unitary-gate step. Immutable once appended.
#[derive(Clone, Debug)]
pub struct GateStep {
    pub kind: GateKind,
    pub operator: Array2<Amplitude>,
    /// Original qudit labels; resolved to live positions only when the step
    /// executes.
    pub targets: Vec<usize>,
    pub name: Option<String>,
}

/// The payload of a measurement step.
#[derive(Clone, Debug)]
pub enum MeasureKind {
    /// Computational-basis projective measurement; no operator payload.
    Projective,
    /// Measurement in the orthonormal basis given by the columns of one
    /// `d × d` matrix.
    Basis(Array2<Amplitude>),
    /// Generalized measurement given by an explicit list of `1 × d` effect
    /// operators.
    Kraus(Vec<Array2<Amplitude>>),
}

impl MeasureKind {
    /// The tag shown in diagnostics.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            MeasureKind::Projective => "projective",
            MeasureKind::Basis(_) => "basis",
            MeasureKind::Kraus(_) => "kraus",
        }
    }
}

/// A measurement step. Immutable once appended.
#[derive(Clone, Debug)]
pub struct MeasureStep {
    pub kind: MeasureKind,
    /// Original qudit label; resolved to a live position when the step
    /// executes.
    pub target: usize,
    /// Destination classical register.
    pub register: usize,
    pub name: Option<String>,
}

/// One entry of the merged instruction stream. Stream order is execution
/// order: a measurement executes before every gate appended after it was
/// scheduled, which is exactly the firing-position rule of the split-tape
/// formulation.
#[derive(Clone, Debug)]
pub enum Step {
    Gate(GateStep),
    Measure(MeasureStep),
}

/// An instruction tape over `nq` qudits of one dimension `d` and `nc`
/// classical registers, together with the live state it is interpreted
/// against.
///
/// Appends record steps addressed by original qudit labels and never
/// validate them; measurement scheduling validates eagerly and accepts each
/// label at most once. [`QuditCircuit::run`] interprets the recorded stream
/// once, in order, against the owned state.
pub struct QuditCircuit {
    name: Option<String>,
    num_qudits: usize,
    num_registers: usize,
    dim: usize,
    steps: Vec<Step>,
    /// Labels accepted as measurement targets, in scheduling order.
    measured_order: Vec<usize>,
    scheduled: Vec<bool>,
    /// Live relabeling; retired as measurement steps execute.
    wires: WireMap,
    state: Array1<Amplitude>,
    registers: Vec<Option<usize>>,
    probabilities: Vec<Option<f64>>,
}

impl QuditCircuit {
    /// Creates a circuit of `num_qudits` qudits of dimension `dim` and
    /// `num_registers` classical registers, in the `|0…0⟩` state.
    #[must_use]
    pub fn new(num_qudits: usize, num_registers: usize, dim: usize) -> Self {
        Self {
            name: None,
            num_qudits,
            num_registers,
            dim,
            steps: Vec::new(),
            measured_order: Vec::new(),
            scheduled: vec![false; num_qudits],
            wires: WireMap::identity(num_qudits),
            state: zero_state(num_qudits, dim),
            registers: vec![None; num_registers],
            probabilities: vec![None; num_registers],
        }
    }

    /// Like [`QuditCircuit::new`], with a display name.
    #[must_use]
    pub fn with_name(num_qudits: usize, num_registers: usize, dim: usize, name: &str) -> Self {
        let mut circuit = Self::new(num_qudits, num_registers, dim);
        circuit.name = Some(name.to_owned());
        circuit
    }

    /* appends */

    /// Appends `op` on one target.
    pub fn gate(&mut self, op: Array2<Amplitude>, target: usize, name: Option<&str>) {
        self.push_gate(GateKind::Joint(GateShape::Single), op, vec![target], name);
    }

    /// Appends `op` on two explicit targets.
    pub fn gate2(&mut self, op: Array2<Amplitude>, t0: usize, t1: usize, name: Option<&str>) {
        self.push_gate(GateKind::Joint(GateShape::Two), op, vec![t0, t1], name);
    }

    /// Appends `op` on three explicit targets.
    pub fn gate3(
        &mut self,
        op: Array2<Amplitude>,
        t0: usize,
        t1: usize,
        t2: usize,
        name: Option<&str>,
    ) {
        self.push_gate(GateKind::Joint(GateShape::Three), op, vec![t0, t1, t2], name);
    }

    /// Appends a single-qudit `op` fanned out across `targets`: at run time
    /// the backend is invoked once per target, never with the joint list.
    pub fn gate_fan(&mut self, op: Array2<Amplitude>, targets: &[usize], name: Option<&str>) {
        self.push_gate(GateKind::Fan, op, targets.to_vec(), name);
    }

    /// Appends `op` on an arbitrary target list, applied jointly.
    pub fn gate_custom(&mut self, op: Array2<Amplitude>, targets: &[usize], name: Option<&str>) {
        self.push_gate(GateKind::Joint(GateShape::Custom), op, targets.to_vec(), name);
    }

    /// Appends a quantum-controlled `op`. Recorded and classified only; see
    /// [`GateKind::Controlled`].
    pub fn gate_ctrl(
        &mut self,
        op: Array2<Amplitude>,
        controls: &[usize],
        targets: &[usize],
        name: Option<&str>,
    ) {
        self.push_gate(
            GateKind::Controlled {
                controls: controls.to_vec(),
            },
            op,
            targets.to_vec(),
            name,
        );
    }

    /// Appends a classically-controlled `op`. Recorded and classified only;
    /// see [`GateKind::ClassicallyControlled`].
    pub fn gate_cctrl(
        &mut self,
        op: Array2<Amplitude>,
        controls: &[usize],
        targets: &[usize],
        name: Option<&str>,
    ) {
        self.push_gate(
            GateKind::ClassicallyControlled {
                controls: controls.to_vec(),
            },
            op,
            targets.to_vec(),
            name,
        );
    }

    // Gate appends are pure recording: no range, distinctness, or
    // measured-ness checks. Inconsistent steps surface when the engine
    // resolves their labels.
    fn push_gate(
        &mut self,
        kind: GateKind,
        operator: Array2<Amplitude>,
        targets: Vec<usize>,
        name: Option<&str>,
    ) {
        self.steps.push(Step::Gate(GateStep {
            kind,
            operator,
            targets,
            name: name.map(str::to_owned),
        }));
    }

    /* measurement scheduling */

    /// Schedules a projective measurement of `target` into `register`.
    pub fn measure(
        &mut self,
        target: usize,
        register: usize,
        name: Option<&str>,
    ) -> Result<(), Error> {
        self.schedule(MeasureKind::Projective, target, register, name)
    }

    /// Schedules a measurement of `target` in the orthonormal basis given by
    /// the columns of `basis`, into `register`.
    pub fn measure_basis(
        &mut self,
        basis: Array2<Amplitude>,
        target: usize,
        register: usize,
        name: Option<&str>,
    ) -> Result<(), Error> {
        self.schedule(MeasureKind::Basis(basis), target, register, name)
    }

    /// Schedules a generalized measurement of `target` through the given
    /// effect operators, into `register`.
    pub fn measure_kraus(
        &mut self,
        operators: Vec<Array2<Amplitude>>,
        target: usize,
        register: usize,
        name: Option<&str>,
    ) -> Result<(), Error> {
        self.schedule(MeasureKind::Kraus(operators), target, register, name)
    }

    fn schedule(
        &mut self,
        kind: MeasureKind,
        target: usize,
        register: usize,
        name: Option<&str>,
    ) -> Result<(), Error> {
        if target >= self.num_qudits {
            return Err(Error::QuditOutOfRange {
                label: target,
                num_qudits: self.num_qudits,
            });
        }
        if register >= self.num_registers {
            return Err(Error::RegisterOutOfRange {
                register,
                num_registers: self.num_registers,
            });
        }
        if self.scheduled[target] {
            return Err(Error::AlreadyMeasured { label: target });
        }
        self.scheduled[target] = true;
        self.measured_order.push(target);
        self.steps.push(Step::Measure(MeasureStep {
            kind,
            target,
            register,
            name: name.map(str::to_owned),
        }));
        Ok(())
    }

    /* queries */

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn num_qudits(&self) -> usize {
        self.num_qudits
    }

    #[must_use]
    pub fn num_registers(&self) -> usize {
        self.num_registers
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether `label` has been accepted as a measurement target.
    #[must_use]
    pub fn is_measured(&self, label: usize) -> bool {
        self.scheduled.get(label).copied().unwrap_or(false)
    }

    /// The measured labels, in scheduling order.
    #[must_use]
    pub fn measured(&self) -> &[usize] {
        &self.measured_order
    }

    /// Read access to the live state.
    #[must_use]
    pub fn state(&self) -> &Array1<Amplitude> {
        &self.state
    }

    /// The outcome held by `register`, if one has been written.
    #[must_use]
    pub fn register(&self, register: usize) -> Option<usize> {
        self.registers.get(register).copied().flatten()
    }

    /// The probability of the outcome held by `register`, if one has been
    /// written.
    #[must_use]
    pub fn probability(&self, register: usize) -> Option<f64> {
        self.probabilities.get(register).copied().flatten()
    }

    /// The current position of `label` in the live state.
    pub fn resolve(&self, label: usize) -> Result<usize, Error> {
        self.wires.resolve(label)
    }

    /// The live relabeling table.
    #[must_use]
    pub fn wires(&self) -> &WireMap {
        &self.wires
    }

    /// The recorded instruction stream, in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// For each measurement step in scheduling order, the number of gate
    /// steps recorded before it — the position in the gate tape at which it
    /// fires.
    #[must_use]
    pub fn fire_positions(&self) -> Vec<usize> {
        let mut gates_seen = 0;
        let mut fires = Vec::new();
        for step in &self.steps {
            match step {
                Step::Gate(_) => gates_seen += 1,
                Step::Measure(_) => fires.push(gates_seen),
            }
        }
        fires
    }

    /* execution */

    /// Interprets the recorded stream, in order, against the live state.
    ///
    /// Fails fast at the first invalid step; the state, registers, and
    /// relabeling table then reflect exactly the steps applied before it.
    pub fn run(&mut self, backend: &mut impl Backend) -> Result<(), Error> {
        debug!(
            "running {} step(s) on {} qudit(s) of dimension {}",
            self.steps.len(),
            self.num_qudits,
            self.dim
        );
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Measure(measure) => {
                    let position = self.wires.resolve(measure.target)?;
                    trace!(
                        "step {index}: measure {} qudit {} at position {position}",
                        measure.kind.tag(),
                        measure.target
                    );
                    let measured =
                        backend.measure(&self.state, &measure.kind, position, self.dim);
                    self.registers[measure.register] = Some(measured.outcome);
                    self.probabilities[measure.register] = Some(measured.probability);
                    self.state = measured.state;
                    self.wires.retire(measure.target)?;
                }
                Step::Gate(gate) => match &gate.kind {
                    GateKind::Joint(_) => {
                        let positions = self.wires.resolve_all(&gate.targets)?;
                        trace!(
                            "step {index}: gate {} on positions {positions:?}",
                            gate.kind.tag()
                        );
                        self.state =
                            backend.apply(&self.state, &gate.operator, &positions, self.dim);
                    }
                    GateKind::Fan => {
                        for &target in &gate.targets {
                            let position = self.wires.resolve(target)?;
                            trace!("step {index}: fan gate on position {position}");
                            self.state =
                                backend.apply(&self.state, &gate.operator, &[position], self.dim);
                        }
                    }
                    GateKind::Controlled { .. } | GateKind::ClassicallyControlled { .. } => {
                        return Err(Error::Unsupported {
                            step: index,
                            gate: gate
                                .name
                                .clone()
                                .unwrap_or_else(|| gate.kind.tag().to_owned()),
                        });
                    }
                },
            }
        }
        Ok(())
    }
}

impl Display for QuditCircuit {
    /// Renders the stream in execution order, followed by the measured
    /// labels, register contents, firing positions, and relabeling table.
    /// A diagnostic aid, not a stable format.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => writeln!(
                f,
                "circuit '{name}' (qudits {}, registers {}, dim {})",
                self.num_qudits, self.num_registers, self.dim
            )?,
            None => writeln!(
                f,
                "circuit (qudits {}, registers {}, dim {})",
                self.num_qudits, self.num_registers, self.dim
            )?,
        }
        let mut gates_seen = 0;
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Gate(gate) => {
                    write!(f, "  {index}: gate {}", gate.kind.tag())?;
                    if let Some(name) = &gate.name {
                        write!(f, " {name}")?;
                    }
                    if let GateKind::Controlled { controls }
                    | GateKind::ClassicallyControlled { controls } = &gate.kind
                    {
                        write!(f, ", controls {controls:?}")?;
                    }
                    writeln!(f, ", targets {:?}", gate.targets)?;
                    gates_seen += 1;
                }
                Step::Measure(measure) => {
                    write!(f, "  {index}: measure {}", measure.kind.tag())?;
                    if let Some(name) = &measure.name {
                        write!(f, " {name}")?;
                    }
                    writeln!(
                        f,
                        ", target {} -> c{}, fires at {gates_seen}",
                        measure.target, measure.register
                    )?;
                }
            }
        }
        writeln!(f, "measured: {:?}", self.measured_order)?;
        write!(f, "registers:")?;
        for (register, outcome) in self.registers.iter().enumerate() {
            match (outcome, self.probabilities[register]) {
                (Some(value), Some(probability)) => {
                    write!(f, " c{register} = {value} (p = {probability:.4})")?;
                }
                _ => write!(f, " c{register} = -")?,
            }
        }
        writeln!(f)?;
        writeln!(f, "fires: {:?}", self.fire_positions())?;
        writeln!(f, "wires: {}", self.wires)
    }
}
