//! Delay-aware signal simulation over a fixed window of time steps.
//!
//! Only output assertion timing is modelled: an output with delay `d` is low
//! for steps `0..d` and high from step `d` to the end of the window. Signals
//! that no component drives (the circuit's primary inputs) stay low.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::symbol::Var;

/// Signal values per variable, one entry per time step `0..steps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationTable {
    steps: usize,
    signals: BTreeMap<Var, Vec<bool>>,
}

impl SimulationTable {
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn signal(&self, var: &Var) -> Option<&[bool]> {
        self.signals.get(var).map(Vec::as_slice)
    }

    /// Signal values of the variable called `name`, as 0/1.
    pub fn bits(&self, name: &str) -> Option<Vec<u8>> {
        self.signals
            .iter()
            .find(|(var, _)| var.name() == name)
            .map(|(_, values)| values.iter().map(|&b| b as u8).collect())
    }

    /// Values of every variable at time step `t`, ordered by variable name.
    pub fn row(&self, t: usize) -> Option<Vec<(&Var, bool)>> {
        if t >= self.steps {
            return None;
        }
        Some(self.signals.iter().map(|(var, values)| (var, values[t])).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, &[bool])> {
        self.signals.iter().map(|(var, values)| (var, values.as_slice()))
    }
}

impl fmt::Display for SimulationTable {
    /// One column per variable, one row per time step.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = format!("t={}", self.steps.saturating_sub(1)).len();
        write!(f, "{:width$}", "", width = width)?;
        for var in self.signals.keys() {
            write!(f, " {}", var)?;
        }
        writeln!(f)?;
        for t in 0..self.steps {
            write!(f, "{:width$}", format!("t={}", t), width = width)?;
            for (var, values) in &self.signals {
                write!(f, " {:>w$}", values[t] as u8, w = var.name().len())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Simulates `steps` time steps.
///
/// `variables` is the full signal universe; `delays` gives the delay of each
/// output. Outputs missing from `variables` are added. Any negative delay
/// fails the whole run with [`Error::InvalidDelay`].
pub fn simulate(
    variables: impl IntoIterator<Item = Var>,
    delays: impl IntoIterator<Item = (Var, i64)>,
    steps: usize,
) -> Result<SimulationTable> {
    let mut signals: BTreeMap<Var, Vec<bool>> = variables.into_iter().map(|v| (v, vec![false; steps])).collect();

    for (var, delay) in delays {
        if delay < 0 {
            return Err(Error::InvalidDelay {
                signal: var.name().to_string(),
                delay,
            });
        }
        let arrival = usize::try_from(delay).unwrap_or(usize::MAX);
        if arrival >= steps {
            debug!("simulate: `{}` (delay {}) never asserts within {} steps", var, delay, steps);
        }
        let values: Vec<bool> = (0..steps).map(|t| t >= arrival).collect();
        signals.insert(var, values);
    }

    Ok(SimulationTable { steps, signals })
}
