//! Recording of the formula calls a scalar multiplication performs.

use crate::formula::{FormulaKind, Intermediate, OpCount};
use crate::modular::Mod;
use crate::point::Point;

/// One formula evaluation: what went in, what came out, and every field
/// operation in between.
#[derive(Clone, Debug)]
pub struct FormulaAction {
    pub formula: &'static str,
    pub kind: FormulaKind,
    pub inputs: Vec<Point>,
    pub outputs: Vec<Point>,
    pub intermediates: Vec<Intermediate>,
}

impl FormulaAction {
    pub fn op_count(&self) -> OpCount {
        OpCount::of(&self.intermediates)
    }
}

pub trait Recorder {
    fn record(&mut self, action: FormulaAction);
}

/// Drops every action.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Recorder for Discard {
    fn record(&mut self, _action: FormulaAction) {}
}

/// In-memory recorder keeping every action in call order.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    actions: Vec<FormulaAction>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[FormulaAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Names of the evaluated formulas in call order.
    pub fn formulas(&self) -> Vec<&'static str> {
        self.actions.iter().map(|action| action.formula).collect()
    }

    pub fn kinds(&self) -> Vec<FormulaKind> {
        self.actions.iter().map(|action| action.kind).collect()
    }

    pub fn count(&self, kind: FormulaKind) -> usize {
        self.actions.iter().filter(|action| action.kind == kind).count()
    }

    /// Every intermediate field value across all actions, in order.
    pub fn intermediates(&self) -> impl Iterator<Item = &Mod> {
        self.actions
            .iter()
            .flat_map(|action| action.intermediates.iter().map(|i| &i.value))
    }

    pub fn op_count(&self) -> OpCount {
        let mut total = OpCount::NONE;
        for action in &self.actions {
            total += action.op_count();
        }
        total
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl Recorder for Trace {
    fn record(&mut self, action: FormulaAction) {
        self.actions.push(action);
    }
}
