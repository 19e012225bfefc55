#![deny(clippy::dbg_macro)]
#![deny(clippy::all)]

pub mod config;
pub mod curve;
pub mod error;
pub mod formula;
pub mod model;
pub mod modular;
pub mod mult;
pub mod point;
pub mod trace;

pub use config::{MultiplierConfig, MultiplierKind};
pub use curve::EllipticCurve;
pub use error::EcError;
pub use formula::{Formula, FormulaKind, Intermediate, OpCount, OpKind};
pub use model::{CoordinateModel, CoordinateSystem, CurveModel};
pub use modular::Mod;
pub use mult::{Multiplier, ScalarMultiplier};
pub use point::{Coords, Point};
pub use trace::{FormulaAction, Recorder, Trace};
