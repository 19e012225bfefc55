use crate::error::EcError;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use std::path::Path;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MultiplierKind {
    Ltr,
    Rtl,
    Coron,
    SimpleLadder,
    Ladder,
    BinaryNaf,
    WindowNaf,
}

impl MultiplierKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
            Self::Coron => "coron",
            Self::SimpleLadder => "simple-ladder",
            Self::Ladder => "ladder",
            Self::BinaryNaf => "binary-naf",
            Self::WindowNaf => "window-naf",
        }
    }
}

fn default_width() -> usize {
    3
}

/// Which multiplier to build and with which formulas, by name.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MultiplierConfig {
    pub kind: MultiplierKind,
    /// The addition-like formula: `ladd` for the ladder, `add` or `dadd` for
    /// the simple ladder, `add` otherwise.
    pub add: String,
    pub dbl: String,
    #[serde(default)]
    pub neg: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub always: bool,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default)]
    pub precompute_negation: bool,
}

impl MultiplierConfig {
    pub fn new(kind: MultiplierKind, add: impl Into<String>, dbl: impl Into<String>) -> Self {
        Self {
            kind,
            add: add.into(),
            dbl: dbl.into(),
            neg: None,
            scale: None,
            always: false,
            width: default_width(),
            precompute_negation: false,
        }
    }

    pub fn with_neg(self, neg: impl Into<String>) -> Self {
        Self {
            neg: Some(neg.into()),
            ..self
        }
    }

    pub fn with_scale(self, scale: impl Into<String>) -> Self {
        Self {
            scale: Some(scale.into()),
            ..self
        }
    }

    pub fn with_always(self, always: bool) -> Self {
        Self { always, ..self }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    pub fn with_precompute_negation(self, precompute_negation: bool) -> Self {
        Self {
            precompute_negation,
            ..self
        }
    }

    /// Reads the file at `path` if it exists, then `ECSCA_*` environment
    /// variables on top of it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EcError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("ECSCA"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, EcError> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
