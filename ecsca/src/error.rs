use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcError {
    #[error("operands live in different rings: mod {0} and mod {1}")]
    ModulusMismatch(String, String),
    #[error("{0} has no inverse modulo {1}")]
    NotInvertible(String, String),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),
    #[error("invalid curve: {0}")]
    InvalidCurve(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl EcError {
    /// Returns the error kind name, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModulusMismatch(..) => "ModulusMismatch",
            Self::NotInvertible(..) => "NotInvertible",
            Self::InvalidCoordinates(_) => "InvalidCoordinates",
            Self::UnsupportedConversion(_) => "UnsupportedConversion",
            Self::InvalidCurve(_) => "InvalidCurve",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::Config(_) => "Config",
        }
    }
}
