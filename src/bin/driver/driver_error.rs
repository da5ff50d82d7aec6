use rpnc::builder::script::ScriptError;
#[cfg(feature = "vm")]
use rpnc::vm::{ParseAsmError, VmError};

pub enum DriverError {
    InputFileDoesNotExist(String),
    NoInput,
    ScriptError(String),
    #[cfg(feature = "vm")]
    AsmError(String),
    #[cfg(feature = "vm")]
    RuntimeError(String),
    IoError(String),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InputFileDoesNotExist(name) => write!(f, "File {name} does not exist"),
            Self::NoInput => write!(f, "no input: pass a SCRIPT or --exec FILE"),
            Self::ScriptError(e) => write!(f, "script error: {e}"),
            #[cfg(feature = "vm")]
            Self::AsmError(e) => write!(f, "assembly error: {e}"),
            #[cfg(feature = "vm")]
            Self::RuntimeError(e) => write!(f, "runtime error: {e}"),
            Self::IoError(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::fmt::Debug for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::error::Error for DriverError {}

impl From<ScriptError> for DriverError {
    fn from(e: ScriptError) -> Self {
        Self::ScriptError(e.to_string())
    }
}

#[cfg(feature = "vm")]
impl From<ParseAsmError> for DriverError {
    fn from(e: ParseAsmError) -> Self {
        Self::AsmError(e.to_string())
    }
}

#[cfg(feature = "vm")]
impl From<VmError> for DriverError {
    fn from(e: VmError) -> Self {
        Self::RuntimeError(e.to_string())
    }
}

impl From<std::io::Error> for DriverError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}
