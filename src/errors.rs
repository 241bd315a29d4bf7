use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num;

pub type Result<T> = std::result::Result<T, WigainError>;

#[derive(Debug)]
pub enum WigainError {
    InvalidWeight(f64),
    InvalidParameter(String),
    Computation(String),
    ParseFloat(num::ParseFloatError),
}

impl From<num::ParseFloatError> for WigainError {
    fn from(err: num::ParseFloatError) -> WigainError {
        WigainError::ParseFloat(err)
    }
}

impl Display for WigainError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match *self {
            WigainError::InvalidWeight(w) => {
                write!(f, "The value {} of the weight is not valid, must be in the range 0..1", w)
            }
            WigainError::InvalidParameter(ref e) => write!(f, "Invalid parameter: {}", e),
            WigainError::Computation(ref e) => write!(f, "Computation error: {}", e),
            WigainError::ParseFloat(ref e) => write!(f, "ParseFloat error: {}", e),
        }
    }
}

impl Error for WigainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            WigainError::InvalidWeight(_) => None,
            WigainError::InvalidParameter(_) => None,
            WigainError::Computation(_) => None,
            WigainError::ParseFloat(ref e) => Some(e),
        }
    }
}
