use thiserror::Error;

/// A layout or rotation parameter outside its usable range.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} = {value} must be a finite, non-negative number")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} = {value} must be a finite, positive number")]
    NotPositive { name: &'static str, value: f64 },

    #[error("friction = {0} must lie strictly between 0 and 1")]
    Friction(f64),
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamError::Negative { name, value })
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { name, value })
    }
}
