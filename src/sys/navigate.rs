use arcwheel::portfolio::PropertyId;
use std::process::{Command, Stdio};
use thiserror::Error;

pub const PROPERTY_PLACEHOLDER: &str = "{property}";

#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("open_command is empty")]
    EmptyCommand,
    #[error("Invalid open_command: {0}")]
    Parse(#[from] shell_words::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Splits `template` into argv and substitutes the property id into every argument.
pub fn build_command(template: &str, property: &PropertyId) -> Result<Vec<String>, NavigateError> {
    let args: Vec<String> = shell_words::split(template)?
        .into_iter()
        .map(|arg| arg.replace(PROPERTY_PLACEHOLDER, property.as_str()))
        .collect();

    if args.is_empty() {
        return Err(NavigateError::EmptyCommand);
    }
    Ok(args)
}

/// Opens the property-detail route for `property` with the configured command.
pub fn open_property(template: &str, property: &PropertyId) -> Result<(), NavigateError> {
    let args = build_command(template, property)?;
    let (program, rest) = args.split_first().ok_or(NavigateError::EmptyCommand)?;

    Command::new(program)
        .args(rest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
