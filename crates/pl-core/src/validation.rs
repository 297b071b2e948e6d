use crate::error::ValidationError;
use crate::types::SubmitEventInput;

pub fn validate_submission(input: &SubmitEventInput) -> Result<(), ValidationError> {
    require("player_name", &input.player_name)?;
    require("dialog_text", &input.dialog_text)?;
    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}
