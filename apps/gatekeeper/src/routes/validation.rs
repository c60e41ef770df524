use crate::error::AppError;

pub fn require_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::invalid("email must be a non-empty address containing '@'"));
    }
    Ok(())
}

pub fn require_password(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
