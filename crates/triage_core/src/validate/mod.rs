use crate::domain::{CreateIncidentRequest, UpdateIncidentRequest};
use crate::error::{codes, AppError};

/// Creation requires a non-empty title and description. The check runs
/// before any ID is minted, so a rejected request leaves no trace.
pub fn validate_create(req: &CreateIncidentRequest) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(
            AppError::new(codes::VALIDATION_FAILED, "Incident title is required")
                .with_details("field=title"),
        );
    }
    if req.description.trim().is_empty() {
        return Err(AppError::new(
            codes::VALIDATION_FAILED,
            "Incident description is required",
        )
        .with_details("field=description"));
    }
    Ok(())
}

/// A partial update may omit fields, but may not blank out required ones.
pub fn validate_update(req: &UpdateIncidentRequest) -> Result<(), AppError> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(AppError::new(
                codes::VALIDATION_FAILED,
                "Incident title may not be emptied",
            )
            .with_details("field=title"));
        }
    }
    if let Some(description) = &req.description {
        if description.trim().is_empty() {
            return Err(AppError::new(
                codes::VALIDATION_FAILED,
                "Incident description may not be emptied",
            )
            .with_details("field=description"));
        }
    }
    Ok(())
}
