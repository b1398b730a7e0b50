pub mod clock;
pub mod domain;
pub mod error;
pub mod store;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_display_includes_code() {
        let err = AppError::new("INCIDENT_NOT_FOUND", "Incident not found");
        assert_eq!(err.to_string(), "[INCIDENT_NOT_FOUND] Incident not found");
    }
}
