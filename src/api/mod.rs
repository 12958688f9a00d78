//! REST API module.
//!
//! Contains all API routes and handlers for the cage grid contract.

mod cages;
mod dashboard;
mod professors;
mod racks;

pub use cages::*;
pub use dashboard::*;
pub use professors::*;
pub use racks::*;

use axum::Json;

use crate::errors::AppError;

/// Response type for handlers: a JSON body or an enveloped error.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Wrap a body into a successful API response.
pub fn success<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Check a `#RRGGBB` marker color.
fn validate_color_code(color_code: &str) -> Result<(), AppError> {
    let valid = color_code.len() == 7
        && color_code.starts_with('#')
        && color_code[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::Validation(format!(
            "Color code '{}' must look like #RRGGBB",
            color_code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_color_code() {
        assert!(validate_color_code("#3B82F6").is_ok());
        assert!(validate_color_code("#abcdef").is_ok());
        assert!(validate_color_code("3B82F6").is_err());
        assert!(validate_color_code("#3B82F").is_err());
        assert!(validate_color_code("#GGGGGG").is_err());
    }
}
