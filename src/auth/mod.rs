pub mod bearer;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserProfile;

// Re-export necessary items
pub use bearer::{authenticate, parse_bearer, Identity};
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};

/// Represents the payload for a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Must be a valid email address. Stored exactly as given.
    #[validate(email)]
    pub email: String,
    /// Display name, 1 to 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Must be between 6 and 128 characters long.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Represents the payload for a user login request.
///
/// Only presence is checked here. Anything else about the credentials is answered with the
/// same generic rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response after a successful signup or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub user: UserProfile,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: UserProfile) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid_email = SignupRequest {
            email: "testexample.com".to_string(),
            ..valid_signup()
        };
        assert!(invalid_email.validate().is_err());

        let empty_name = SignupRequest {
            name: String::new(),
            ..valid_signup()
        };
        assert!(empty_name.validate().is_err());

        let short_password = SignupRequest {
            password: "123".to_string(),
            ..valid_signup()
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "test@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_password = LoginRequest {
            email: "test@example.com".to_string(),
            password: String::new(),
        };
        assert!(missing_password.validate().is_err());
    }

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            password: "password123".to_string(),
        }
    }
}
