use crate::domain::{AuthError, Claims, Role, TokenCodec};

// Token verification use case with injected dependencies.
pub struct VerifyTokenUseCase<'a, T: ?Sized> {
    pub tokens: &'a T,
}

impl<T> VerifyTokenUseCase<'_, T>
where
    T: TokenCodec + ?Sized,
{
    // Verify a bearer/cookie token, optionally requiring a role.
    pub fn execute(&self, token: Option<&str>, required: Option<Role>) -> Result<Claims, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify(token)?;

        match required {
            Some(role) if claims.role != role => Err(AuthError::Forbidden),
            _ => Ok(claims),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Clock, UserProfile};
    use crate::use_cases::test_support::{FixedClock, JsonTokens};

    fn user_token() -> String {
        let profile = UserProfile {
            id: "u-1".to_string(),
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            role: Role::User,
        };
        let claims = Claims::user(&profile, false, FixedClock::monday_morning().now());
        JsonTokens.issue(&claims).unwrap()
    }

    #[test]
    fn when_token_is_absent_or_blank_then_returns_missing_token() {
        let use_case = VerifyTokenUseCase { tokens: &JsonTokens };

        assert!(matches!(use_case.execute(None, None), Err(AuthError::MissingToken)));
        assert!(matches!(
            use_case.execute(Some("  "), None),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn when_user_token_hits_admin_route_then_returns_forbidden() {
        let use_case = VerifyTokenUseCase { tokens: &JsonTokens };
        let token = user_token();

        let result = use_case.execute(Some(&token), Some(Role::Admin));

        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[test]
    fn when_user_token_is_valid_then_claims_are_returned() {
        let use_case = VerifyTokenUseCase { tokens: &JsonTokens };
        let token = user_token();

        let claims = use_case
            .execute(Some(&token), None)
            .expect("expected token to verify");

        assert_eq!(claims.email.as_deref(), Some("asha@example.com"));
    }

    #[test]
    fn when_token_is_garbage_then_returns_invalid_token() {
        let use_case = VerifyTokenUseCase { tokens: &JsonTokens };

        let result = use_case.execute(Some("%%%not-a-token%%%"), None);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
