use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::upstream::parse_user;
use crate::domain::validation::Validator;
use crate::domain::{
    AuthError, Claims, Clock, GatewayError, PasswordHasher, TokenCodec, UserProfile, Webhook,
    WorkflowGateway,
};
use crate::interface_adapters::protocol::{LoginRequest, RegisterRequest};
use crate::use_cases::to_payload;

// Issued session for an end user.
#[derive(Debug)]
pub struct UserSession {
    pub token: String,
    pub claims: Claims,
    pub user: UserProfile,
}

// Payload sent to the user workflow on registration. The plain password never leaves.
#[derive(Serialize)]
struct RegistrationPayload {
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct LookupPayload<'a> {
    email: &'a str,
}

pub struct RegisterUseCase<'a, G: ?Sized, C, T: ?Sized, H: ?Sized> {
    pub gateway: &'a G,
    pub clock: C,
    pub tokens: &'a T,
    pub hasher: &'a H,
}

impl<G, C, T, H> RegisterUseCase<'_, G, C, T, H>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
    T: TokenCodec + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub async fn execute(&self, payload: RegisterRequest) -> Result<UserSession, AuthError> {
        let mut validator = Validator::new();
        let name = validator.required_text("name", payload.name.as_deref(), 2, 100);
        let email = validator.email("email", payload.email.as_deref());
        let password = validator.required_secret("password", payload.password.as_deref(), 8, 128);
        let phone = validator.optional_phone("phone", payload.phone.as_deref());
        validator.finish()?;

        let now = self.clock.now();
        let registration = RegistrationPayload {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            password_hash: self.hasher.hash(&password.unwrap_or_default()).await?,
            created_at: now,
        };

        let reply = self
            .gateway
            .post(Webhook::AuthRegister, to_payload(&registration))
            .await
            .map_err(|err| match err {
                GatewayError::Rejected { status: 409, .. } => AuthError::EmailTaken,
                other => AuthError::Upstream(other),
            })?;
        let user = parse_user(reply).map_err(AuthError::UnexpectedShape)?;

        tracing::info!(user_id = %user.profile.id, "user registered");
        issue_session(
            self.tokens,
            user.profile,
            payload.remember_me.unwrap_or(false),
            now,
        )
    }
}

pub struct LoginUseCase<'a, G: ?Sized, C, T: ?Sized, H: ?Sized> {
    pub gateway: &'a G,
    pub clock: C,
    pub tokens: &'a T,
    pub hasher: &'a H,
}

impl<G, C, T, H> LoginUseCase<'_, G, C, T, H>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
    T: TokenCodec + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub async fn execute(&self, payload: LoginRequest) -> Result<UserSession, AuthError> {
        let mut validator = Validator::new();
        let email = validator.email("email", payload.email.as_deref());
        let password = validator.required_secret("password", payload.password.as_deref(), 1, 128);
        validator.finish()?;
        let (email, password) = (email.unwrap_or_default(), password.unwrap_or_default());

        let reply = self
            .gateway
            .post(Webhook::AuthLogin, to_payload(&LookupPayload { email: &email }))
            .await
            .map_err(|err| match err {
                GatewayError::Rejected {
                    status: 401 | 404, ..
                } => AuthError::InvalidCredentials,
                other => AuthError::Upstream(other),
            })?;
        let user = parse_user(reply).map_err(AuthError::UnexpectedShape)?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AuthError::UnexpectedShape(
                "user record has no password hash".to_string(),
            ));
        };
        if !self.hasher.verify(&password, hash).await {
            return Err(AuthError::InvalidCredentials);
        }

        issue_session(
            self.tokens,
            user.profile,
            payload.remember_me.unwrap_or(false),
            self.clock.now(),
        )
    }
}

// Re-issues a token for an already verified identity.
pub struct RefreshSessionUseCase<'a, C, T: ?Sized> {
    pub clock: C,
    pub tokens: &'a T,
}

impl<C, T> RefreshSessionUseCase<'_, C, T>
where
    C: Clock,
    T: TokenCodec + ?Sized,
{
    pub fn execute(&self, claims: &Claims) -> Result<(String, Claims), AuthError> {
        let renewed = claims.renewed(self.clock.now());
        let token = self.tokens.issue(&renewed)?;
        Ok((token, renewed))
    }
}

fn issue_session<T: TokenCodec + ?Sized>(
    tokens: &T,
    user: UserProfile,
    remember_me: bool,
    now: DateTime<Utc>,
) -> Result<UserSession, AuthError> {
    let claims = Claims::user(&user, remember_me, now);
    let token = tokens.issue(&claims)?;
    Ok(UserSession {
        token,
        claims,
        user,
    })
}
