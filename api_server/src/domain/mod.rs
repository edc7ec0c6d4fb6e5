// Domain layer: webinar entities, auth claims, validation rules and ports.

pub mod claims;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod upstream;
pub mod validation;

pub use claims::{Claims, Role};
pub use entities::{
    ChatMessage, ClientInfo, ContactMessage, CouponCheck, Lead, PaymentSimulation, PaymentStatus,
    Settings, SettingsPatch, StoredUser, UserProfile,
};
pub use errors::{
    AnalyticsError, AuthError, FieldError, GatewayError, PaymentError, SettingsError,
    ValidationError,
};
pub use ports::{Clock, PasswordHasher, SheetSource, TokenCodec, Webhook, WorkflowGateway};
