pub mod client;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod public_keys;
pub mod session_cookie;
pub mod token_source;
pub mod users;

pub use client::FirebaseAuth;
pub use credentials::{CredentialsError, ServiceAccountCredentials};
pub use error::AuthError;
pub use factory::build_firebase_auth;
pub use public_keys::PublicKeyCache;
pub use session_cookie::{SessionClaims, SessionCookieVerifier};
pub use token_source::AccessTokenSource;
pub use users::UserLookup;
