pub mod domain;
pub mod ports;
pub mod services;

pub use domain::{parse_tags, SaveDraft, Session, SessionDraft, SessionStatus, User, UserCredentials};
pub use ports::{
    CredentialStore, PasswordHasher, PortError, PortResult, SessionStore, TokenService,
};
pub use services::{AuthService, SessionService};
