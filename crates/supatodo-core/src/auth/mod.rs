//! Auth Layer
//!
//! Auth service abstraction, change notifications, the startup bootstrap and
//! the login form actions.

mod actions;
mod bootstrap;
mod credentials;
mod error;
mod events;
mod service;


pub use actions::{
    sign_out, submit_credentials, AuthNotice, CredentialMode, SIGN_IN_NOTICE, SIGN_UP_NOTICE,
};
pub use bootstrap::{AuthBootstrap, BootstrapState, ShellView};
pub use credentials::{Credentials, SignUpOptions, ANONYMOUS_EMAIL_DOMAIN, ANONYMOUS_MARKER};
pub use error::{AuthError, AuthResult};
pub use events::{AuthEvents, Subscription, SubscriptionHandle};
pub use service::AuthService;
