//! Pinterest OAuth2 identity strategy.
//!
//! Implements the authorization-code flow against Pinterest: building the
//! authorization redirect, exchanging the returned code for an access token,
//! fetching the user's profile and normalizing it into a provider-agnostic
//! [`NormalizedAuthResult`]. Every failure of a login attempt is reported as a
//! single [`ErrorRecord`].
//!
//! ```no_run
//! use ras_identity_pinterest::{CallbackParams, PinterestStrategy, StrategyConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StrategyConfig::new("client-id", "client-secret", "https://example.com/auth/pinterest/")?;
//! let strategy = PinterestStrategy::new(config)?;
//!
//! let redirect = strategy.request().await?;
//! println!("send the browser to {}", redirect.url);
//!
//! // ... later, with the query string Pinterest redirected back with
//! let params = CallbackParams::default();
//! match strategy.callback(params).await {
//!     Ok(auth) => println!("logged in as {}", auth.info.nickname),
//!     Err(record) => println!("login failed: {}", record.code),
//! }
//! # Ok(())
//! # }
//! ```

mod callback;
mod config;
mod error;
mod host;
mod profile;
mod provider;
mod state;
mod transport;
mod types;


pub use callback::{AVATAR_SIZE, normalize};
pub use config::{
    AUTHORIZATION_ENDPOINT, CALLBACK_PATH, DEFAULT_SCOPE, StrategyConfig, TOKEN_ENDPOINT,
    USERINFO_ENDPOINT, default_redirect_uri,
};
pub use error::{ErrorRecord, PROVIDER_NAME, StrategyError, StrategyResult, codes};
pub use host::{AuthOutcomeHandler, dispatch};
pub use profile::PROFILE_FIELDS;
pub use provider::PinterestStrategy;
pub use state::{
    InMemoryStateStore, PendingState, StateStore, generate_state_token, state_expiry,
};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{
    AuthInfo, AuthUrls, AuthorizationRedirect, AuthorizationRequestParams, CallbackParams,
    Credentials, NormalizedAuthResult, ProviderProfile, TokenExchangeResult,
};
