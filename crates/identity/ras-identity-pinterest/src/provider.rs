//! Pinterest strategy and the authorization request step.

use crate::config::StrategyConfig;
use crate::error::StrategyResult;
use crate::state::{InMemoryStateStore, PendingState, StateStore};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{AuthorizationRedirect, AuthorizationRequestParams};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// OAuth2 authorization-code strategy for Pinterest.
///
/// Cheap to clone; every login attempt runs against the same shared config,
/// transport and state store.
#[derive(Clone)]
pub struct PinterestStrategy {
    pub(crate) config: Arc<StrategyConfig>,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) state_store: Arc<dyn StateStore>,
}

impl PinterestStrategy {
    /// Strategy with the reqwest transport and an in-memory state store.
    pub fn new(config: StrategyConfig) -> StrategyResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.http_timeout_seconds)?;

        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(InMemoryStateStore::new()),
        ))
    }

    pub fn with_parts(
        config: StrategyConfig,
        transport: Arc<dyn HttpTransport>,
        state_store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            state_store,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn state_store(&self) -> &Arc<dyn StateStore> {
        &self.state_store
    }

    /// Build the authorization URL the host should redirect the browser to.
    ///
    /// A fresh state token is issued and remembered for the callback.
    pub async fn request(&self) -> StrategyResult<AuthorizationRedirect> {
        let mut url = Url::parse(&self.config.authorization_endpoint)?;

        let pending = PendingState::new(
            self.config.redirect_uri.clone(),
            self.config.state_ttl_seconds,
        )?;

        let params = AuthorizationRequestParams {
            response_type: "code".to_string(),
            redirect_uri: self.config.redirect_uri.clone(),
            client_id: self.config.client_id.clone(),
            state: pending.state.clone(),
            scope: Some(self.config.scope.clone()).filter(|scope| !scope.is_empty()),
        };

        url.query_pairs_mut().extend_pairs(params.pairs());

        self.state_store.store(pending).await?;

        debug!("Generated Pinterest authorization URL");

        Ok(AuthorizationRedirect {
            url: url.to_string(),
            state: params.state,
        })
    }
}
