// ABOUTME: Builds a LifecycleClient bound to the transport the resolver picked.
// ABOUTME: Callers only ever see the trait object, never the concrete client.

use super::cli::{CliClient, PreflightPolicy};
use super::noop::NoopClient;
use super::socket::SocketClient;
use super::LifecycleClient;
use crate::config::Config;
use crate::probe::{HostProber, Prober};
use crate::runtime::environment::HostEnv;
use crate::runtime::identity::RuntimeIdentity;
use crate::runtime::registry;
use crate::runtime::resolver::{Resolution, ResolveError, TransportResolver};
use crate::runtime::transport::TransportCandidate;
use std::sync::Arc;

/// Settings applied to every client the factory builds.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub preflight: PreflightPolicy,
}

pub struct ClientFactory {
    prober: Arc<dyn Prober>,
    env: HostEnv,
    settings: ClientSettings,
}

impl ClientFactory {
    pub fn new(prober: Arc<dyn Prober>, env: HostEnv) -> Self {
        Self {
            prober,
            env,
            settings: ClientSettings::default(),
        }
    }

    /// Factory for this host with default settings.
    pub fn host() -> Self {
        Self::new(Arc::new(HostProber::new()), HostEnv::from_process())
    }

    /// Factory for this host, configured from `config`.
    pub fn from_config(config: &Config, env: HostEnv) -> Self {
        Self::new(Arc::new(config.prober()), env).settings(config.client_settings())
    }

    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve `identity` and bind a client to the chosen transport.
    pub async fn resolve(
        &self,
        identity: RuntimeIdentity,
    ) -> Result<Box<dyn LifecycleClient>, ResolveError> {
        let resolution = TransportResolver::new(self.prober.as_ref(), &self.env)
            .resolve(identity)
            .await?;
        Ok(self.bind(resolution))
    }

    /// Build the client for an already-made resolution.
    pub fn bind(&self, resolution: Resolution) -> Box<dyn LifecycleClient> {
        match resolution {
            Resolution::Host => Box::new(NoopClient),
            Resolution::Bound {
                identity,
                transport: TransportCandidate::Cli { binary },
            } => Box::new(
                CliClient::new(
                    identity,
                    binary,
                    registry::profile(identity).argv,
                    Arc::clone(&self.prober),
                )
                .preflight(self.settings.preflight),
            ),
            Resolution::Bound {
                identity,
                transport: TransportCandidate::Socket(socket),
            } => Box::new(SocketClient::new(identity, socket)),
        }
    }
}

/// Resolve `identity` on this host with default settings.
pub async fn resolve(identity: RuntimeIdentity) -> Result<Box<dyn LifecycleClient>, ResolveError> {
    ClientFactory::host().resolve(identity).await
}
