//! The bridge: one resolver and dispatcher for one host.

use std::sync::Arc;

use shimwire_dispatch::{DispatchError, DispatchReport, Dispatcher};
use shimwire_host::{HostRuntime, ObjectRef};
use shimwire_protocol::{MessageBuilder, MessageObject};
use shimwire_symbols::{Resolver, SymbolStats, VersionId};
use tokio::task::JoinSet;

use crate::{BridgeConfig, BridgeError};

/// Entry point for plugins.
///
/// Detects the host version once at construction, then builds and sends
/// messages for that version. Cheap to clone; clones share the symbol
/// cache.
///
/// ```rust,no_run
/// # use shimwire::host::memory::Release;
/// # use shimwire::prelude::*;
/// # fn main() -> Result<(), BridgeError> {
/// # let release = Release::install("v1_8_R3");
/// # let host = release.host().clone();
/// # let player = release.connect("alice");
/// let bridge = Bridge::new(host, &BridgeConfig::default());
/// bridge.send(TabCompleteBuilder::new(["home", "hub"]), &player)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Bridge {
    dispatcher: Dispatcher,
}

impl Bridge {
    pub fn new(host: Arc<dyn HostRuntime>, config: &BridgeConfig) -> Self {
        let resolver = Resolver::new(host, &config.symbols);
        if resolver.version().is_unknown() {
            tracing::warn!("host version unknown, every symbol will be unavailable");
        } else {
            tracing::info!(version = %resolver.version(), "bridge ready");
        }
        Self {
            dispatcher: Dispatcher::new(Arc::new(resolver)),
        }
    }

    pub fn version(&self) -> &VersionId {
        self.resolver().version()
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        self.dispatcher.resolver()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn stats(&self) -> SymbolStats {
        self.resolver().stats()
    }

    pub fn build<B: MessageBuilder>(&self, builder: B) -> Result<MessageObject, BridgeError> {
        Ok(builder.build(self.resolver())?)
    }

    /// Builds and sends to one client.
    pub fn send<B: MessageBuilder>(
        &self,
        builder: B,
        client: &ObjectRef,
    ) -> Result<(), BridgeError> {
        let message = self.build(builder)?;
        Ok(self.dispatcher.dispatch(client, &message)?)
    }

    /// Builds once and sends to every online client.
    pub fn send_to_all<B: MessageBuilder>(
        &self,
        builder: B,
    ) -> Result<DispatchReport, BridgeError> {
        let message = self.build(builder)?;
        Ok(self.dispatcher.dispatch_to_all(&message))
    }

    /// Sends to every online client from async code.
    ///
    /// Each delivery runs on tokio's blocking pool, so host calls never
    /// stall the async workers. Failures stay per-client and come back in
    /// roster order.
    pub async fn broadcast(&self, message: &MessageObject) -> DispatchReport {
        let clients = self.resolver().host().online_clients();
        let mut workers = JoinSet::new();
        for (index, client) in clients.iter().cloned().enumerate() {
            let dispatcher = self.dispatcher.clone();
            let message = message.clone();
            workers.spawn_blocking(move || (index, dispatcher.dispatch(&client, &message)));
        }

        let mut results: Vec<Option<Result<(), DispatchError>>> = vec![None; clients.len()];
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::warn!(error = %e, "broadcast worker failed"),
            }
        }

        DispatchReport::from_results(results.into_iter().zip(&clients).map(|(result, client)| {
            result.unwrap_or_else(|| {
                Err(DispatchError::Interrupted {
                    client: client.describe(),
                    reason: "worker did not complete".to_string(),
                })
            })
        }))
    }
}
