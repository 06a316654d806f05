//! The dispatcher: walks from a public client object to its private
//! connection and hands it a message.

use std::sync::Arc;

use shimwire_host::{ObjectRef, Value, ValueKind};
use shimwire_protocol::MessageObject;
use shimwire_symbols::{InvocationError, ResolutionError, Resolver, Signature};

use crate::DispatchError;

/// Public accessor returning a client's internal representation.
const HANDLE_METHOD: &str = "getHandle";
/// Field of the internal representation holding its connection.
const CONDUIT_FIELD: &str = "playerConnection";
/// Connection method accepting one message.
const SEND_METHOD: &str = "sendPacket";

/// Delivers built messages to clients.
///
/// Holds no client state. Every call re-walks
/// `client → getHandle() → playerConnection → sendPacket(message)`; the
/// symbols on that path come from the resolver's cache, the objects are
/// read fresh and dropped when the call returns.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: Arc<Resolver>,
}

impl Dispatcher {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Sends `message` to one client.
    pub fn dispatch(
        &self,
        client: &ObjectRef,
        message: &MessageObject,
    ) -> Result<(), DispatchError> {
        self.check_version(message)?;
        self.deliver(client, message).inspect_err(|e| {
            tracing::debug!(
                client = %client.describe(),
                kind = %message.kind(),
                error = %e,
                "dispatch failed"
            );
        })
    }

    /// Sends the same message to every client in `clients`.
    ///
    /// Results line up with the input. A failure for one client does not
    /// stop delivery to the rest. An empty slice does no work at all.
    pub fn dispatch_to_many(
        &self,
        clients: &[ObjectRef],
        message: &MessageObject,
    ) -> Vec<Result<(), DispatchError>> {
        if clients.is_empty() {
            return Vec::new();
        }
        if let Err(e) = self.check_version(message) {
            return clients.iter().map(|_| Err(e.clone())).collect();
        }
        clients.iter().map(|client| self.dispatch(client, message)).collect()
    }

    /// Sends to every client online right now.
    ///
    /// The roster is read once; clients joining or leaving during the
    /// batch are neither added nor skipped.
    pub fn dispatch_to_all(&self, message: &MessageObject) -> DispatchReport {
        let clients = self.resolver.host().online_clients();
        let report = DispatchReport::from_results(self.dispatch_to_many(&clients, message));
        tracing::trace!(
            kind = %message.kind(),
            delivered = report.delivered,
            failed = report.failures.len(),
            "broadcast finished"
        );
        report
    }

    fn check_version(&self, message: &MessageObject) -> Result<(), DispatchError> {
        let running = self.resolver.version();
        if message.version() == running {
            Ok(())
        } else {
            Err(DispatchError::VersionMismatch {
                message: message.version().clone(),
                running: running.clone(),
            })
        }
    }

    fn deliver(&self, client: &ObjectRef, message: &MessageObject) -> Result<(), DispatchError> {
        let resolver = &self.resolver;
        let name = || client.describe();
        let unresolved = |source: ResolutionError| DispatchError::Unresolved {
            client: name(),
            source,
        };
        let rejected = |source: InvocationError| DispatchError::Rejected {
            client: name(),
            source,
        };

        let client_class = resolver.class_of(client).map_err(unresolved)?;
        let get_handle = resolver
            .method(&client_class, HANDLE_METHOD, Some(&Signature::empty()))
            .map_err(unresolved)?;
        let handle = get_handle
            .invoke_object(client, &[])
            .map_err(rejected)?
            .ok_or_else(|| DispatchError::NoInternalHandle { client: name() })?;

        let handle_class = resolver.class_of(&handle).map_err(unresolved)?;
        let conduit_field = resolver.field(&handle_class, CONDUIT_FIELD).map_err(unresolved)?;
        let conduit = match conduit_field.get(&handle).map_err(rejected)? {
            Value::Object(conduit) => conduit,
            _ => return Err(DispatchError::NoConduit { client: name() }),
        };

        let conduit_class = resolver.class_of(&conduit).map_err(unresolved)?;
        let send = resolver
            .method(&conduit_class, SEND_METHOD, Some(&Signature::of(&[ValueKind::Object])))
            .map_err(unresolved)?;
        send.invoke(&conduit, &[Value::Object(message.as_object().clone())])
            .map_err(rejected)?;
        Ok(())
    }
}

/// Outcome of a batch send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Clients the message reached.
    pub delivered: usize,
    /// One entry per client it did not reach, in input order.
    pub failures: Vec<DispatchError>,
}

impl DispatchReport {
    pub fn from_results(results: impl IntoIterator<Item = Result<(), DispatchError>>) -> Self {
        let mut report = Self::default();
        for result in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => report.failures.push(e),
            }
        }
        report
    }

    /// Folds another batch into this one.
    pub fn merge(&mut self, other: DispatchReport) {
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }

    /// Number of clients attempted.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = DispatchReport::from_results(vec![
            Ok(()),
            Err(DispatchError::NoConduit { client: "a".into() }),
            Ok(()),
        ]);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.attempted(), 3);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_merge_adds_up() {
        let mut report = DispatchReport::from_results(vec![Ok(())]);
        report.merge(DispatchReport::from_results(vec![
            Ok(()),
            Err(DispatchError::NoConduit { client: "b".into() }),
        ]));
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_empty_report_is_complete() {
        let report = DispatchReport::from_results(Vec::new());
        assert_eq!(report.attempted(), 0);
        assert!(report.is_complete());
    }
}
