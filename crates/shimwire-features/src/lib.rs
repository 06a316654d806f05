//! Plugin features built on Shimwire.
//!
//! Everything here is a consumer of the lower layers: a feature builds
//! messages through `shimwire-protocol` and hands them to a
//! [`Dispatcher`]. None of them resolve symbols for messages themselves.
//!
//! A feature whose message cannot be built for the running version logs a
//! warning and does nothing; it never fails the caller.

mod boss;
mod error;
mod objective;
mod particle;
mod tab;

pub use boss::{FakeBoss, metadata_index};
pub use error::FeatureError;
pub use objective::ObjectiveDisplay;
pub use particle::ParticleEffect;
pub use tab::TabCompleter;

use shimwire_dispatch::{DispatchReport, Dispatcher};
use shimwire_host::ObjectRef;
use shimwire_protocol::{BuildError, MessageObject};

/// Sends already-built messages in order, or logs and skips the whole
/// effect if any of them failed to build.
fn deliver(
    feature: &'static str,
    dispatcher: &Dispatcher,
    built: impl IntoIterator<Item = Result<MessageObject, BuildError>>,
    targets: &[ObjectRef],
) -> Option<DispatchReport> {
    let messages = match built.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!(
                feature,
                version = %dispatcher.resolver().version(),
                error = %e,
                "message unavailable, skipping"
            );
            return None;
        }
    };

    let mut report = DispatchReport::default();
    for message in &messages {
        report.merge(DispatchReport::from_results(
            dispatcher.dispatch_to_many(targets, message),
        ));
    }
    Some(report)
}
