//! Command completion.

use shimwire_dispatch::{DispatchReport, Dispatcher};
use shimwire_host::ObjectRef;
use shimwire_protocol::{MessageBuilder, TabCompleteBuilder, complete};

use crate::deliver;

/// Offers completions from a fixed candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabCompleter {
    candidates: Vec<String>,
}

impl TabCompleter {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates matching `prefix`, in candidate order.
    pub fn matches(&self, prefix: &str) -> Vec<String> {
        complete(prefix, self.candidates.iter().map(String::as_str))
    }

    /// Sends the candidates matching `prefix` to `client`.
    pub fn complete(
        &self,
        dispatcher: &Dispatcher,
        client: &ObjectRef,
        prefix: &str,
    ) -> Option<DispatchReport> {
        Self::suggest(dispatcher, client, self.matches(prefix))
    }

    /// Sends an explicit completion list to `client`.
    pub fn suggest<I, S>(
        dispatcher: &Dispatcher,
        client: &ObjectRef,
        completions: I,
    ) -> Option<DispatchReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let built = TabCompleteBuilder::new(completions).build(dispatcher.resolver());
        deliver("tab-complete", dispatcher, [built], std::slice::from_ref(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_prefix() {
        let completer = TabCompleter::new(["home", "hub", "spawn"]);
        assert_eq!(completer.matches("h"), vec!["home", "hub"]);
        assert!(completer.matches("x").is_empty());
    }
}
