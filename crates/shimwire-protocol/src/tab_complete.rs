//! The "tab-completion" message.

use shimwire_host::Value;
use shimwire_symbols::Resolver;

use crate::builder::Assembler;
use crate::{BuildError, MessageBuilder, MessageKind, MessageObject};

/// Builds a message offering completion suggestions, in order.
///
/// An empty list is valid: it tells the client there is nothing to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabCompleteBuilder {
    completions: Vec<String>,
}

impl TabCompleteBuilder {
    pub fn new<I, S>(completions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completions: completions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn completions(&self) -> &[String] {
        &self.completions
    }
}

impl MessageBuilder for TabCompleteBuilder {
    const KIND: MessageKind = MessageKind::TabComplete;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        Assembler::new(resolver, Self::KIND)
            .set("a", Value::StrArray(self.completions))
            .finish()
    }
}

/// Filters `candidates` to those starting with `prefix`, ignoring ASCII
/// case, keeping their original order.
pub fn complete<'a, I>(prefix: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.to_ascii_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_ascii_lowercase().starts_with(&prefix))
        .map(str::to_string)
        .collect()
}
