//! The builder contract and the shared assembly routine.

use shimwire_host::Value;
use shimwire_symbols::{MemberHandle, Namespace, ResolutionError, Resolver, Signature};

use crate::{BuildError, MessageKind, MessageObject};

/// A single-use accumulator for one message kind.
///
/// `build` takes `self`, so a builder produces at most one message; calling
/// `build` twice does not compile.
pub trait MessageBuilder: Sized {
    /// The message kind this builder produces.
    const KIND: MessageKind;

    /// Resolves every symbol the message needs, allocates it and assigns
    /// each field in a fixed order.
    ///
    /// # Errors
    /// - [`BuildError::Unresolved`] if any symbol is missing in the running
    ///   version; nothing was allocated.
    /// - [`BuildError::Invocation`] if a field rejected its value; the
    ///   partially populated object was dropped.
    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError>;
}

/// Collects `(field, value)` pairs, then resolves and populates in one go.
///
/// All symbols are resolved before the object is allocated, and every
/// missing one is reported rather than just the first.
pub(crate) struct Assembler<'r> {
    resolver: &'r Resolver,
    kind: MessageKind,
    assignments: Vec<(&'static str, Value)>,
}

impl<'r> Assembler<'r> {
    pub(crate) fn new(resolver: &'r Resolver, kind: MessageKind) -> Self {
        Self {
            resolver,
            kind,
            assignments: Vec::new(),
        }
    }

    pub(crate) fn set(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.assignments.push((field, value.into()));
        self
    }

    pub(crate) fn finish(self) -> Result<MessageObject, BuildError> {
        let (prepared, ()) = self.prepare_with(|_| Ok(()))?;
        prepared.populate()
    }

    /// Resolves the message's symbols, then `extra`, a symbol the caller
    /// needs to compute its own values.
    ///
    /// Failures from both are reported together; nothing is allocated
    /// unless every symbol resolved.
    pub(crate) fn prepare_with<T>(
        self,
        extra: impl FnOnce(&Resolver) -> Result<T, ResolutionError>,
    ) -> Result<(Prepared<'r>, T), BuildError> {
        let Assembler {
            resolver,
            kind,
            assignments,
        } = self;
        let mut missing = Vec::new();

        let class = resolver
            .class(Namespace::Internal, kind.class_name())
            .map_err(|e| missing.push(e))
            .ok();

        let mut constructor = None;
        let mut fields = Vec::with_capacity(assignments.len());
        if let Some(class) = &class {
            constructor = resolver
                .constructor(class, &Signature::empty())
                .map_err(|e| missing.push(e))
                .ok();
            for (name, value) in assignments {
                match resolver.field(class, name) {
                    Ok(handle) => fields.push((name, handle, value)),
                    Err(e) => missing.push(e),
                }
            }
        }

        let extra = extra(resolver).map_err(|e| missing.push(e)).ok();

        match (constructor, extra) {
            (Some(constructor), Some(extra)) if missing.is_empty() => {
                let prepared = Prepared {
                    resolver,
                    kind,
                    constructor,
                    fields,
                };
                Ok((prepared, extra))
            }
            _ => Err(unresolved(resolver, kind, missing)),
        }
    }
}

/// A message whose symbols all resolved, not yet allocated.
pub(crate) struct Prepared<'r> {
    resolver: &'r Resolver,
    kind: MessageKind,
    constructor: MemberHandle,
    fields: Vec<(&'static str, MemberHandle, Value)>,
}

impl Prepared<'_> {
    /// Replaces the pending value of `field`.
    pub(crate) fn assign(&mut self, field: &str, value: Value) {
        if let Some((_, _, pending)) = self.fields.iter_mut().find(|(name, ..)| *name == field) {
            *pending = value;
        }
    }

    /// Allocates the message and assigns every field in order.
    pub(crate) fn populate(self) -> Result<MessageObject, BuildError> {
        let Prepared {
            resolver,
            kind,
            constructor,
            fields,
        } = self;

        let object = constructor
            .construct(&[])
            .map_err(|source| BuildError::Invocation { kind, source })?;
        for (_, handle, value) in fields {
            handle
                .set(&object, value)
                .map_err(|source| BuildError::Invocation { kind, source })?;
        }

        tracing::trace!(%kind, version = %resolver.version(), "message built");
        Ok(MessageObject::new(kind, resolver.version().clone(), object))
    }
}

/// Wraps every resolution failure of one build attempt.
pub(crate) fn unresolved(
    resolver: &Resolver,
    kind: MessageKind,
    missing: Vec<ResolutionError>,
) -> BuildError {
    tracing::debug!(
        %kind,
        version = %resolver.version(),
        missing = missing.len(),
        "message symbols unresolved"
    );
    BuildError::Unresolved {
        kind,
        version: resolver.version().clone(),
        missing,
    }
}
