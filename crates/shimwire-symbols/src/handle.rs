//! Resolved class descriptors and member handles.

use std::fmt;

use shimwire_host::{ClassRef, Constructor, Field, HostFault, Method, ObjectRef, Value};

use crate::{InvocationError, VersionId};

/// What kind of member a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => write!(f, "field"),
            Self::Method => write!(f, "method"),
            Self::Constructor => write!(f, "constructor"),
        }
    }
}

/// A resolved internal class, bound to the version it was resolved under.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    version: VersionId,
    class: ClassRef,
}

impl ClassDescriptor {
    pub(crate) fn new(version: VersionId, class: ClassRef) -> Self {
        Self { version, class }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    /// Fully qualified class name.
    pub fn name(&self) -> &str {
        self.class.name()
    }

    pub fn simple_name(&self) -> &str {
        self.class.simple_name()
    }

    /// The host class behind this descriptor.
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Returns `true` if `object` is an instance of this class.
    pub fn is_instance(&self, object: &ObjectRef) -> bool {
        object.is_instance_of(&self.class)
    }
}

#[derive(Debug, Clone)]
enum Target {
    Field(Field),
    Method(Method),
    Constructor(Constructor),
}

/// A resolved, invocable field, method or constructor.
///
/// The host's visibility check is overridden once, when the handle is
/// created; every later `get`/`set`/`invoke` reuses the opened view. This
/// layer works on the host's private internals on purpose.
#[derive(Debug, Clone)]
pub struct MemberHandle {
    version: VersionId,
    target: Target,
}

impl MemberHandle {
    pub(crate) fn open_field(version: VersionId, mut field: Field) -> Self {
        field.set_accessible(true);
        Self {
            version,
            target: Target::Field(field),
        }
    }

    pub(crate) fn open_method(version: VersionId, mut method: Method) -> Self {
        method.set_accessible(true);
        Self {
            version,
            target: Target::Method(method),
        }
    }

    pub(crate) fn open_constructor(version: VersionId, mut ctor: Constructor) -> Self {
        ctor.set_accessible(true);
        Self {
            version,
            target: Target::Constructor(ctor),
        }
    }

    pub fn kind(&self) -> MemberKind {
        match &self.target {
            Target::Field(_) => MemberKind::Field,
            Target::Method(_) => MemberKind::Method,
            Target::Constructor(_) => MemberKind::Constructor,
        }
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    /// `Owner.member` (constructors render as `Owner.<init>`).
    pub fn qualified(&self) -> String {
        match &self.target {
            Target::Field(f) => f.qualified(),
            Target::Method(m) => m.qualified(),
            Target::Constructor(c) => c.qualified(),
        }
    }

    /// The class that declares the member.
    pub fn owner(&self) -> &ClassRef {
        match &self.target {
            Target::Field(f) => f.owner(),
            Target::Method(m) => m.owner(),
            Target::Constructor(c) => c.owner(),
        }
    }

    /// Whether the visibility override is in place. Always `true` for
    /// handles produced by the symbol table.
    pub fn is_accessible(&self) -> bool {
        match &self.target {
            Target::Field(f) => f.is_accessible(),
            Target::Method(m) => m.is_accessible(),
            Target::Constructor(c) => c.is_accessible(),
        }
    }

    /// Reads a field on `instance`.
    pub fn get(&self, instance: &ObjectRef) -> Result<Value, InvocationError> {
        match &self.target {
            Target::Field(f) => f.get(instance).map_err(|e| self.fault(e)),
            _ => Err(self.wrong_kind("get")),
        }
    }

    /// Assigns a field on `instance`. The value must match the declared
    /// kind exactly.
    pub fn set(&self, instance: &ObjectRef, value: Value) -> Result<(), InvocationError> {
        match &self.target {
            Target::Field(f) => f.set(instance, value).map_err(|e| self.fault(e)),
            _ => Err(self.wrong_kind("set")),
        }
    }

    /// Calls a method on `instance`.
    pub fn invoke(&self, instance: &ObjectRef, args: &[Value]) -> Result<Value, InvocationError> {
        match &self.target {
            Target::Method(m) => m.invoke(instance, args).map_err(|e| self.fault(e)),
            _ => Err(self.wrong_kind("invoke")),
        }
    }

    /// Calls a method and requires an object back.
    ///
    /// `Ok(None)` means the method returned null.
    pub fn invoke_object(
        &self,
        instance: &ObjectRef,
        args: &[Value],
    ) -> Result<Option<ObjectRef>, InvocationError> {
        match self.invoke(instance, args)? {
            Value::Object(obj) => Ok(Some(obj)),
            Value::Null => Ok(None),
            other => Err(InvocationError::UnexpectedReturn {
                member: self.qualified(),
                expected: "Object",
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Allocates a new instance through a constructor handle.
    pub fn construct(&self, args: &[Value]) -> Result<ObjectRef, InvocationError> {
        match &self.target {
            Target::Constructor(c) => c.new_instance(args).map_err(|e| self.fault(e)),
            _ => Err(self.wrong_kind("construct")),
        }
    }

    fn fault(&self, source: HostFault) -> InvocationError {
        InvocationError::Fault {
            member: self.qualified(),
            version: self.version.clone(),
            source,
        }
    }

    fn wrong_kind(&self, operation: &'static str) -> InvocationError {
        InvocationError::WrongMemberKind {
            member: self.qualified(),
            kind: self.kind(),
            operation,
        }
    }
}
