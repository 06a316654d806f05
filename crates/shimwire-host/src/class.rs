//! Classes and their reflective member views.
//!
//! A [`ClassDef`] is the host's description of one internal type. Its
//! members are handed out as *views* ([`Field`], [`Method`],
//! [`Constructor`]). A view starts out closed: if the member is private,
//! every operation through it fails with [`HostFault::IllegalAccess`] until
//! [`set_accessible`](Field::set_accessible) is called on that view. Opening
//! one view never opens another.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{HostFault, ObjectRef, Value, ValueKind};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a class definition.
///
/// Two hosts that both define `PacketPlayOutTabComplete` produce two
/// different ids, which is what keeps members of one release from being
/// applied to objects of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class-{}", self.0)
    }
}

/// Member visibility as declared by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Host-side implementation of a method: `(this, args) -> result`.
pub type MethodBody =
    Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<Value, HostFault> + Send + Sync>;

/// Host-side constructor body, run on a freshly allocated object.
pub type ConstructorBody =
    Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), HostFault> + Send + Sync>;

/// A declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub kind: ValueKind,
    pub visibility: Visibility,
}

/// A declared method.
#[derive(Clone)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<ValueKind>,
    pub returns: ValueKind,
    pub visibility: Visibility,
    body: MethodBody,
}

/// A declared constructor.
#[derive(Clone)]
pub struct ConstructorDef {
    pub params: Vec<ValueKind>,
    pub visibility: Visibility,
    body: Option<ConstructorBody>,
}

/// The host's description of one internal type.
pub struct ClassDef {
    id: ClassId,
    name: String,
    superclass: Option<ClassRef>,
    fields: Vec<Arc<FieldDef>>,
    methods: Vec<Arc<MethodDef>>,
    constructors: Vec<Arc<ConstructorDef>>,
}

impl ClassDef {
    /// Starts defining a class with a fully qualified name.
    pub fn builder(name: impl Into<String>) -> ClassDefBuilder {
        ClassDefBuilder {
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Fully qualified name, e.g. `net.minecraft.server.v1_8_R3.Packet`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part after the last `.`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    /// Fields declared directly on this class.
    pub fn field_defs(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().map(|f| f.as_ref())
    }

    /// Returns `true` if `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &ClassDef) -> bool {
        if self.id == other.id {
            return true;
        }
        let mut current = self.superclass.as_ref();
        while let Some(c) = current {
            if c.id == other.id {
                return true;
            }
            current = c.superclass.as_ref();
        }
        false
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`ClassDef`].
#[derive(Clone, Debug)]
pub struct ClassRef(Arc<ClassDef>);

impl Deref for ClassRef {
    type Target = ClassDef;

    fn deref(&self) -> &ClassDef {
        &self.0
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for ClassRef {}

impl ClassRef {
    /// Finds a field by name on this class or any superclass.
    pub fn field(&self, name: &str) -> Option<Field> {
        self.walk(|class| {
            class
                .fields
                .iter()
                .find(|f| f.name == name)
                .map(|def| Field {
                    owner: class.clone(),
                    def: Arc::clone(def),
                    accessible: false,
                })
        })
    }

    /// Finds a method by name on this class or any superclass.
    ///
    /// With `params`, only an exact parameter list matches; without, the
    /// first method with the name wins.
    pub fn method(&self, name: &str, params: Option<&[ValueKind]>) -> Option<Method> {
        self.walk(|class| {
            class
                .methods
                .iter()
                .find(|m| {
                    m.name == name
                        && params.is_none_or(|p| m.params.as_slice() == p)
                })
                .map(|def| Method {
                    owner: class.clone(),
                    def: Arc::clone(def),
                    accessible: false,
                })
        })
    }

    /// Finds a constructor declared on this exact class.
    pub fn constructor(&self, params: &[ValueKind]) -> Option<Constructor> {
        self.constructors
            .iter()
            .find(|c| c.params.as_slice() == params)
            .map(|def| Constructor {
                owner: self.clone(),
                def: Arc::clone(def),
                accessible: false,
            })
    }

    fn walk<T>(&self, mut probe: impl FnMut(&ClassRef) -> Option<T>) -> Option<T> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(found) = probe(class) {
                return Some(found);
            }
            current = class.superclass();
        }
        None
    }
}

/// Fluent definition of a [`ClassDef`].
pub struct ClassDefBuilder {
    name: String,
    superclass: Option<ClassRef>,
    fields: Vec<Arc<FieldDef>>,
    methods: Vec<Arc<MethodDef>>,
    constructors: Vec<Arc<ConstructorDef>>,
}

impl ClassDefBuilder {
    pub fn extends(mut self, superclass: &ClassRef) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    pub fn field(mut self, name: &str, kind: ValueKind, visibility: Visibility) -> Self {
        self.fields.push(Arc::new(FieldDef {
            name: name.to_string(),
            kind,
            visibility,
        }));
        self
    }

    pub fn method<F>(
        mut self,
        name: &str,
        params: &[ValueKind],
        returns: ValueKind,
        visibility: Visibility,
        body: F,
    ) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<Value, HostFault> + Send + Sync + 'static,
    {
        self.methods.push(Arc::new(MethodDef {
            name: name.to_string(),
            params: params.to_vec(),
            returns,
            visibility,
            body: Arc::new(body),
        }));
        self
    }

    pub fn constructor<F>(mut self, params: &[ValueKind], visibility: Visibility, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), HostFault> + Send + Sync + 'static,
    {
        self.constructors.push(Arc::new(ConstructorDef {
            params: params.to_vec(),
            visibility,
            body: Some(Arc::new(body)),
        }));
        self
    }

    /// Finishes the class. A class with no declared constructor gets a
    /// public no-argument one that leaves every field at its zero value.
    pub fn build(mut self) -> ClassRef {
        if self.constructors.is_empty() {
            self.constructors.push(Arc::new(ConstructorDef {
                params: Vec::new(),
                visibility: Visibility::Public,
                body: None,
            }));
        }
        ClassRef(Arc::new(ClassDef {
            id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
            name: self.name,
            superclass: self.superclass,
            fields: self.fields,
            methods: self.methods,
            constructors: self.constructors,
        }))
    }
}

// ---------------------------------------------------------------------------
// Reflective views
// ---------------------------------------------------------------------------

fn check_access(
    accessible: bool,
    visibility: Visibility,
    member: impl FnOnce() -> String,
) -> Result<(), HostFault> {
    if visibility == Visibility::Private && !accessible {
        return Err(HostFault::IllegalAccess { member: member() });
    }
    Ok(())
}

fn check_target(owner: &ClassRef, target: &ObjectRef) -> Result<(), HostFault> {
    if target.is_instance_of(owner) {
        Ok(())
    } else {
        Err(HostFault::WrongTarget {
            target: target.describe(),
            owner: owner.name().to_string(),
        })
    }
}

fn check_args(member: &str, params: &[ValueKind], args: &[Value]) -> Result<(), HostFault> {
    if params.len() != args.len() {
        return Err(HostFault::ArityMismatch {
            member: member.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }
    for (kind, arg) in params.iter().zip(args) {
        if !kind.accepts(arg) {
            return Err(HostFault::TypeMismatch {
                member: member.to_string(),
                expected: kind.to_string(),
                actual: arg.type_name().to_string(),
            });
        }
    }
    Ok(())
}

/// A reflective view of one field.
#[derive(Clone, Debug)]
pub struct Field {
    owner: ClassRef,
    def: Arc<FieldDef>,
    accessible: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn kind(&self) -> ValueKind {
        self.def.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.def.visibility
    }

    /// The class that declares this field.
    pub fn owner(&self) -> &ClassRef {
        &self.owner
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Overrides (or restores) the visibility check for this view only.
    pub fn set_accessible(&mut self, flag: bool) {
        self.accessible = flag;
    }

    /// `Owner.name`, for messages.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.owner.simple_name(), self.def.name)
    }

    pub fn get(&self, target: &ObjectRef) -> Result<Value, HostFault> {
        check_access(self.accessible, self.def.visibility, || self.qualified())?;
        check_target(&self.owner, target)?;
        Ok(target.raw_get(&self.def.name).unwrap_or(Value::Null))
    }

    pub fn set(&self, target: &ObjectRef, value: Value) -> Result<(), HostFault> {
        check_access(self.accessible, self.def.visibility, || self.qualified())?;
        check_target(&self.owner, target)?;
        if !self.def.kind.accepts(&value) {
            return Err(HostFault::TypeMismatch {
                member: self.qualified(),
                expected: self.def.kind.to_string(),
                actual: value.type_name().to_string(),
            });
        }
        target.raw_set(&self.def.name, value);
        Ok(())
    }
}

/// A reflective view of one method.
#[derive(Clone)]
pub struct Method {
    owner: ClassRef,
    def: Arc<MethodDef>,
    accessible: bool,
}

impl Method {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn params(&self) -> &[ValueKind] {
        &self.def.params
    }

    pub fn returns(&self) -> ValueKind {
        self.def.returns
    }

    pub fn owner(&self) -> &ClassRef {
        &self.owner
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    pub fn set_accessible(&mut self, flag: bool) {
        self.accessible = flag;
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.owner.simple_name(), self.def.name)
    }

    pub fn invoke(&self, target: &ObjectRef, args: &[Value]) -> Result<Value, HostFault> {
        check_access(self.accessible, self.def.visibility, || self.qualified())?;
        check_target(&self.owner, target)?;
        check_args(&self.qualified(), &self.def.params, args)?;
        (self.def.body)(target, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("member", &self.qualified())
            .field("params", &self.def.params)
            .field("accessible", &self.accessible)
            .finish()
    }
}

/// A reflective view of one constructor.
#[derive(Clone)]
pub struct Constructor {
    owner: ClassRef,
    def: Arc<ConstructorDef>,
    accessible: bool,
}

impl Constructor {
    pub fn params(&self) -> &[ValueKind] {
        &self.def.params
    }

    pub fn owner(&self) -> &ClassRef {
        &self.owner
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    pub fn set_accessible(&mut self, flag: bool) {
        self.accessible = flag;
    }

    pub fn qualified(&self) -> String {
        format!("{}.<init>", self.owner.simple_name())
    }

    /// Allocates an instance and runs the constructor body on it.
    pub fn new_instance(&self, args: &[Value]) -> Result<ObjectRef, HostFault> {
        check_access(self.accessible, self.def.visibility, || self.qualified())?;
        check_args(&self.qualified(), &self.def.params, args)?;
        let object = ObjectRef::allocate(&self.owner);
        if let Some(body) = &self.def.body {
            body(&object, args)?;
        }
        Ok(object)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("member", &self.qualified())
            .field("params", &self.def.params)
            .field("accessible", &self.accessible)
            .finish()
    }
}
