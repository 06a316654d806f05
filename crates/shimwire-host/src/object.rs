//! Host objects.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::{ClassDef, ClassRef, Value};

/// Counter for object identities. Process-wide so ids never collide
/// between two hosts living in the same test binary.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a host object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

struct ObjectInner {
    id: ObjectId,
    class: ClassRef,
    /// Field storage keyed by field name. Field names are unique along a
    /// class chain.
    slots: Mutex<HashMap<String, Value>>,
}

/// A shared reference to a live host object.
///
/// Cloning is cheap (an `Arc` bump). Equality is identity: two refs are
/// equal only if they point at the same object.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectInner>);

impl ObjectRef {
    /// Allocates an instance of `class` with every field (including
    /// inherited ones) set to its zero value. No constructor body runs.
    pub fn allocate(class: &ClassRef) -> Self {
        let mut slots = HashMap::new();
        let mut current: Option<&ClassRef> = Some(class);
        while let Some(c) = current {
            for field in c.field_defs() {
                slots
                    .entry(field.name.clone())
                    .or_insert_with(|| Value::default_for(field.kind));
            }
            current = c.superclass();
        }

        Self(Arc::new(ObjectInner {
            id: ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)),
            class: class.clone(),
            slots: Mutex::new(slots),
        }))
    }

    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    /// The runtime class of this object.
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Returns `true` if this object's class is `class` or a subclass of it.
    pub fn is_instance_of(&self, class: &ClassDef) -> bool {
        self.0.class.is_subclass_of(class)
    }

    /// Short description for logs and error messages: `SimpleName@obj-N`.
    pub fn describe(&self) -> String {
        format!("{}@{}", self.0.class.simple_name(), self.0.id)
    }

    /// Reads a slot directly, bypassing member checks.
    ///
    /// This is the host's own access path (method bodies, fixtures); code
    /// outside the host goes through reflective members instead.
    pub fn raw_get(&self, name: &str) -> Option<Value> {
        self.0.slots.lock().get(name).cloned()
    }

    /// Writes a slot directly, bypassing member checks. Returns `false`
    /// if the object has no such slot.
    pub fn raw_set(&self, name: &str, value: Value) -> bool {
        match self.0.slots.lock().get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Appends to a list slot, turning a null slot into a one-element list.
    pub fn raw_push(&self, name: &str, value: Value) -> bool {
        let mut slots = self.0.slots.lock();
        match slots.get_mut(name) {
            Some(Value::List(items)) => {
                items.push(value);
                true
            }
            Some(slot @ Value::Null) => {
                *slot = Value::List(vec![value]);
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValueKind, Visibility};

    fn point_class() -> ClassRef {
        ClassDef::builder("test.Point")
            .field("x", ValueKind::Int, Visibility::Private)
            .field("label", ValueKind::Str, Visibility::Public)
            .build()
    }

    #[test]
    fn test_allocate_sets_zero_values() {
        let obj = ObjectRef::allocate(&point_class());
        assert_eq!(obj.raw_get("x"), Some(Value::Int(0)));
        assert_eq!(obj.raw_get("label"), Some(Value::Null));
    }

    #[test]
    fn test_allocate_includes_inherited_fields() {
        let base = point_class();
        let child = ClassDef::builder("test.Point3")
            .extends(&base)
            .field("z", ValueKind::Int, Visibility::Private)
            .build();
        let obj = ObjectRef::allocate(&child);
        assert!(obj.raw_get("x").is_some());
        assert!(obj.raw_get("z").is_some());
        assert!(obj.is_instance_of(&base));
    }

    #[test]
    fn test_equality_is_identity() {
        let class = point_class();
        let a = ObjectRef::allocate(&class);
        let b = ObjectRef::allocate(&class);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_raw_set_unknown_slot_returns_false() {
        let obj = ObjectRef::allocate(&point_class());
        assert!(!obj.raw_set("nope", Value::Int(1)));
        assert!(obj.raw_set("x", Value::Int(7)));
        assert_eq!(obj.raw_get("x"), Some(Value::Int(7)));
    }

    #[test]
    fn test_raw_push_promotes_null_to_list() {
        let class = ClassDef::builder("test.Bag")
            .field("items", ValueKind::List, Visibility::Private)
            .build();
        let obj = ObjectRef::allocate(&class);
        assert!(obj.raw_push("items", Value::Int(1)));
        assert!(obj.raw_push("items", Value::Int(2)));
        assert_eq!(
            obj.raw_get("items"),
            Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_describe_uses_simple_name() {
        let obj = ObjectRef::allocate(&point_class());
        assert!(obj.describe().starts_with("Point@obj-"));
    }
}
