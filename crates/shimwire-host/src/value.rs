//! Values that flow through fields, arguments and return slots.
//!
//! The host's internals are dynamically shaped from our point of view: we
//! only learn at runtime which fields a class has and what they hold. So
//! every value crossing the boundary is a [`Value`], and every declared
//! shape is a [`ValueKind`].

use std::fmt;

use crate::ObjectRef;

/// A dynamically typed host value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent reference.
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    StrArray(Vec<String>),
    IntArray(Vec<i32>),
    /// A host-side list (heterogeneous, usually of objects).
    List(Vec<Value>),
    /// A reference to a host object.
    Object(ObjectRef),
}

impl Value {
    /// Returns the kind this value would satisfy exactly.
    ///
    /// `Null` reports [`ValueKind::Any`]; whether it is acceptable is
    /// decided by [`ValueKind::accepts`].
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Any,
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Str(_) => ValueKind::Str,
            Value::StrArray(_) => ValueKind::StrArray,
            Value::IntArray(_) => ValueKind::IntArray,
            Value::List(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Human-readable type name, used in fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            other => other.kind().name(),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// The zero value a freshly allocated field of `kind` holds.
    pub fn default_for(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Byte => Value::Byte(0),
            ValueKind::Short => Value::Short(0),
            ValueKind::Int => Value::Int(0),
            ValueKind::Long => Value::Long(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::Str
            | ValueKind::StrArray
            | ValueKind::IntArray
            | ValueKind::List
            | ValueKind::Object
            | ValueKind::Any => Value::Null,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

/// The declared shape of a field, parameter or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Str,
    StrArray,
    IntArray,
    List,
    Object,
    /// Accepts anything, including null (an untyped `Object` slot).
    Any,
}

impl ValueKind {
    /// Returns `true` if `value` may be stored in a slot of this kind.
    ///
    /// Primitive kinds require an exact match; reference kinds also take
    /// `Null`. There is no numeric widening.
    pub fn accepts(self, value: &Value) -> bool {
        if self == ValueKind::Any {
            return true;
        }
        if value.is_null() {
            return self.is_reference();
        }
        value.kind() == self
    }

    /// Reference kinds can hold null.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ValueKind::Str
                | ValueKind::StrArray
                | ValueKind::IntArray
                | ValueKind::List
                | ValueKind::Object
                | ValueKind::Any
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Str => "String",
            ValueKind::StrArray => "String[]",
            ValueKind::IntArray => "int[]",
            ValueKind::List => "List",
            ValueKind::Object => "Object",
            ValueKind::Any => "?",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_primitive_exact_only() {
        assert!(ValueKind::Int.accepts(&Value::Int(3)));
        assert!(!ValueKind::Int.accepts(&Value::Long(3)));
        assert!(!ValueKind::Float.accepts(&Value::Double(1.0)));
    }

    #[test]
    fn test_accepts_null_only_for_references() {
        assert!(ValueKind::Str.accepts(&Value::Null));
        assert!(ValueKind::Object.accepts(&Value::Null));
        assert!(!ValueKind::Int.accepts(&Value::Null));
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(ValueKind::Any.accepts(&Value::Bool(true)));
        assert!(ValueKind::Any.accepts(&Value::Null));
        assert!(ValueKind::Any.accepts(&Value::StrArray(vec![])));
    }

    #[test]
    fn test_default_for_matches_kind() {
        assert_eq!(Value::default_for(ValueKind::Int), Value::Int(0));
        assert_eq!(Value::default_for(ValueKind::Bool), Value::Bool(false));
        assert!(Value::default_for(ValueKind::StrArray).is_null());
    }

    #[test]
    fn test_type_name_null() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Str("x".into()).type_name(), "String");
    }
}
