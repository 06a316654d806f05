//! Host runtime boundary for Shimwire.
//!
//! Everything above this crate talks to the host application through the
//! [`HostRuntime`] trait and the reflective object model defined here:
//!
//! - **Values** ([`Value`], [`ValueKind`]) — what fields and arguments hold.
//! - **Objects** ([`ObjectRef`]) — live host instances.
//! - **Classes** ([`ClassDef`], [`ClassRef`]) and their member views
//!   ([`Field`], [`Method`], [`Constructor`]).
//! - **Faults** ([`HostFault`]) — what the host reports when a member
//!   cannot be applied.
//!
//! # Feature Flags
//!
//! - `memory` (default) — [`memory::MemoryHost`], an in-process host with a
//!   reference release layout, used by tests and demos.

mod class;
mod error;
mod object;
mod value;

#[cfg(feature = "memory")]
pub mod memory;

pub use class::{
    ClassDef, ClassDefBuilder, ClassId, ClassRef, Constructor, ConstructorBody, Field, FieldDef,
    Method, MethodBody, Visibility,
};
pub use error::HostFault;
pub use object::{ObjectId, ObjectRef};
pub use value::{Value, ValueKind};

/// The live host application, as seen from the plugin.
///
/// Implementations must be shareable across the host's threads: the main
/// simulation thread and asynchronous task threads may call in at once.
pub trait HostRuntime: Send + Sync + 'static {
    /// The package/namespace of the host's live implementation object,
    /// e.g. `org.bukkit.craftbukkit.v1_8_R3`. `None` if it cannot be read.
    fn implementation_namespace(&self) -> Option<String>;

    /// Looks up an internal class by fully qualified name.
    ///
    /// This is the expensive, uncached primitive; callers are expected to
    /// cache its outcome.
    fn find_class(&self, qualified_name: &str) -> Option<ClassRef>;

    /// Snapshot of the currently connected clients' public objects.
    fn online_clients(&self) -> Vec<ObjectRef>;
}
