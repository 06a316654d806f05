//! Version-adaptive symbol resolution for Shimwire.
//!
//! The host's internal classes change names and shapes between releases,
//! so nothing here is linked at compile time. Instead, symbols are looked
//! up by name at runtime and cached per release:
//!
//! - **Version** ([`VersionId`], [`VersionResolver`]) — which release is
//!   running, detected once.
//! - **Symbol table** ([`SymbolTable`]) — append-only cache keyed by
//!   (version, name, signature). Failures are cached too.
//! - **Member handles** ([`MemberHandle`]) — resolved fields, methods and
//!   constructors with the visibility override already applied.
//! - **Resolver** ([`Resolver`]) — the three above bundled for one host.
//!
//! # How it fits in the stack
//!
//! ```text
//! Protocol / Dispatch (above)  ← build and send message objects
//!     ↕
//! Symbols (this crate)         ← find classes and members by name
//!     ↕
//! Host (below)                 ← the live object graph
//! ```

mod error;
mod handle;
mod names;
mod resolver;
mod table;
mod version;

pub use error::{InvocationError, ResolutionError};
pub use handle::{ClassDescriptor, MemberHandle, MemberKind};
pub use names::{Namespace, NamespaceConfig, Signature};
pub use resolver::{Resolver, SymbolConfig};
pub use table::{SymbolStats, SymbolTable};
pub use version::{VersionId, VersionResolver, detect_version};
