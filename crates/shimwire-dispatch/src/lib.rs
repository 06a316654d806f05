//! Message delivery for Shimwire.
//!
//! A client's public object does not expose its network connection. The
//! [`Dispatcher`] reaches it through the host's private layout on every
//! call and never keeps a reference to a client or its connection.
//!
//! ```text
//! client ──getHandle()──→ internal player ──playerConnection──→ conduit
//!                                                                 └─ sendPacket(message)
//! ```

mod dispatcher;
mod error;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::DispatchError;
