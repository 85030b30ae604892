//! Hub core: shared infrastructure and lifecycle.
//!
//! The only public API from this module is [`Hub`] and its [`HubBuilder`].
//!
//! Internal modules:
//! - [`hub`]: owns the watcher, registry, dispatcher and trace forwarding;
//! - [`builder`]: wires the components together from a [`Config`](crate::Config).

mod builder;
mod hub;

pub use builder::HubBuilder;
pub use hub::Hub;
