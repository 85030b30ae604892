//! Main-thread dispatch.
//!
//! [`Dispatcher`] is the one structure in the crate with cross-thread handoff: any
//! thread may `invoke`, only the designated thread runs queued actions. Channels never
//! marshal on their own; a producer that needs delivery on the designated thread routes
//! its `raise` through the dispatcher.
//!
//! ```text
//! worker ── dispatcher.invoke(move || channel.raise(v)) ──► queue ──► tick() on main
//! ```

mod dispatcher;

pub use dispatcher::{Dispatcher, InitPolicy};
