//! # Channel kind identity.
//!
//! A [`ChannelKind`] names the "kind" of a channel. It replaces per-type static state:
//! the listener registry and trace records are keyed by kind, and any number of channel
//! instances may share one kind (all `i32` score channels, for example).

use std::fmt;
use std::sync::Arc;

/// Stable identity of a channel kind.
///
/// Equality, ordering and hashing use the name only.
///
/// ## Example
/// ```rust
/// use eventscope::ChannelKind;
///
/// let a = ChannelKind::named("PlayerDied");
/// let b = ChannelKind::named("PlayerDied");
/// assert_eq!(a, b);
/// assert_eq!(ChannelKind::of::<u32>().name(), "u32");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKind {
    name: Arc<str>,
}

impl ChannelKind {
    /// Creates a kind with an explicit name.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a kind named after the payload type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// Full kind name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment of the name (`alloc::string::String` → `String`).
    ///
    /// Generic arguments are kept as written.
    pub fn short_name(&self) -> &str {
        let head = self.name.split('<').next().unwrap_or(&self.name);
        match head.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => &self.name,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelKind({})", self.name)
    }
}

impl From<&'static str> for ChannelKind {
    fn from(name: &'static str) -> Self {
        Self::named(name)
    }
}
