//! Label → handler bindings.
//!
//! Handlers are boxed closures; whatever arguments the application wants
//! passed are bound at registration time by capturing them. A binding with
//! nothing captured is a bare call.

use alloc::boxed::Box;

use heapless::LinearMap;

use crate::error::{Error, Result};

/// A bound handler.
pub type Handler<'a> = Box<dyn FnMut() + Send + 'a>;

/// Fixed-capacity map from an action label to its handler.
///
/// `N` bounds the number of distinct labels; it is normally the number of
/// variants of `L`.
pub struct CallbackRegistry<'a, L, const N: usize> {
    handlers: LinearMap<L, Handler<'a>, N>,
}

impl<'a, L: Copy + Eq, const N: usize> CallbackRegistry<'a, L, N> {
    pub const fn new() -> Self {
        Self {
            handlers: LinearMap::new(),
        }
    }

    /// Bind `handler` to `label`, replacing any previous binding.
    pub fn register<F>(&mut self, label: L, handler: F) -> Result<()>
    where
        F: FnMut() + Send + 'a,
    {
        self.handlers
            .insert(label, Box::new(handler))
            .map(|_| ())
            .map_err(|_| Error::RegistryFull)
    }

    /// Bind `handler` to `label`, passing it `args` on every invocation.
    pub fn register_with<A, F>(&mut self, label: L, args: A, mut handler: F) -> Result<()>
    where
        A: Send + 'a,
        F: FnMut(&A) + Send + 'a,
    {
        self.register(label, move || handler(&args))
    }

    /// Remove the binding for `label`. Returns whether one existed.
    pub fn unregister(&mut self, label: L) -> bool {
        self.handlers.remove(&label).is_some()
    }

    pub fn is_registered(&self, label: L) -> bool {
        self.handlers.contains_key(&label)
    }

    /// Call the handler bound to `label`.
    ///
    /// Unbound labels are skipped; returns whether a handler ran.
    pub fn invoke(&mut self, label: L) -> bool {
        match self.handlers.get_mut(&label) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<L: Copy + Eq, const N: usize> Default for CallbackRegistry<'_, L, N> {
    fn default() -> Self {
        Self::new()
    }
}
