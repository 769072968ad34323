//! Measure naming

use std::fmt;
use std::sync::Arc;

/// Caller-supplied function deriving a measure name from props and state.
///
/// Invoked once per render cycle, after the cycle's props/state have been
/// applied. A panicking naming function is not caught.
pub struct NamingFn<P, S>(Arc<dyn Fn(&P, &S) -> String + Send + Sync>);

impl<P, S> NamingFn<P, S> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&P, &S) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, props: &P, state: &S) -> String {
        (self.0)(props, state)
    }
}

impl<P, S> Clone for NamingFn<P, S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P, S> fmt::Debug for NamingFn<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NamingFn(..)")
    }
}

/// Resolve the measure name for one render cycle.
///
/// Returns the naming function's output verbatim when one is given,
/// otherwise `fallback`.
pub fn resolve_name<P, S>(
    naming: Option<&NamingFn<P, S>>,
    props: &P,
    state: &S,
    fallback: &str,
) -> String {
    match naming {
        Some(naming) => naming.call(props, state),
        None => fallback.to_string(),
    }
}

/// A component type's declared name plus its optional naming function.
pub struct NameResolver<P, S> {
    fallback: String,
    naming: Option<NamingFn<P, S>>,
}

impl<P, S> Clone for NameResolver<P, S> {
    fn clone(&self) -> Self {
        Self {
            fallback: self.fallback.clone(),
            naming: self.naming.clone(),
        }
    }
}

impl<P, S> fmt::Debug for NameResolver<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameResolver")
            .field("fallback", &self.fallback)
            .field("naming", &self.naming)
            .finish()
    }
}

impl<P, S> NameResolver<P, S> {
    pub fn new(fallback: impl Into<String>, naming: Option<NamingFn<P, S>>) -> Self {
        Self {
            fallback: fallback.into(),
            naming,
        }
    }

    /// The declared name used when no naming function is set.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn has_naming_fn(&self) -> bool {
        self.naming.is_some()
    }

    pub fn resolve(&self, props: &P, state: &S) -> String {
        resolve_name(self.naming.as_ref(), props, state, &self.fallback)
    }
}
