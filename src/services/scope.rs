//! Resolution scopes.

use std::any::type_name;
use std::fmt;

use axum::extract::FromRef;
use axum::http::Extensions;

use super::{DependencySource, Resolve, ResolveError};

/// Which phase a scope was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Opened once per registration call, detached from any request.
    Registration,
    /// Opened for a single incoming request.
    Request,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Registration => f.write_str("registration"),
            ScopeKind::Request => f.write_str("request"),
        }
    }
}

/// A resolution context handed to [`Resolve::resolve`].
///
/// Borrows the router state for app-wide services and owns the
/// request-lifetime values, so nothing resolved from one scope is visible
/// to another.
pub struct Scope<'a, S> {
    services: &'a S,
    extensions: Extensions,
    kind: ScopeKind,
}

impl<'a, S: DependencySource> Scope<'a, S> {
    /// Opens a scope that is not tied to any request.
    pub fn detached(services: &'a S) -> Self {
        let mut extensions = Extensions::new();
        services.populate_scope(&mut extensions);

        Self {
            services,
            extensions,
            kind: ScopeKind::Registration,
        }
    }

    /// Opens a scope for one request.
    ///
    /// Values already attached to the request (for example by middleware)
    /// take precedence over the seeded ones.
    pub fn for_request(services: &'a S, request: &Extensions) -> Self {
        let mut extensions = Extensions::new();
        services.populate_scope(&mut extensions);
        extensions.extend(request.clone());

        Self {
            services,
            extensions,
            kind: ScopeKind::Request,
        }
    }
}

impl<'a, S> Scope<'a, S> {
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The router state backing this scope.
    pub fn services(&self) -> &'a S {
        self.services
    }

    /// Request-lifetime values visible in this scope.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Resolves an app-wide service out of the router state.
    pub fn service<T>(&self) -> T
    where
        T: FromRef<S>,
    {
        T::from_ref(self.services)
    }

    /// Resolves a request-lifetime value.
    pub fn scoped<T>(&self) -> Result<T, ResolveError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions
            .get::<T>()
            .cloned()
            .ok_or(ResolveError::Missing {
                type_name: type_name::<T>(),
                scope: self.kind,
            })
    }

    /// Constructs `T`, recursively resolving its own dependencies.
    pub fn resolve<T>(&self) -> Result<T, ResolveError>
    where
        T: Resolve<S>,
    {
        T::resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct ScopeId(u64);

    #[derive(Clone, Debug, PartialEq)]
    struct Tenant(&'static str);

    #[derive(Clone, Default)]
    struct Services {
        next_scope: Arc<AtomicU64>,
    }

    impl DependencySource for Services {
        fn populate_scope(&self, extensions: &mut Extensions) {
            let id = self.next_scope.fetch_add(1, Ordering::SeqCst);
            extensions.insert(ScopeId(id));
            extensions.insert(Tenant("default"));
        }
    }

    struct Counter(Arc<AtomicU64>);

    impl FromRef<Services> for Counter {
        fn from_ref(services: &Services) -> Self {
            Counter(services.next_scope.clone())
        }
    }

    #[test]
    fn test_detached_scope_is_seeded() {
        let services = Services::default();
        let scope = Scope::detached(&services);

        assert_eq!(scope.kind(), ScopeKind::Registration);
        assert_eq!(scope.scoped::<ScopeId>().unwrap(), ScopeId(0));
    }

    #[test]
    fn test_each_scope_gets_fresh_values() {
        let services = Services::default();
        let first = Scope::detached(&services);
        let second = Scope::for_request(&services, &Extensions::new());

        assert_ne!(
            first.scoped::<ScopeId>().unwrap(),
            second.scoped::<ScopeId>().unwrap()
        );
        assert_eq!(second.kind(), ScopeKind::Request);
    }

    #[test]
    fn test_request_values_override_seeded_values() {
        let services = Services::default();
        let mut request = Extensions::new();
        request.insert(Tenant("acme"));

        let scope = Scope::for_request(&services, &request);
        assert_eq!(scope.scoped::<Tenant>().unwrap(), Tenant("acme"));
    }

    #[test]
    fn test_missing_scoped_value() {
        let scope = Scope::detached(&());
        let err = scope.scoped::<Tenant>().unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Missing {
                scope: ScopeKind::Registration,
                ..
            }
        ));
        assert!(err.to_string().contains("Tenant"));
    }

    #[test]
    fn test_service_from_state() {
        let services = Services::default();
        let scope = Scope::detached(&services);
        let Counter(counter) = scope.service::<Counter>();

        assert!(Arc::ptr_eq(&counter, &services.next_scope));
    }

    #[test]
    fn test_default_types_resolve_without_impl() {
        #[derive(Default, Debug, PartialEq)]
        struct Stateless;

        let scope = Scope::detached(&());
        assert_eq!(scope.resolve::<Stateless>().unwrap(), Stateless);
    }
}
