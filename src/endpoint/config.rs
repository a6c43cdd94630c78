//! Endpoint configuration builder.
//!
//! Collects the routes an endpoint wants without touching the route table.
//! The registration engine reads it back once and then discards it.

use std::fmt;

use axum::routing::MethodRouter;

/// Hook applied to every route handle produced for an endpoint.
pub type Customizer<S> = Box<dyn Fn(MethodRouter<S>) -> MethodRouter<S>>;

/// One routing intent declared by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDeclaration {
    /// Matches any HTTP method at `pattern`.
    Route { pattern: String },
    /// Matches only the listed methods at `pattern`.
    MethodRoute {
        pattern: String,
        methods: Vec<String>,
    },
    /// Answers every request no other route matched.
    GlobalFallback,
    /// Answers requests at `pattern` that no other route claims.
    FallbackRoute { pattern: String },
}

impl RouteDeclaration {
    /// Position of this kind in the registration sequence.
    fn rank(&self) -> u8 {
        match self {
            RouteDeclaration::Route { .. } => 0,
            RouteDeclaration::MethodRoute { .. } => 1,
            RouteDeclaration::GlobalFallback => 2,
            RouteDeclaration::FallbackRoute { .. } => 3,
        }
    }

    /// The pattern this declaration applies to, if it has one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            RouteDeclaration::Route { pattern }
            | RouteDeclaration::MethodRoute { pattern, .. }
            | RouteDeclaration::FallbackRoute { pattern } => Some(pattern),
            RouteDeclaration::GlobalFallback => None,
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteDeclaration::Route { .. } => "route",
            RouteDeclaration::MethodRoute { .. } => "method_route",
            RouteDeclaration::GlobalFallback => "global_fallback",
            RouteDeclaration::FallbackRoute { .. } => "fallback_route",
        }
    }
}

/// Accumulates the routing intents of one endpoint type.
///
/// Route declarations only ever append. The customization hook is a single
/// slot: the last call to [`customize`](EndpointConfig::customize) wins.
///
/// ```ignore
/// fn configure(&self, config: &mut EndpointConfig<AppState>) {
///     config
///         .map_route("/users")
///         .map_methods("/users/{id}", ["GET", "DELETE"])
///         .customize(|route| route.layer(TimeoutLayer::new(Duration::from_secs(2))));
/// }
/// ```
pub struct EndpointConfig<S> {
    declarations: Vec<RouteDeclaration>,
    customizer: Customizer<S>,
}

impl<S: 'static> EndpointConfig<S> {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            customizer: Box::new(|route: MethodRouter<S>| route),
        }
    }

    /// Maps the endpoint to `pattern` for every HTTP method.
    pub fn map_route(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.declarations.push(RouteDeclaration::Route {
            pattern: pattern.into(),
        });
        self
    }

    /// Maps the endpoint to `pattern` for the given methods only.
    ///
    /// Method names are matched case-insensitively; `http::Method` values
    /// work as well as strings.
    pub fn map_methods<M>(
        &mut self,
        pattern: impl Into<String>,
        methods: impl IntoIterator<Item = M>,
    ) -> &mut Self
    where
        M: AsRef<str>,
    {
        self.declarations.push(RouteDeclaration::MethodRoute {
            pattern: pattern.into(),
            methods: methods
                .into_iter()
                .map(|m| m.as_ref().to_string())
                .collect(),
        });
        self
    }

    /// Makes the endpoint the global fallback. Repeated calls have no effect.
    pub fn map_fallback(&mut self) -> &mut Self {
        if !self.is_global_fallback() {
            self.declarations.push(RouteDeclaration::GlobalFallback);
        }
        self
    }

    /// Maps the endpoint to `pattern` with the lowest priority.
    pub fn map_fallback_at(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.declarations.push(RouteDeclaration::FallbackRoute {
            pattern: pattern.into(),
        });
        self
    }

    /// Replaces the hook applied to every route handle of this endpoint.
    pub fn customize<F>(&mut self, customizer: F) -> &mut Self
    where
        F: Fn(MethodRouter<S>) -> MethodRouter<S> + 'static,
    {
        self.customizer = Box::new(customizer);
        self
    }

    pub fn is_global_fallback(&self) -> bool {
        self.declarations
            .iter()
            .any(|d| matches!(d, RouteDeclaration::GlobalFallback))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in registration order: plain routes, method routes,
    /// global fallback, pattern fallbacks, each kind in declaration order.
    pub fn declarations(&self) -> Vec<&RouteDeclaration> {
        let mut ordered: Vec<&RouteDeclaration> = self.declarations.iter().collect();
        ordered.sort_by_key(|d| d.rank());
        ordered
    }

    pub(crate) fn apply_customizer(&self, route: MethodRouter<S>) -> MethodRouter<S> {
        (self.customizer)(route)
    }
}

impl<S: 'static> Default for EndpointConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for EndpointConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("declarations", &self.declarations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use axum::routing::any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn route(pattern: &str) -> RouteDeclaration {
        RouteDeclaration::Route {
            pattern: pattern.to_string(),
        }
    }

    #[test]
    fn test_routes_accumulate_in_order() {
        let mut config = EndpointConfig::<()>::new();
        config.map_route("/a").map_route("/b").map_route("/a");

        assert_eq!(
            config.declarations(),
            vec![&route("/a"), &route("/b"), &route("/a")]
        );
    }

    #[test]
    fn test_method_route_accepts_strings_and_methods() {
        let mut config = EndpointConfig::<()>::new();
        config
            .map_methods("/a", ["get", "Post"])
            .map_methods("/b", [Method::DELETE]);

        assert_eq!(
            config.declarations(),
            vec![
                &RouteDeclaration::MethodRoute {
                    pattern: "/a".into(),
                    methods: vec!["get".into(), "Post".into()],
                },
                &RouteDeclaration::MethodRoute {
                    pattern: "/b".into(),
                    methods: vec!["DELETE".into()],
                },
            ]
        );
    }

    #[test]
    fn test_global_fallback_is_idempotent() {
        let mut config = EndpointConfig::<()>::new();
        config.map_fallback().map_fallback();

        assert!(config.is_global_fallback());
        assert_eq!(config.declarations().len(), 1);
    }

    #[test]
    fn test_declarations_grouped_by_kind() {
        let mut config = EndpointConfig::<()>::new();
        config
            .map_fallback_at("/f1")
            .map_fallback()
            .map_methods("/m", ["GET"])
            .map_route("/r1")
            .map_fallback_at("/f2")
            .map_route("/r2");

        let kinds: Vec<_> = config
            .declarations()
            .iter()
            .map(|d| (d.kind(), d.pattern().map(str::to_string)))
            .collect();

        assert_eq!(
            kinds,
            vec![
                ("route", Some("/r1".to_string())),
                ("route", Some("/r2".to_string())),
                ("method_route", Some("/m".to_string())),
                ("global_fallback", None),
                ("fallback_route", Some("/f1".to_string())),
                ("fallback_route", Some("/f2".to_string())),
            ]
        );
    }

    #[test]
    fn test_last_customizer_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut config = EndpointConfig::<()>::new();
        let f = first.clone();
        config.customize(move |r| {
            f.fetch_add(1, Ordering::SeqCst);
            r
        });
        let s = second.clone();
        config.customize(move |r| {
            s.fetch_add(1, Ordering::SeqCst);
            r
        });

        let _ = config.apply_customizer(any(|| async {}));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_config_is_empty() {
        let config = EndpointConfig::<()>::default();
        assert!(config.is_empty());
        assert!(!config.is_global_fallback());
    }
}
