use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crumbtrail_model::{BreadcrumbMeta, Route};

/// A route-bound entity that computes breadcrumb metadata on demand.
///
/// Any `Fn() -> BreadcrumbMeta` closure qualifies, so dynamic labels can
/// be registered without a named type.
pub trait CrumbSource: Send + Sync {
    fn breadcrumb(&self) -> BreadcrumbMeta;
}

impl<F> CrumbSource for F
where
    F: Fn() -> BreadcrumbMeta + Send + Sync,
{
    fn breadcrumb(&self) -> BreadcrumbMeta {
        self()
    }
}

/// How a route-bound entity supplies breadcrumb metadata: a fixed value
/// consulted during resolution, or a source re-queried on every refresh.
#[derive(Clone)]
pub enum CrumbBinding {
    Static(BreadcrumbMeta),
    Dynamic(Arc<dyn CrumbSource>),
}

impl fmt::Debug for CrumbBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(meta) => f.debug_tuple("Static").field(meta).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").field(&"..").finish(),
        }
    }
}

/// Bindings keyed by route name. Route-bound entities implement
/// [`CrumbSource`] (or hand over a fixed value) and register here;
/// resolution consults the registry instead of reaching into component
/// internals.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<String, CrumbBinding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, route_name: impl Into<String>, binding: CrumbBinding) {
        self.bindings.insert(route_name.into(), binding);
    }

    pub fn bind_static(&mut self, route_name: impl Into<String>, meta: BreadcrumbMeta) {
        self.bind(route_name, CrumbBinding::Static(meta));
    }

    pub fn bind_dynamic(&mut self, route_name: impl Into<String>, source: Arc<dyn CrumbSource>) {
        self.bind(route_name, CrumbBinding::Dynamic(source));
    }

    pub fn unbind(&mut self, route_name: &str) {
        self.bindings.remove(route_name);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Static metadata bound to the route's deepest matched record.
    /// Dynamic bindings never participate directly; their output reaches
    /// route metadata through a session refresh.
    pub fn static_for(&self, route: &Route) -> Option<&BreadcrumbMeta> {
        match self.bindings.get(binding_key(route)?) {
            Some(CrumbBinding::Static(meta)) => Some(meta),
            _ => None,
        }
    }

    pub fn dynamic_for_name(&self, route_name: &str) -> Option<&Arc<dyn CrumbSource>> {
        match self.bindings.get(route_name) {
            Some(CrumbBinding::Dynamic(source)) => Some(source),
            _ => None,
        }
    }
}

fn binding_key(route: &Route) -> Option<&str> {
    route
        .deepest_record()
        .and_then(|record| record.name.as_deref())
        .or(route.name.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbtrail_model::MatchedRecord;

    #[test]
    fn static_binding_is_keyed_by_deepest_record() {
        let mut registry = BindingRegistry::new();
        registry.bind_static("leaf", BreadcrumbMeta::label("Bound"));

        let route = Route::new("/a/b").named("other").with_matched(vec![
            MatchedRecord::new("/a").named("branch"),
            MatchedRecord::new("/a/b").named("leaf"),
        ]);
        assert_eq!(
            registry.static_for(&route).and_then(|m| m.label.as_deref()),
            Some("Bound")
        );
    }

    #[test]
    fn route_name_is_the_fallback_key() {
        let mut registry = BindingRegistry::new();
        registry.bind_static("plain", BreadcrumbMeta::label("Bound"));

        let route = Route::new("/plain").named("plain");
        assert!(registry.static_for(&route).is_some());
    }

    #[test]
    fn dynamic_bindings_do_not_answer_static_lookups() {
        let mut registry = BindingRegistry::new();
        registry.bind_dynamic("leaf", Arc::new(|| BreadcrumbMeta::label("Dyn")));

        let route = Route::new("/leaf").named("leaf");
        assert!(registry.static_for(&route).is_none());
        assert!(registry.dynamic_for_name("leaf").is_some());
    }
}
