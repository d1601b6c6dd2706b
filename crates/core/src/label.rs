use crumbtrail_model::{BreadcrumbMeta, Route};

use crate::binding::BindingRegistry;

/// Effective breadcrumb metadata for a route: a static binding on the
/// deepest matched record overrides route metadata wholesale.
pub fn effective_breadcrumb<'a>(
    route: &'a Route,
    bindings: &'a BindingRegistry,
) -> Option<&'a BreadcrumbMeta> {
    bindings.static_for(route).or(route.meta.breadcrumb.as_ref())
}

/// Display label for a route: effective breadcrumb label when present,
/// otherwise the route's name, otherwise its path.
pub fn route_label(route: &Route, bindings: &BindingRegistry) -> String {
    effective_breadcrumb(route, bindings)
        .and_then(|crumb| crumb.label.clone())
        .unwrap_or_else(|| route.display_name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbtrail_model::{MatchedRecord, RouteMeta};
    use pretty_assertions::assert_eq;

    fn leaf_route(meta: RouteMeta) -> Route {
        Route::new("/library/shelf")
            .named("shelf")
            .with_matched(vec![
                MatchedRecord::new("/library").named("library"),
                MatchedRecord::new("/library/shelf").named("shelf"),
            ])
            .with_meta(meta)
    }

    #[test]
    fn static_binding_beats_route_metadata() {
        let mut bindings = BindingRegistry::new();
        bindings.bind_static("shelf", BreadcrumbMeta::label("From Binding"));

        let route = leaf_route(RouteMeta::with_breadcrumb(BreadcrumbMeta::label("From Meta")));
        assert_eq!(route_label(&route, &bindings), "From Binding");
    }

    #[test]
    fn metadata_label_beats_route_name() {
        let bindings = BindingRegistry::new();
        let route = leaf_route(RouteMeta::with_breadcrumb(BreadcrumbMeta::label("From Meta")));
        assert_eq!(route_label(&route, &bindings), "From Meta");
    }

    #[test]
    fn name_is_the_default_label() {
        let bindings = BindingRegistry::new();
        let route = leaf_route(RouteMeta::default());
        assert_eq!(route_label(&route, &bindings), "shelf");
    }

    #[test]
    fn path_is_the_last_fallback() {
        let bindings = BindingRegistry::new();
        let route = Route::new("/anonymous");
        assert_eq!(route_label(&route, &bindings), "/anonymous");
    }

    #[test]
    fn binding_without_label_does_not_mask_the_name() {
        let mut bindings = BindingRegistry::new();
        bindings.bind_static("shelf", BreadcrumbMeta::default());

        let route = leaf_route(RouteMeta::default());
        assert_eq!(route_label(&route, &bindings), "shelf");
    }
}
