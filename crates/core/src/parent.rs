use crumbtrail_model::{ParentsEntry, Route, RouteDescriptor};
use crumbtrail_router::RouteResolver;

use crate::binding::BindingRegistry;
use crate::label::effective_breadcrumb;

/// Where a route's parent comes from, in precedence order.
#[derive(Debug)]
pub enum ParentSource {
    /// Declared via breadcrumb `parent`, resolved through the router
    Explicit(Route),
    /// Declared via breadcrumb `parents_list`, used verbatim
    Supplied(Vec<ParentsEntry>),
    /// Inferred from the matched ancestry chain
    Matched(Route),
    /// No parent; the route is a trail root
    Root,
}

/// Resolve a route's logical parent.
///
/// A declared `parent` wins unconditionally; a supplied `parents_list`
/// comes next; otherwise the matched ancestry chain is consulted. A
/// declared parent the router cannot resolve demotes the route to a root
/// rather than failing resolution.
pub fn resolve_parent(
    route: &Route,
    bindings: &BindingRegistry,
    router: &dyn RouteResolver,
) -> ParentSource {
    if let Some(crumb) = effective_breadcrumb(route, bindings) {
        if crumb.parent.is_some() && crumb.parents_list.is_some() {
            log::warn!(
                "route `{}` declares both `parent` and `parentsList`; using `parent`",
                route.display_name()
            );
        }
        if let Some(parent) = &crumb.parent {
            return match router.resolve(&parent.descriptor()) {
                Ok(resolved) => ParentSource::Explicit(resolved),
                Err(err) => {
                    log::warn!(
                        "cannot resolve declared parent of `{}`: {err}; treating it as a root",
                        route.display_name()
                    );
                    ParentSource::Root
                }
            };
        }
        if let Some(list) = &crumb.parents_list {
            return ParentSource::Supplied(list.clone());
        }
    }

    if route.matched.len() > 1 {
        match matched_parent(route, router) {
            Some(parent) => ParentSource::Matched(parent),
            None => ParentSource::Root,
        }
    } else {
        ParentSource::Root
    }
}

/// Second-to-last matched record, stepping back one further level when
/// the router collapsed nested segments onto the route's own path.
fn matched_parent(route: &Route, router: &dyn RouteResolver) -> Option<Route> {
    let depth = route.matched.len();
    let candidate = resolve_record(route, depth.checked_sub(2)?, router)?;
    if candidate.path == route.path {
        resolve_record(route, depth.checked_sub(3)?, router)
    } else {
        Some(candidate)
    }
}

fn resolve_record(route: &Route, index: usize, router: &dyn RouteResolver) -> Option<Route> {
    let record = route.matched.get(index)?;
    let path = if record.path.is_empty() {
        "/"
    } else {
        record.path.as_str()
    };
    match router.resolve(&RouteDescriptor::path(path)) {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            log::warn!(
                "cannot resolve matched ancestor `{path}` of `{}`: {err}",
                route.display_name()
            );
            None
        }
    }
}
