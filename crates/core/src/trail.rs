use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crumbtrail_model::{ParentsEntry, Route, TrailEntry};
use crumbtrail_router::RouteResolver;

use crate::binding::BindingRegistry;
use crate::label::{effective_breadcrumb, route_label};
use crate::parent::{resolve_parent, ParentSource};

/// A fully resolved trail: root-first ancestors plus the current crumb.
/// This is the only data a rendering layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub parents: Vec<TrailEntry>,
    pub current: TrailEntry,
}

impl Trail {
    /// Labels in render order, current crumb last.
    pub fn labels(&self) -> Vec<&str> {
        self.parents
            .iter()
            .map(|entry| entry.label.as_str())
            .chain(std::iter::once(self.current.label.as_str()))
            .collect()
    }
}

/// Builds trails by walking parent resolution from a route to its root.
/// A pure function of the route and the registered bindings: resolving
/// the same route twice yields the same trail.
pub struct TrailBuilder<'a> {
    router: &'a dyn RouteResolver,
    bindings: &'a BindingRegistry,
}

impl<'a> TrailBuilder<'a> {
    pub fn new(router: &'a dyn RouteResolver, bindings: &'a BindingRegistry) -> Self {
        Self { router, bindings }
    }

    pub fn trail(&self, route: &Route) -> Trail {
        Trail {
            parents: self.ancestors(route),
            current: self.entry(route),
        }
    }

    /// Root-first ancestor entries for a route.
    pub fn ancestors(&self, route: &Route) -> Vec<TrailEntry> {
        let mut seen = HashSet::new();
        seen.insert(route.path.clone());
        self.chain(route, &mut seen)
    }

    /// The crumb for a single route.
    pub fn entry(&self, route: &Route) -> TrailEntry {
        TrailEntry {
            to: route.descriptor(),
            label: route_label(route, self.bindings),
            utils: effective_breadcrumb(route, self.bindings).and_then(|crumb| crumb.utils.clone()),
        }
    }

    fn chain(&self, route: &Route, seen: &mut HashSet<String>) -> Vec<TrailEntry> {
        match resolve_parent(route, self.bindings, self.router) {
            ParentSource::Supplied(list) => self.supplied_entries(&list),
            ParentSource::Explicit(parent) | ParentSource::Matched(parent) => {
                // Seen paths end the walk: covers a parent resolving to
                // itself as well as longer resolver cycles.
                if !seen.insert(parent.path.clone()) {
                    return Vec::new();
                }
                let mut entries = self.chain(&parent, seen);
                entries.push(self.entry(&parent));
                entries
            }
            ParentSource::Root => Vec::new(),
        }
    }

    /// Supplied lists arrive leaf-to-root; reverse once into trail order.
    /// Entries without a pre-resolved label are labeled through the
    /// router when possible.
    pub fn supplied_entries(&self, list: &[ParentsEntry]) -> Vec<TrailEntry> {
        list.iter()
            .rev()
            .map(|entry| self.supplied_entry(entry))
            .collect()
    }

    fn supplied_entry(&self, entry: &ParentsEntry) -> TrailEntry {
        let label = entry.label.clone().or_else(|| {
            self.router
                .resolve(&entry.to)
                .ok()
                .map(|route| route_label(&route, self.bindings))
        });
        TrailEntry {
            to: entry.to.clone(),
            label: label.unwrap_or_else(|| entry.to.to_string()),
            utils: entry.utils.clone(),
        }
    }
}
