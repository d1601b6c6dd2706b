use std::sync::{Arc, Weak};

use crumbtrail_model::{BreadcrumbMeta, ParentSpec, Route, RouteDescriptor, TrailEntry};
use crumbtrail_router::RouteResolver;

use crate::binding::{BindingRegistry, CrumbSource};
use crate::error::Result;
use crate::label::route_label;
use crate::trail::{Trail, TrailBuilder};

/// Notified whenever a session's trail may have changed.
pub trait TrailObserver: Send + Sync {
    fn trail_changed(&self);
}

/// Explicit observer list standing in for a global event bus. Holds weak
/// handles; dropped observers are pruned on notify.
#[derive(Default)]
pub struct SignalHub {
    observers: Vec<Weak<dyn TrailObserver>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<O: TrailObserver + 'static>(&mut self, observer: &Arc<O>) {
        let observer: Arc<dyn TrailObserver> = observer.clone();
        let weak: Weak<dyn TrailObserver> = Arc::downgrade(&observer);
        self.observers.push(weak);
    }

    pub fn notify(&mut self) {
        self.observers.retain(|observer| match observer.upgrade() {
            Some(observer) => {
                observer.trail_changed();
                true
            }
            None => false,
        });
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

/// Active-route state plus the dynamic metadata machinery.
///
/// Two events reach a session: `navigate` (route change) and `refresh`
/// (a dynamic source's output changed). Both may fire in the same update
/// cycle; they are processed in arrival order, and `navigate` clears the
/// dynamic overrides before `refresh` repopulates them, so either
/// interleaving converges once both have run.
pub struct TrailSession {
    router: Arc<dyn RouteResolver>,
    bindings: BindingRegistry,
    current: Route,
    dynamic_parents: Vec<TrailEntry>,
    label_override: Option<String>,
    signals: SignalHub,
}

impl TrailSession {
    pub fn new(
        router: Arc<dyn RouteResolver>,
        bindings: BindingRegistry,
        start: &RouteDescriptor,
    ) -> Result<Self> {
        let current = router.resolve(start)?;
        let mut session = Self {
            router,
            bindings,
            current,
            dynamic_parents: Vec::new(),
            label_override: None,
            signals: SignalHub::new(),
        };
        session.refresh();
        Ok(session)
    }

    pub fn current_route(&self) -> &Route {
        &self.current
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    pub fn subscribe<O: TrailObserver + 'static>(&mut self, observer: &Arc<O>) {
        self.signals.subscribe(observer);
    }

    /// Register a fixed binding and signal; the trail may change without
    /// a dynamic pull.
    pub fn bind_static(&mut self, route_name: impl Into<String>, meta: BreadcrumbMeta) {
        self.bindings.bind_static(route_name, meta);
        self.signals.notify();
    }

    /// Register a dynamic source and immediately fold its output in,
    /// mirroring an immediate watcher.
    pub fn bind_dynamic(&mut self, route_name: impl Into<String>, source: Arc<dyn CrumbSource>) {
        self.bindings.bind_dynamic(route_name, source);
        self.refresh();
    }

    /// Route change: swap the active route, drop the dynamic overrides,
    /// re-pull dynamic sources for the new route.
    pub fn navigate(&mut self, spec: &RouteDescriptor) -> Result<()> {
        self.current = self.router.resolve(spec)?;
        self.dynamic_parents.clear();
        self.label_override = None;
        self.refresh();
        Ok(())
    }

    /// Pull the dynamic source bound to the deepest active record, merge
    /// its output onto the active route's metadata, re-derive the
    /// overrides, and signal.
    pub fn refresh(&mut self) {
        if let Some(update) = self.pull_dynamic() {
            let crumb = self
                .current
                .meta
                .breadcrumb
                .get_or_insert_with(BreadcrumbMeta::default);
            crumb.merge_from(&update);
            let parents_list = crumb.parents_list.clone();
            let parent = crumb.parent.clone();

            if let Some(list) = parents_list {
                let builder = TrailBuilder::new(self.router.as_ref(), &self.bindings);
                self.dynamic_parents = builder.supplied_entries(&list);
                // A companion `parent` next to a supplied list overrides
                // the label of the current crumb.
                if let Some(parent) = parent {
                    self.label_override = Some(self.parent_label(&parent));
                }
            }
        }
        self.signals.notify();
    }

    /// Current trail. Dynamic overrides, when present, win over the
    /// computed chain.
    pub fn trail(&self) -> Trail {
        let builder = TrailBuilder::new(self.router.as_ref(), &self.bindings);
        let mut trail = if self.dynamic_parents.is_empty() {
            builder.trail(&self.current)
        } else {
            Trail {
                parents: self.dynamic_parents.clone(),
                current: builder.entry(&self.current),
            }
        };
        if let Some(label) = &self.label_override {
            trail.current.label = label.clone();
        }
        trail
    }

    fn pull_dynamic(&self) -> Option<BreadcrumbMeta> {
        self.current.matched.iter().rev().find_map(|record| {
            let name = record.name.as_deref()?;
            let source = self.bindings.dynamic_for_name(name)?;
            Some(source.breadcrumb())
        })
    }

    fn parent_label(&self, parent: &ParentSpec) -> String {
        match self.router.resolve(&parent.descriptor()) {
            Ok(route) => route_label(&route, &self.bindings),
            Err(_) => parent.descriptor().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbtrail_model::{ParentsEntry, RouteMeta};
    use crumbtrail_router::{RouteDef, RouteTable};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingObserver(AtomicUsize);

    impl TrailObserver for CountingObserver {
        fn trail_changed(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn site_router() -> Arc<RouteTable> {
        Arc::new(
            RouteTable::new(vec![RouteDef::new("/")
                .named("home")
                .meta(RouteMeta::with_breadcrumb(BreadcrumbMeta::label("Home")))
                .children(vec![RouteDef::new("library")
                    .named("library")
                    .meta(RouteMeta::with_breadcrumb(BreadcrumbMeta::label("Library")))
                    .children(vec![RouteDef::new("article").named("article")])])])
            .unwrap(),
        )
    }

    #[test]
    fn session_builds_the_computed_trail_by_default() {
        let session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/library/article"),
        )
        .unwrap();

        assert_eq!(session.trail().labels(), vec!["Home", "Library", "article"]);
    }

    #[test]
    fn dynamic_source_overrides_the_label() {
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/library/article"),
        )
        .unwrap();
        session.bind_dynamic("article", Arc::new(|| BreadcrumbMeta::label("Fresh Title")));

        assert_eq!(
            session.trail().labels(),
            vec!["Home", "Library", "Fresh Title"]
        );
    }

    #[test]
    fn dynamic_parents_list_replaces_the_computed_chain() {
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/library/article"),
        )
        .unwrap();
        session.bind_dynamic(
            "article",
            Arc::new(|| {
                BreadcrumbMeta::default().with_parents_list(vec![
                    ParentsEntry::new(RouteDescriptor::path("/x")).labeled("X"),
                    ParentsEntry::new(RouteDescriptor::path("/y")).labeled("Y"),
                ])
            }),
        );

        let trail = session.trail();
        let labels: Vec<&str> = trail.parents.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Y", "X"]);
    }

    #[test]
    fn companion_parent_overrides_the_current_label() {
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/library/article"),
        )
        .unwrap();
        session.bind_dynamic(
            "article",
            Arc::new(|| {
                BreadcrumbMeta::default()
                    .with_parents_list(vec![
                        ParentsEntry::new(RouteDescriptor::path("/x")).labeled("X")
                    ])
                    .with_parent(ParentSpec::Name("library".into()))
            }),
        );

        assert_eq!(session.trail().current.label, "Library");
    }

    #[test]
    fn navigate_clears_dynamic_overrides() {
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/library/article"),
        )
        .unwrap();
        session.bind_dynamic(
            "article",
            Arc::new(|| {
                BreadcrumbMeta::default().with_parents_list(vec![
                    ParentsEntry::new(RouteDescriptor::path("/x")).labeled("X"),
                ])
            }),
        );
        assert_eq!(session.trail().parents.len(), 1);

        session.navigate(&RouteDescriptor::path("/library")).unwrap();
        assert_eq!(session.trail().labels(), vec!["Home", "Library"]);
    }

    #[test]
    fn refresh_after_navigate_repopulates_overrides() {
        // Route-change and breadcrumb-change firing in the same cycle:
        // arrival order, navigate clears, refresh repopulates.
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/"),
        )
        .unwrap();
        session.bind_dynamic(
            "article",
            Arc::new(|| {
                BreadcrumbMeta::default().with_parents_list(vec![
                    ParentsEntry::new(RouteDescriptor::path("/x")).labeled("X"),
                ])
            }),
        );
        assert!(session.trail().parents.is_empty());

        session
            .navigate(&RouteDescriptor::path("/library/article"))
            .unwrap();
        session.refresh();

        let trail = session.trail();
        assert_eq!(trail.parents.len(), 1);
        assert_eq!(trail.parents[0].label, "X");
    }

    #[test]
    fn observers_are_notified_and_pruned() {
        let mut session = TrailSession::new(
            site_router(),
            BindingRegistry::new(),
            &RouteDescriptor::path("/"),
        )
        .unwrap();

        let observer = Arc::new(CountingObserver(AtomicUsize::new(0)));
        session.subscribe(&observer);
        session.refresh();
        assert_eq!(observer.0.load(Ordering::SeqCst), 1);

        session.navigate(&RouteDescriptor::path("/library")).unwrap();
        assert_eq!(observer.0.load(Ordering::SeqCst), 2);

        drop(observer);
        session.refresh();
        assert_eq!(session.signals.observer_count(), 0);
    }
}
