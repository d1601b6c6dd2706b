use crumbtrail_model::{Route, RouteDescriptor};

use crate::error::Result;

/// The single capability trail resolution needs from a router: turn a
/// `{path}` or `{name, params, ...}` descriptor into a resolved route
/// whose `matched` field carries the root-first ancestry chain.
pub trait RouteResolver: Send + Sync {
    fn resolve(&self, spec: &RouteDescriptor) -> Result<Route>;
}
