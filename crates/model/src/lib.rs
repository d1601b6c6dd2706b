//! # Crumbtrail Model
//!
//! Shared data model for breadcrumb-trail resolution.
//!
//! - **Routes** - resolved routes with their matched ancestry chain
//! - **Descriptors** - `{path}` / `{name, params, ...}` resolution targets
//! - **Breadcrumb metadata** - label, parent declaration, supplied parents
//! - **Trail entries** - the `{to, label, utils}` output unit
//!
//! The wire shapes are deliberately looser than the typed shapes: a
//! breadcrumb may be a bare label string, and a `parent` may be a route
//! name or a full descriptor. Malformed values degrade to "absent" with a
//! log line instead of failing the surrounding document.

mod breadcrumb;
mod route;

pub use breadcrumb::{BreadcrumbMeta, ParentSpec, ParentsEntry, TrailEntry};
pub use route::{MatchedRecord, Route, RouteDescriptor, RouteMeta};
