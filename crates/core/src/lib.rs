//! # Crumbtrail Core
//!
//! Breadcrumb-trail resolution over a route hierarchy.
//!
//! ## Features
//!
//! - **Label resolution** - component binding, then route metadata, then name
//! - **Parent resolution** - declared parents, supplied lists, or the matched ancestry chain
//! - **Trail building** - root-first ancestor chains with cycle short-circuiting
//! - **Sessions** - active-route state, dynamic metadata, observer signaling
//!
//! ## Architecture
//!
//! ```text
//! Route (+ matched chain)
//!     │
//!     ├──> Label Resolver
//!     │      ├─ Static binding on deepest matched record
//!     │      ├─ Route metadata breadcrumb
//!     │      └─ Route name / path fallback
//!     │
//!     ├──> Parent Resolver
//!     │      ├─ Declared `parent` (router-resolved, wins unconditionally)
//!     │      ├─ Supplied `parents_list` (used verbatim, reversed once)
//!     │      └─ Matched-chain inference (collapsed paths skip a level)
//!     │
//!     └──> Trail Builder
//!            ├─ Recursive root-first chain
//!            ├─ Seen-set stops cycles and duplicates
//!            └─ Trail { parents, current }
//!
//! TrailSession
//!     ├─ navigate: swap route, drop dynamic overrides, re-pull sources
//!     ├─ refresh: pull dynamic source, merge onto metadata, signal
//!     └─ SignalHub: explicit observer list
//! ```

mod binding;
mod error;
mod label;
mod parent;
mod session;
mod trail;

pub use binding::{BindingRegistry, CrumbBinding, CrumbSource};
pub use error::{Result, TrailError};
pub use label::{effective_breadcrumb, route_label};
pub use parent::{resolve_parent, ParentSource};
pub use session::{SignalHub, TrailObserver, TrailSession};
pub use trail::{Trail, TrailBuilder};
