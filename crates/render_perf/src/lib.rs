//! Render Performance Instrumentation
//!
//! This crate wraps a component type so that every render cycle (the initial
//! mount and every update) is bracketed with timing marks:
//! - a start mark `<Name>-<cycle>-start` before the cycle's first hook
//! - an end mark `<Name>-<cycle>-end` after the cycle's last hook
//! - one measure spanning the two, named by an optional naming function or
//!   by the component's declared name
//!
//! Each cycle mints its own [`CycleId`], so instances rendering side by side
//! never pair each other's marks.
//!
//! # Example
//!
//! ```rust
//! use component_model::{Class, Component, ComponentResult, Mounted};
//! use render_perf::{wrap, InstrumentOptions, NamingFn};
//!
//! struct Badge;
//!
//! impl Component for Badge {
//!     type Props = String;
//!     type State = u32;
//!     type Output = String;
//!
//!     fn initial_state(&self, _props: &String) -> u32 {
//!         0
//!     }
//!
//!     fn render(&self, props: &String, count: &u32) -> ComponentResult<String> {
//!         Ok(format!("{} ({})", props, count))
//!     }
//! }
//!
//! let badge = wrap(
//!     Class::<Badge>::new("Badge", |_| Badge),
//!     Some(NamingFn::new(|name: &String, count: &u32| format!("Badge({name},{count})"))),
//!     InstrumentOptions::new(),
//! );
//!
//! let mut mounted = Mounted::mount(&badge, "inbox".to_string()).unwrap();
//! mounted.set_state(|count| *count += 1).unwrap();
//!
//! let timeline = badge.timeline().unwrap();
//! assert_eq!(timeline.measures_named("Badge(inbox,0)").len(), 1);
//! assert_eq!(timeline.measures_named("Badge(inbox,1)").len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`backend`] - Timing backend trait and the default [`Timeline`]
//! - [`cycle`] - Cycle ids and mark labels
//! - [`naming`] - Measure name resolution
//! - [`options`] - Wrap-time options and serializable settings

pub mod backend;
pub mod cycle;
mod error;
mod instrumented;
pub mod naming;
pub mod options;

pub use backend::{PerformanceBackend, Timeline, TimelineEntry, DEFAULT_MAX_TIMELINE_ENTRIES};
pub use cycle::{CycleId, MarkLabel, MarkPhase};
pub use error::{BackendError, BackendResult};
pub use instrumented::{wrap, Instrumented, InstrumentedInstance, MIN_TIMELINE_ENTRIES};
pub use naming::{resolve_name, NameResolver, NamingFn};
pub use options::{BackendErrorPolicy, InstrumentOptions, InstrumentSettings};
