//! todofast-core: state orchestration for the TodoFast calendar
//!
//! Everything the calendar UI derives from data lives here: visible
//! range calculation, task and Google-event normalization into a single
//! display list, duplicate suppression across the two sources, and the
//! optimistic task mutations with revert-on-failure. Rendering, auth,
//! and persistence stay in the host.

pub mod api;
pub mod config;
pub mod error;
pub mod locale;
pub mod merge;
pub mod normalize;
pub mod range;
pub mod state;
pub mod types;
pub mod view;
