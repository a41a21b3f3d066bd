//! The filter → aggregate → sort query pipeline.
//!
//! Every chart and table in the dashboard is backed by one [`Pipeline`]
//! value: a facet [`SelectionSet`] plus fixed [`Filter`]s, an optional
//! [`AggregateSpec`], and an optional [`SortSpec`], evaluated in that fixed
//! order against an immutable table snapshot.

pub mod aggregate;
pub mod pipeline;
pub mod selection;
pub mod sort;

pub use aggregate::{AggregateSpec, Reduce, aggregate};
pub use pipeline::Pipeline;
pub use selection::{FacetSelection, Filter, SelectionSet};
pub use sort::{Direction, SortSpec, sort};
