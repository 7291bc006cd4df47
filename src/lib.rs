//! Road network core: width-aware road shapes, a graph of road pieces with
//! lanes, node and lane level route finding, and interactive network edits.

pub mod builder;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod math;
pub mod routing;
pub mod tessellation;

pub use builder::{NetworkBuilder, NetworkObserver};
pub use config::NetworkConfig;
pub use error::{Result, TarmacError};
pub use geometry::Shape;
pub use graph::{NodeId, NodeKind, RoadGraph};
