use thiserror::Error;

/// Top-level error type for the road network core.
#[derive(Debug, Error)]
pub enum TarmacError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors raised by shape edits whose preconditions do not hold.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("point ({x}, {z}) does not lie on the shape")]
    PointNotOnShape { x: f64, z: f64 },

    #[error("cannot shorten by {requested}: only {available} available from that end")]
    ShortenOverrun { requested: f64, available: f64 },

    #[error("shapes share no endpoint")]
    NoSharedEndpoint,

    #[error("shape head does not re-touch its interior")]
    KnotNotFound,

    #[error("shape has no joints")]
    Empty,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the road graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node not found")]
    NodeNotFound,

    #[error("cells {lhs:?} and {rhs:?} are not one grid unit apart along a single axis")]
    NotAdjacent { lhs: [i32; 3], rhs: [i32; 3] },

    #[error("nodes are not connected")]
    NotConnected,

    #[error("node has no grid placement")]
    NotPlaced,

    #[error("a node cannot connect to itself")]
    SelfConnection,
}

/// Errors raised while resolving a lane-level path.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route has no nodes")]
    EmptyRoute,

    #[error("lane does not belong to the {0} node of the route")]
    LaneNotOnNode(&'static str),

    #[error("no lane path found along the route (failed after segment {segment})")]
    NoLanePath { segment: usize },

    #[error("lane has fewer than two distinct points")]
    DegenerateLane,
}

/// Errors raised by network builder edits.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`TarmacError`].
pub type Result<T> = std::result::Result<T, TarmacError>;
