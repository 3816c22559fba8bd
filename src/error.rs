use thiserror::Error;

use crate::map::FloorId;

/// Top-level error type for the storeys navigation library.
#[derive(Debug, Error)]
pub enum NavError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A malformed record in a persisted map or nav-graph edit file.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number of the offending record.
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    #[must_use]
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// What was wrong with a record.
#[derive(Debug, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected header {expected:?}")]
    MissingHeader { expected: &'static str },

    #[error("unknown record tag {0:?}")]
    UnknownRecord(String),

    #[error("record appears before any floor is selected")]
    NoCurrentFloor,

    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("vertex index {index} out of range (vertex count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("invalid wall code {0}")]
    InvalidWallCode(f64),

    #[error("floor {0} is defined twice")]
    DuplicateFloor(FloorId),

    #[error("floor {floor} has {count} vertices, at least 4 boundary corners are required")]
    MissingCorners { floor: FloorId, count: usize },

    #[error("floor {0} has no generated navigation mesh")]
    NoNavMesh(FloorId),

    #[error("empty record")]
    Empty,
}

/// Errors raised by the search dispatch.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown search algorithm {0:?}")]
    InvalidSelector(String),
}

/// Errors raised while building or editing a navigation mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("duplicate region over vertices {0:?}")]
    DuplicateRegion(Vec<usize>),

    #[error("edge ({0}, {1}) does not close any region")]
    OpenEdge(usize, usize),

    #[error("edge weight must be positive, got {0}")]
    InvalidWeight(f64),
}

/// Errors raised by map-level operations.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("floor {0} does not exist")]
    UnknownFloor(FloorId),

    #[error("floor {0} already exists")]
    DuplicateFloor(FloorId),

    #[error("floor {0} has links but no generated navigation mesh")]
    MissingNavMesh(FloorId),

    #[error("mesh generation failed on floor {floor}: {source}")]
    MeshGeneration {
        floor: FloorId,
        #[source]
        source: MeshError,
    },
}

/// Errors related to the wall vertex arena.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("a floor needs its 4 boundary corners, found {0} vertices")]
    MissingCorners(usize),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("link weight must be positive and finite, got {0}")]
    InvalidLinkWeight(f64),
}

/// Convenience type alias for results using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;
