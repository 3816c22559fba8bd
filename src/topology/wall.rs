use super::vertex::WallVertexId;

/// Kind of a wall segment.
///
/// The numeric codes are the ones stored in wall graphs and save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallKind {
    /// A wall drawn inside the floor (code 1).
    Interior,
    /// A segment of the outer rectangle (code 2).
    Boundary,
}

impl WallKind {
    /// Matrix code of this kind.
    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Interior => 1.0,
            Self::Boundary => 2.0,
        }
    }

    /// Kind for a stored matrix code, or `None` for any other value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 1.0 {
            Some(Self::Interior)
        } else if code == 2.0 {
            Some(Self::Boundary)
        } else {
            None
        }
    }
}

/// A wall between two vertices, as yielded by [`WallStore::walls`](super::WallStore::walls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wall {
    pub a: WallVertexId,
    pub b: WallVertexId,
    pub kind: WallKind,
}

impl Wall {
    /// Whether `vertex` is one of this wall's endpoints.
    #[must_use]
    pub fn touches(&self, vertex: WallVertexId) -> bool {
        self.a == vertex || self.b == vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in [WallKind::Interior, WallKind::Boundary] {
            assert_eq!(WallKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(WallKind::from_code(3.0), None);
        assert_eq!(WallKind::from_code(1.5), None);
    }
}
