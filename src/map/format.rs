//! Plain-text persistence of maps and navigation edge edits.
//!
//! A map file starts with [`MAP_HEADER`] and holds one record per line:
//!
//! ```text
//! F <floor>           start a floor
//! L <id> <x> <y>      a link; the id may contain spaces
//! V <x> <y>           a wall vertex
//! W <code> <v1> <v2>  a wall between two earlier vertices of the floor
//! ```
//!
//! A navigation edit file starts with [`NAV_HEADER`]:
//!
//! ```text
//! M <floor>           select a floor with a generated mesh
//! E <value> <v1> <v2> the directed navigation edge v1 → v2
//! ```
//!
//! Loading validates the whole text before anything is changed.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;

use super::{FloorId, Map};
use crate::config::MapConfig;
use crate::error::{ParseError, ParseErrorKind};
use crate::floor::{Floor, Link};
use crate::graph::{Graph, SearchGraph};
use crate::math::{Point2, TOLERANCE};
use crate::topology::WallKind;

pub const MAP_HEADER: &str = "MAP FILE";
pub const NAV_HEADER: &str = "NAV GRAPH FILE";

/// A floor read from a map file, not yet validated as a whole.
struct PendingFloor {
    line: usize,
    links: Vec<Link>,
    walls: Graph,
}

/// One line of a record file, split into fields.
struct Record<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.line, kind)
    }

    fn tag(&self) -> &'a str {
        self.fields[0]
    }

    fn expect_arity(&self, expected: usize) -> Result<(), ParseError> {
        if self.fields.len() == expected {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::Arity {
                expected,
                found: self.fields.len(),
            }))
        }
    }

    fn number<T: FromStr>(&self, index: usize) -> Result<T, ParseError> {
        let field = self.fields[index];
        field
            .parse()
            .map_err(|_| self.error(ParseErrorKind::InvalidNumber(field.to_owned())))
    }

    /// A finite real number; `NaN` and infinities are malformed.
    fn real(&self, index: usize) -> Result<f64, ParseError> {
        let value: f64 = self.number(index)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.error(ParseErrorKind::InvalidNumber(self.fields[index].to_owned())))
        }
    }

    fn vertex(&self, index: usize, count: usize) -> Result<usize, ParseError> {
        let vertex = self.number(index)?;
        if vertex < count {
            Ok(vertex)
        } else {
            Err(self.error(ParseErrorKind::IndexOutOfRange {
                index: vertex,
                count,
            }))
        }
    }
}

/// Checks the header and splits the remaining lines into records.
fn records<'a>(
    text: &'a str,
    header: &'static str,
) -> Result<impl Iterator<Item = Result<Record<'a>, ParseError>> + 'a, ParseError> {
    let mut lines = text.lines();
    if lines.next().map(str::trim_end) != Some(header) {
        return Err(ParseError::new(
            1,
            ParseErrorKind::MissingHeader { expected: header },
        ));
    }
    Ok(lines.enumerate().map(|(offset, raw)| {
        let line = offset + 2;
        let raw = raw.trim_end();
        if raw.is_empty() {
            return Err(ParseError::new(line, ParseErrorKind::Empty));
        }
        Ok(Record {
            line,
            fields: raw.split(' ').collect(),
        })
    }))
}

impl Map {
    /// Reads a map file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the line of the first bad record.
    pub fn from_map_file(config: MapConfig, text: &str) -> Result<Self, ParseError> {
        let mut pending: BTreeMap<FloorId, PendingFloor> = BTreeMap::new();
        let mut current = None;

        for record in records(text, MAP_HEADER)? {
            let record = record?;
            if record.tag() == "F" {
                record.expect_arity(2)?;
                let id = record.number(1)?;
                if pending.contains_key(&id) {
                    return Err(record.error(ParseErrorKind::DuplicateFloor(id)));
                }
                pending.insert(
                    id,
                    PendingFloor {
                        line: record.line,
                        links: Vec::new(),
                        walls: Graph::new(),
                    },
                );
                current = Some(id);
                continue;
            }

            let floor = current
                .and_then(|id| pending.get_mut(&id))
                .ok_or_else(|| record.error(ParseErrorKind::NoCurrentFloor))?;
            match record.tag() {
                "L" => {
                    let n = record.fields.len();
                    if n < 4 {
                        return Err(record.error(ParseErrorKind::Arity {
                            expected: 4,
                            found: n,
                        }));
                    }
                    let position = Point2::new(record.real(n - 2)?, record.real(n - 1)?);
                    floor
                        .links
                        .push(Link::new(record.fields[1..n - 2].join(" "), position));
                }
                "V" => {
                    record.expect_arity(3)?;
                    let position = Point2::new(record.real(1)?, record.real(2)?);
                    floor.walls.add_vertex(position);
                }
                "W" => {
                    record.expect_arity(4)?;
                    let code = record.real(1)?;
                    if WallKind::from_code(code).is_none() {
                        return Err(record.error(ParseErrorKind::InvalidWallCode(code)));
                    }
                    let count = floor.walls.vertex_count();
                    let a = record.vertex(2, count)?;
                    let b = record.vertex(3, count)?;
                    floor.walls.set_edge(a, b, code, true);
                }
                tag => return Err(record.error(ParseErrorKind::UnknownRecord(tag.to_owned()))),
            }
        }

        let mut map = Self::empty(config);
        for (id, floor) in pending {
            let count = floor.walls.vertex_count();
            let built = Floor::from_wall_graph(config.floor, &floor.walls, floor.links).map_err(|_| {
                ParseError::new(floor.line, ParseErrorKind::MissingCorners { floor: id, count })
            })?;
            map.floors.insert(id, built);
        }
        Ok(map)
    }

    /// Writes every floor in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] if formatting a record fails.
    pub fn to_map_file(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{MAP_HEADER}")?;
        for (id, floor) in &self.floors {
            writeln!(out, "F {id}")?;
            for link in floor.links() {
                writeln!(out, "L {} {} {}", link.id, link.position.x, link.position.y)?;
            }
            let walls = floor.wall_graph();
            for position in walls.positions() {
                writeln!(out, "V {} {}", position.x, position.y)?;
            }
            for a in 0..walls.vertex_count() {
                for b in 0..a {
                    if walls.has_edge(a, b) {
                        writeln!(out, "W {} {a} {b}", walls.edge_value(a, b))?;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Applies a navigation edit file to the generated meshes.
    ///
    /// Positive values are stored as weights and may lower the heuristic
    /// scale; other values are stored as they are.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the line of the first bad record, in
    /// which case no mesh is changed.
    pub fn load_nav_edits(&mut self, text: &str) -> Result<(), ParseError> {
        let mut edits: Vec<(FloorId, f64, usize, usize)> = Vec::new();
        let mut current = None;

        for record in records(text, NAV_HEADER)? {
            let record = record?;
            match record.tag() {
                "M" => {
                    record.expect_arity(2)?;
                    let id = record.number(1)?;
                    if !self.nav_meshes.contains_key(&id) {
                        return Err(record.error(ParseErrorKind::NoNavMesh(id)));
                    }
                    current = Some(id);
                }
                "E" => {
                    record.expect_arity(4)?;
                    let id = current.ok_or_else(|| record.error(ParseErrorKind::NoCurrentFloor))?;
                    let count = self
                        .nav_meshes
                        .get(&id)
                        .map_or(0, |nav| nav.nav_graph().vertex_count());
                    let value = record.real(1)?;
                    let a = record.vertex(2, count)?;
                    let b = record.vertex(3, count)?;
                    edits.push((id, value, a, b));
                }
                tag => return Err(record.error(ParseErrorKind::UnknownRecord(tag.to_owned()))),
            }
        }

        for (id, value, a, b) in edits {
            if let Some(nav) = self.nav_meshes.get_mut(&id) {
                let graph = nav.nav_graph_mut();
                if value > 0.0 {
                    graph.set_weight(a, b, value, false);
                } else {
                    graph.set_value(a, b, value, false);
                }
            }
        }
        Ok(())
    }

    /// Writes every navigation edge whose value is not the plain straight-line
    /// estimate, blocked directions included.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] if formatting a record fails.
    #[allow(clippy::float_cmp)]
    pub fn to_nav_edits_file(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{NAV_HEADER}")?;
        for (id, nav) in &self.nav_meshes {
            writeln!(out, "M {id}")?;
            let graph = nav.nav_graph();
            for a in 0..graph.vertex_count() {
                for b in 0..graph.vertex_count() {
                    let value = graph.edge_value(a, b);
                    if value != 0.0 && (value - graph.heuristic(a, b)).abs() > TOLERANCE {
                        writeln!(out, "E {value} {a} {b}")?;
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::map::GenerationOutcome;

    fn sample() -> Map {
        let mut map = Map::default();
        let ground = map.floor_mut(0).unwrap();
        assert!(ground.add_wall(Point2::new(0.5, 0.0), Point2::new(0.5, 0.6)));
        ground.add_link("Main stairs", Point2::new(0.25, 0.2));
        let basement = map.add_floor(-2).unwrap();
        assert!(basement.add_wall(Point2::new(0.3, 0.4), Point2::new(1.1, 0.4)));
        basement.add_link("Main stairs", Point2::new(0.2, 0.8));
        map
    }

    #[test]
    fn map_file_round_trip() {
        let map = sample();
        let text = map.to_map_file().unwrap();
        assert!(text.starts_with("MAP FILE\nF -2\nL Main stairs 0.2 0.8\nV 0 0\n"));

        let loaded = Map::from_map_file(MapConfig::default(), &text).unwrap();
        assert_eq!(loaded.floor_ids().collect::<Vec<_>>(), vec![-2, 0]);
        for id in [-2, 0] {
            let (a, b) = (map.floor(id).unwrap(), loaded.floor(id).unwrap());
            assert_eq!(a.wall_graph(), b.wall_graph());
            assert_eq!(a.links(), b.links());
        }
        assert_eq!(loaded.to_map_file().unwrap(), text);
    }

    #[test]
    fn malformed_records_name_their_line() {
        let cases = [
            ("NOT A MAP\n", 1, ParseErrorKind::MissingHeader { expected: MAP_HEADER }),
            ("MAP FILE\nV 0 0\n", 2, ParseErrorKind::NoCurrentFloor),
            ("MAP FILE\nF 0\nQ 1\n", 3, ParseErrorKind::UnknownRecord("Q".into())),
            ("MAP FILE\nF 0\nV 0\n", 3, ParseErrorKind::Arity { expected: 3, found: 2 }),
            ("MAP FILE\nF x\n", 2, ParseErrorKind::InvalidNumber("x".into())),
            ("MAP FILE\nF 0\nV 0 0\nW 1 0 1\n", 4, ParseErrorKind::IndexOutOfRange { index: 1, count: 1 }),
            ("MAP FILE\nF 0\nV 0 0\nV 1 0\nW 3 1 0\n", 5, ParseErrorKind::InvalidWallCode(3.0)),
            ("MAP FILE\nF 0\nF 0\n", 3, ParseErrorKind::DuplicateFloor(0)),
            ("MAP FILE\nF 4\nV 0 0\n", 2, ParseErrorKind::MissingCorners { floor: 4, count: 1 }),
            ("MAP FILE\n\nF 0\n", 2, ParseErrorKind::Empty),
            ("MAP FILE\nF 0\nV NaN 0\n", 3, ParseErrorKind::InvalidNumber("NaN".into())),
            ("MAP FILE\nF 0\nL A 0.5 inf\n", 3, ParseErrorKind::InvalidNumber("inf".into())),
            ("MAP FILE\nF 0\nV 0 0\nV 1 0\nW NaN 1 0\n", 5, ParseErrorKind::InvalidNumber("NaN".into())),
        ];
        for (text, line, kind) in cases {
            let error = Map::from_map_file(MapConfig::default(), text).unwrap_err();
            assert_eq!((error.line, &error.kind), (line, &kind), "{text:?}");
        }
    }

    #[test]
    fn nav_edits_round_trip() {
        let mut map = sample();
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        let nav = map.nav_mesh_mut(0).unwrap();
        let link = nav.link_vertex(0).unwrap();
        let point = nav.nav_graph().position(link);
        let neighbour = nav.nav_graph().neighbours(link).next().unwrap();
        let target = nav.nav_graph().position(neighbour);
        let middle = Point2::new((point.x + target.x) / 2.0, (point.y + target.y) / 2.0);
        let edited = nav.block_path(middle).unwrap();

        let text = map.to_nav_edits_file().unwrap();
        assert!(text.contains("\nE -1 "));

        let mut fresh = Map::from_map_file(MapConfig::default(), &map.to_map_file().unwrap()).unwrap();
        assert_eq!(fresh.generate().unwrap(), GenerationOutcome::Completed);
        fresh.load_nav_edits(&text).unwrap();
        let graph = fresh.nav_mesh(0).unwrap().nav_graph();
        assert_eq!(graph, map.nav_mesh(0).unwrap().nav_graph());
        assert!(!graph.has_edge(edited.a, edited.b));
    }

    #[test]
    fn nav_edits_are_validated_before_applying() {
        let mut map = sample();
        assert_eq!(map.generate().unwrap(), GenerationOutcome::Completed);
        let before = map.nav_mesh(0).unwrap().nav_graph().clone();

        let error = map
            .load_nav_edits("NAV GRAPH FILE\nM 0\nE 2 0 1\nE 2 0 999\n")
            .unwrap_err();
        assert_eq!(error.line, 4);
        assert_eq!(map.nav_mesh(0).unwrap().nav_graph(), &before);

        let error = map.load_nav_edits("NAV GRAPH FILE\nM 9\n").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::NoNavMesh(9));
        let error = map.load_nav_edits("NAV GRAPH FILE\nE 2 0 1\n").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::NoCurrentFloor);

        let error = map.load_nav_edits("NAV GRAPH FILE\nM 0\nE inf 0 1\n").unwrap_err();
        assert_eq!((error.line, error.kind), (3, ParseErrorKind::InvalidNumber("inf".into())));
        assert_eq!(map.nav_mesh(0).unwrap().nav_graph(), &before);
    }
}
