//! Well-Known Text decoding and encoding for the seven 2D geometry types.
//!
//! Decoding tolerates bodies whose nesting does not match the type keyword:
//! under `ValidityMode::Lenient` the offending piece decodes as an empty
//! sequence, under `ValidityMode::Strict` it is an error. An unknown type
//! keyword is always an error.

use geofeat_core::error::{GeofeatError, Result};
use geofeat_core::models::{type_tag, CodecOptions, Geometry, GeometryType, Position};
use serde_json::Value;

/// Parenthesised WKT body as a tree of groups and bare coordinate text
#[derive(Debug, Clone, PartialEq)]
enum Node<'a> {
    Text(&'a str),
    Group(Vec<Node<'a>>),
}

/// Deepest group nesting any body may have; MULTIPOLYGON needs three
const MAX_GROUP_DEPTH: usize = 8;

/// Deepest GEOMETRYCOLLECTION nesting accepted
const MAX_COLLECTION_DEPTH: usize = 32;

struct BodyParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> BodyParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.input.len()
    }

    /// Parse one complete group and require nothing after it
    fn document(&mut self) -> std::result::Result<Node<'a>, String> {
        let node = self.group()?;
        if self.at_end() {
            Ok(node)
        } else {
            Err(format!("unexpected trailing text at offset {}", self.pos))
        }
    }

    /// `( item, item, ... )` where an item is a nested group or bare text
    fn group(&mut self) -> std::result::Result<Node<'a>, String> {
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Err(format!("expected '(' at offset {}", self.pos));
        }
        self.pos += 1;

        self.depth += 1;
        if self.depth > MAX_GROUP_DEPTH {
            return Err(format!("nesting too deep at offset {}", self.pos));
        }
        let group = self.items();
        self.depth -= 1;
        group
    }

    fn items(&mut self) -> std::result::Result<Node<'a>, String> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(Node::Group(items));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('(') => items.push(self.group()?),
                Some(')') | Some(',') => {
                    return Err(format!("missing item at offset {}", self.pos));
                }
                Some(_) => items.push(self.text()),
                None => return Err("unbalanced parentheses".to_string()),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {
                    self.pos += 1;
                    return Ok(Node::Group(items));
                }
                Some(c) => return Err(format!("unexpected '{}' at offset {}", c, self.pos)),
                None => return Err("unbalanced parentheses".to_string()),
            }
        }
    }

    fn text(&mut self) -> Node<'a> {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '(' | ')' | ',') {
                break;
            }
            self.pos += c.len_utf8();
        }
        Node::Text(input[start..self.pos].trim())
    }
}

/// Converts a parsed body into coordinates for one declared type
struct Decoder {
    geometry_type: GeometryType,
    strict: bool,
}

impl Decoder {
    /// Strict: error. Lenient: the empty value for the piece being decoded.
    fn fail<T: Default>(&self, reason: String) -> Result<T> {
        if self.strict {
            Err(GeofeatError::MalformedGeometry {
                geometry_type: self.geometry_type.wkt_keyword().to_string(),
                reason,
            })
        } else {
            Ok(T::default())
        }
    }

    fn geometry(&self, node: &Node<'_>) -> Result<Geometry> {
        Ok(match self.geometry_type {
            GeometryType::Point => Geometry::Point { coordinates: self.point(node)? },
            GeometryType::LineString => Geometry::line_string(self.points(node)?),
            GeometryType::MultiPoint => Geometry::multi_point(self.points(node)?),
            GeometryType::Polygon => Geometry::polygon(self.lines(node)?),
            GeometryType::MultiLineString => Geometry::multi_line_string(self.lines(node)?),
            GeometryType::MultiPolygon => Geometry::multi_polygon(self.polygons(node)?),
            GeometryType::GeometryCollection => {
                return self.recover("collections are decoded from their members".to_string())
            }
        })
    }

    fn point(&self, node: &Node<'_>) -> Result<Option<Position>> {
        match node {
            Node::Group(items) => match items.as_slice() {
                [Node::Text(text)] => match parse_pair(text) {
                    Ok(position) => Ok(Some(position)),
                    Err(reason) => self.fail(reason),
                },
                _ => self.fail(format!("expected exactly one coordinate pair, found {} items", items.len())),
            },
            Node::Text(_) => self.fail("expected '('".to_string()),
        }
    }

    fn points(&self, node: &Node<'_>) -> Result<Vec<Position>> {
        match self.try_points(node) {
            Ok(positions) => Ok(positions),
            Err(reason) => self.fail(reason),
        }
    }

    fn try_points(&self, node: &Node<'_>) -> std::result::Result<Vec<Position>, String> {
        let Node::Group(items) = node else {
            return Err("expected a parenthesised list of coordinates".to_string());
        };

        items
            .iter()
            .map(|item| match item {
                Node::Text(text) => parse_pair(text),
                // MULTIPOINT((1 2),(3 4)) is the ISO spelling
                Node::Group(inner) if self.geometry_type == GeometryType::MultiPoint => {
                    match inner.as_slice() {
                        [Node::Text(text)] => parse_pair(text),
                        _ => Err("expected a single coordinate pair inside '()'".to_string()),
                    }
                }
                Node::Group(_) => Err("unexpected nested list where a coordinate pair belongs".to_string()),
            })
            .collect()
    }

    fn lines(&self, node: &Node<'_>) -> Result<Vec<Vec<Position>>> {
        let Node::Group(items) = node else {
            return self.fail("expected a parenthesised list of rings".to_string());
        };
        items.iter().map(|item| self.points(item)).collect()
    }

    fn polygons(&self, node: &Node<'_>) -> Result<Vec<Vec<Vec<Position>>>> {
        let Node::Group(items) = node else {
            return self.fail("expected a parenthesised list of polygons".to_string());
        };
        items.iter().map(|item| self.lines(item)).collect()
    }

    /// Broken syntax empties the whole geometry in lenient mode
    fn recover(&self, reason: String) -> Result<Geometry> {
        self.fail::<()>(reason)?;
        Ok(Geometry::empty(self.geometry_type))
    }
}

fn parse_pair(text: &str) -> std::result::Result<Position, String> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok([parse_ordinate(x)?, parse_ordinate(y)?]),
        _ => Err(format!("expected 'lon lat', found '{}'", text)),
    }
}

fn parse_ordinate(token: &str) -> std::result::Result<f64, String> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("'{}' is not a finite number", token)),
    }
}

/// Split a collection body on commas that are not inside parentheses
fn split_members(body: &str) -> std::result::Result<Vec<&str>, String> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut members = Vec::new();

    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced ')' at offset {}", i))?;
            }
            ',' if depth == 0 => {
                members.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }

    let last = body[start..].trim();
    if !(members.is_empty() && last.is_empty()) {
        members.push(last);
    }
    Ok(members)
}

/// Decode WKT text into a geometry
pub fn decode(text: &str, options: &CodecOptions) -> Result<Geometry> {
    decode_at(text, options, 0)
}

fn decode_at(text: &str, options: &CodecOptions, depth: usize) -> Result<Geometry> {
    let trimmed = text.trim();
    let keyword_end =
        trimmed.find(|c: char| c == '(' || c.is_whitespace()).unwrap_or(trimmed.len());
    let geometry_type = GeometryType::from_wkt_keyword(&trimmed[..keyword_end])
        .ok_or_else(|| GeofeatError::UnparseableGeometry { input: text.to_string() })?;

    let decoder = Decoder { geometry_type, strict: options.is_strict() };
    let rest = trimmed[keyword_end..].trim();

    if rest.get(..5).is_some_and(|prefix| prefix.eq_ignore_ascii_case("EMPTY")) {
        if rest.len() > 5 {
            return decoder.recover(format!("unexpected text after EMPTY: '{}'", &rest[5..]));
        }
        return Ok(Geometry::empty(geometry_type));
    }

    if geometry_type == GeometryType::GeometryCollection {
        return decode_collection(rest, &decoder, options, depth);
    }

    match BodyParser::new(rest).document() {
        Ok(node) => decoder.geometry(&node),
        Err(reason) => decoder.recover(reason),
    }
}

fn decode_collection(
    rest: &str,
    decoder: &Decoder,
    options: &CodecOptions,
    depth: usize,
) -> Result<Geometry> {
    if depth >= MAX_COLLECTION_DEPTH {
        return decoder.recover("collections nested too deep".to_string());
    }

    let Some(body) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) else {
        return decoder.recover("expected a parenthesised list of geometries".to_string());
    };

    let members = match split_members(body) {
        Ok(members) => members,
        Err(reason) => return decoder.recover(reason),
    };

    // A member without a type keyword is dropped; an unknown keyword is still fatal
    let mut geometries = Vec::with_capacity(members.len());
    for member in members {
        if !member.starts_with(|c: char| c.is_ascii_alphabetic()) {
            decoder.fail::<()>(format!("member '{}' has no type keyword", member))?;
            continue;
        }
        geometries.push(decode_at(member, options, depth + 1)?);
    }
    Ok(Geometry::collection(geometries))
}

/// Encode a geometry as WKT
pub fn encode(geometry: &Geometry) -> String {
    let mut out = String::new();
    write_geometry(&mut out, geometry);
    out
}

/// Encode a GeoJSON geometry value as WKT.
///
/// Unknown `type` tags fail unless legacy markers are enabled, in which case the
/// uppercased tag is followed by `" not implemented"` (or `" EMPTY"` when the
/// value has no coordinates).
pub fn encode_value(value: &Value, options: &CodecOptions) -> Result<String> {
    let tag = type_tag(value)?;
    if GeometryType::from_geojson_type(tag).is_some() {
        return Ok(encode(&Geometry::from_geojson(value)?));
    }

    if !options.legacy_markers {
        return Err(GeofeatError::UnsupportedGeometryType { type_name: tag.to_string() });
    }

    let has_coordinates = match value.get("coordinates") {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    let suffix = if has_coordinates { " not implemented" } else { " EMPTY" };
    Ok(format!("{}{}", tag.to_uppercase(), suffix))
}

fn write_geometry(out: &mut String, geometry: &Geometry) {
    out.push_str(geometry.geometry_type().wkt_keyword());
    if writes_empty(geometry) {
        out.push_str(" EMPTY");
        return;
    }

    out.push('(');
    match geometry {
        Geometry::Point { coordinates } => {
            if let Some(position) = coordinates {
                write_position(out, position);
            }
        }
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            write_positions(out, coordinates)
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            write_rings(out, coordinates)
        }
        Geometry::MultiPolygon { coordinates } => {
            let polygons = coordinates.iter().filter(|polygon| polygon.iter().any(|r| !r.is_empty()));
            for (i, polygon) in polygons.enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_rings(out, polygon);
                out.push(')');
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for (i, member) in geometries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_geometry(out, member);
            }
        }
    }
    out.push(')');
}

// f64's Display is the shortest text that parses back to the same value
fn write_position(out: &mut String, position: &Position) {
    out.push_str(&position[0].to_string());
    out.push(' ');
    out.push_str(&position[1].to_string());
}

fn write_positions(out: &mut String, positions: &[Position]) {
    for (i, position) in positions.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_position(out, position);
    }
}

/// Whether nothing but `EMPTY` can be written for the geometry
fn writes_empty(geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            coordinates.iter().all(|ring| ring.is_empty())
        }
        Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().all(|ring| ring.is_empty()),
        other => other.is_empty(),
    }
}

// A ring emptied by lenient decoding has no WKT spelling; `()` is rejected by readers
fn write_rings(out: &mut String, rings: &[Vec<Position>]) {
    for (i, ring) in rings.iter().filter(|ring| !ring.is_empty()).enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('(');
        write_positions(out, ring);
        out.push(')');
    }
}
