//! Source-map segment accumulation and the v3 document.
//!
//! The printer records a segment whenever it enters or leaves a node carrying
//! original-location metadata. Segments accumulate per generated line with
//! absolute values; encoding to the VLQ `mappings` string happens once at the
//! end, through the `vlq` crate.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::ast::Position;

/// A Source Map Revision 3 document.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub sources: Vec<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Vec::is_empty")]
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: Mappings,
}

/// `mappings`, either VLQ-encoded or as the decoded segment arrays
/// (1, 4, or 5 absolute integer fields each).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Mappings {
    Encoded(String),
    Decoded(Vec<Vec<Vec<i64>>>),
}

impl SourceMap {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    generated_column: u32,
    /// 0-based original line and column; `None` when no source is recorded.
    original: Option<(u32, u32)>,
    name: Option<u32>,
}

/// Per-`print` mapping accumulator.
pub(crate) struct MappingEmitter {
    /// Segment list per generated line.
    lines: Vec<Vec<Segment>>,
    names: Vec<String>,
    name_indices: FxHashMap<String, u32>,
    /// Whether a `sourceMapSource` was configured; without one, segments
    /// carry only their generated column.
    has_source: bool,
}

impl MappingEmitter {
    pub(crate) fn new(has_source: bool) -> Self {
        Self {
            lines: Vec::new(),
            names: Vec::new(),
            name_indices: FxHashMap::default(),
            has_source,
        }
    }

    /// Record a mapping at generated `(line, column)` (both 0-based) for the
    /// original `position` (1-based line). `name` is the original identifier
    /// name when the emitted text was mangled.
    pub(crate) fn add(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        position: Position,
        name: Option<&str>,
    ) {
        while self.lines.len() <= generated_line as usize {
            self.lines.push(Vec::new());
        }
        let original = self
            .has_source
            .then(|| (position.line.saturating_sub(1), position.column));
        let name = match (self.has_source, name) {
            (true, Some(name)) => Some(self.name_index(name)),
            _ => None,
        };
        let segment = Segment {
            generated_column,
            original,
            name,
        };
        let line = &mut self.lines[generated_line as usize];
        // A repeat of the previous segment's source position adds nothing
        // unless it records a name.
        if let Some(prev) = line.last()
            && segment.name.is_none()
            && prev.original == segment.original
        {
            return;
        }
        line.push(segment);
    }

    fn name_index(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.name_indices.get(name) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_indices.insert(name.to_string(), idx);
        idx
    }

    pub(crate) fn into_parts(self, encode: bool) -> (Vec<String>, Mappings) {
        let mappings = if encode {
            Mappings::Encoded(self.encode())
        } else {
            Mappings::Decoded(self.decoded())
        };
        (self.names, mappings)
    }

    fn decoded(&self) -> Vec<Vec<Vec<i64>>> {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|seg| {
                        let mut fields = vec![seg.generated_column as i64];
                        if let Some((line, column)) = seg.original {
                            fields.push(0);
                            fields.push(line as i64);
                            fields.push(column as i64);
                            if let Some(name) = seg.name {
                                fields.push(name as i64);
                            }
                        }
                        fields
                    })
                    .collect()
            })
            .collect()
    }

    fn encode(&self) -> String {
        let mut out = String::new();
        let mut prev_line = 0i64;
        let mut prev_column = 0i64;
        let mut prev_name = 0i64;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            let mut prev_generated = 0i64;
            for (j, seg) in line.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                push_vlq(&mut out, seg.generated_column as i64 - prev_generated);
                prev_generated = seg.generated_column as i64;
                if let Some((orig_line, orig_column)) = seg.original {
                    // Single source, so the source-index delta is 0 after the
                    // first segment and 0 to start with.
                    push_vlq(&mut out, 0);
                    push_vlq(&mut out, orig_line as i64 - prev_line);
                    prev_line = orig_line as i64;
                    push_vlq(&mut out, orig_column as i64 - prev_column);
                    prev_column = orig_column as i64;
                    if let Some(name) = seg.name {
                        push_vlq(&mut out, name as i64 - prev_name);
                        prev_name = name as i64;
                    }
                }
            }
        }
        out
    }
}

fn push_vlq(out: &mut String, value: i64) {
    let mut buf = Vec::new();
    vlq::encode(value, &mut buf).expect("vlq encoding into a Vec cannot fail");
    out.push_str(std::str::from_utf8(&buf).expect("vlq output is base64"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    #[test]
    fn encodes_single_segment() {
        let mut em = MappingEmitter::new(true);
        em.add(0, 12, Position::new(10, 5), None);
        let (_, mappings) = em.into_parts(true);
        match mappings {
            Mappings::Encoded(s) => assert_eq!(s, "YASK"),
            _ => panic!("expected encoded"),
        }
    }

    #[test]
    fn encodes_deltas_within_a_line() {
        let mut em = MappingEmitter::new(true);
        em.add(0, 12, Position::new(10, 5), None);
        em.add(0, 14, Position::new(10, 7), None);
        let (_, mappings) = em.into_parts(true);
        match mappings {
            Mappings::Encoded(s) => assert_eq!(s, "YASK,EAAE"),
            _ => panic!("expected encoded"),
        }
    }

    #[test]
    fn deduplicates_repeated_source_positions() {
        let mut em = MappingEmitter::new(true);
        em.add(0, 4, Position::new(2, 0), None);
        em.add(0, 4, Position::new(2, 0), None);
        let (_, mappings) = em.into_parts(false);
        match mappings {
            Mappings::Decoded(lines) => assert_eq!(lines[0].len(), 1),
            _ => panic!("expected decoded"),
        }
    }

    #[test]
    fn names_are_deduplicated_and_referenced() {
        let mut em = MappingEmitter::new(true);
        em.add(0, 0, Position::new(1, 0), Some("alpha"));
        em.add(0, 10, Position::new(1, 8), Some("alpha"));
        let (names, mappings) = em.into_parts(false);
        assert_eq!(names, vec!["alpha"]);
        match mappings {
            Mappings::Decoded(lines) => {
                assert_eq!(lines[0][0], vec![0, 0, 0, 0, 0]);
                assert_eq!(lines[0][1], vec![10, 0, 0, 8, 0]);
            }
            _ => panic!("expected decoded"),
        }
    }

    #[test]
    fn generated_only_segments_without_source() {
        let mut em = MappingEmitter::new(false);
        em.add(0, 3, Position::new(1, 0), None);
        let (_, mappings) = em.into_parts(false);
        match mappings {
            Mappings::Decoded(lines) => assert_eq!(lines[0][0], vec![3]),
            _ => panic!("expected decoded"),
        }
    }
}
