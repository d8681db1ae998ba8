//! Binary graph files.
//!
//! The router consumes four little-endian files produced by the database
//! builder: `<prefix>-nodes.bin`, `<prefix>-segments.bin`, `<prefix>-ways.bin`,
//! and `<prefix>-relations.bin`.  Each starts with a fixed header:
//!
//! ```text
//! magic   u32   per-file tag ("RRGn" / "RRGs" / "RRGw" / "RRGr")
//! version u32   format version; a mismatch is fatal, no recovery
//! count   u32   number of fixed-size records that follow
//! ```
//!
//! The ways file adds a `names_bytes: u32` header field; way records hold
//! `(offset, len)` pairs into the UTF-8 string table appended after the
//! records.
//!
//! [`save`] is the inverse, used by builder glue and by tests to produce
//! fixtures.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::info;

use rr_core::{GeoPoint, Highway, NodeId, SegmentId, Transports, WayId};

use crate::builder::GraphBuilder;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, NodeFlags, RestrictionKind, SegFlags, TurnRestriction, Way};

/// Current graph-file format version.
pub const FORMAT_VERSION: u32 = 2;

const MAGIC_NODES: u32 = u32::from_le_bytes(*b"RRGn");
const MAGIC_SEGMENTS: u32 = u32::from_le_bytes(*b"RRGs");
const MAGIC_WAYS: u32 = u32::from_le_bytes(*b"RRGw");
const MAGIC_RELATIONS: u32 = u32::from_le_bytes(*b"RRGr");

const WAY_ROUNDABOUT: u8 = 1 << 0;

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a graph from the four binary files under `dir` with the given file
/// `prefix`.
pub fn load(dir: &Path, prefix: &str) -> GraphResult<Graph> {
    let nodes = read_all(dir, prefix, "nodes")?;
    let segments = read_all(dir, prefix, "segments")?;
    let ways = read_all(dir, prefix, "ways")?;
    let relations = read_all(dir, prefix, "relations")?;

    let mut builder = GraphBuilder::new();

    // Nodes.
    let (mut cur, node_count) = open_section(&nodes, "nodes", MAGIC_NODES)?;
    for _ in 0..node_count {
        let lat = cur.read_f32::<LittleEndian>().map_err(trunc("nodes"))?;
        let lon = cur.read_f32::<LittleEndian>().map_err(trunc("nodes"))?;
        let flags = cur.read_u8().map_err(trunc("nodes"))?;
        builder.push_node_raw(GeoPoint::new(lat, lon), NodeFlags(flags));
    }

    // Ways.
    let (mut cur, way_count) = open_section(&ways, "ways", MAGIC_WAYS)?;
    let names_bytes = cur.read_u32::<LittleEndian>().map_err(trunc("ways"))? as usize;
    let records_end = ways.len().saturating_sub(names_bytes);
    let names = &ways[records_end..];
    for _ in 0..way_count {
        let highway = cur.read_u8().map_err(trunc("ways"))?;
        let flags = cur.read_u8().map_err(trunc("ways"))?;
        let transports = cur.read_u16::<LittleEndian>().map_err(trunc("ways"))?;
        let speed_limit = cur.read_f32::<LittleEndian>().map_err(trunc("ways"))?;
        let weight = cur.read_f32::<LittleEndian>().map_err(trunc("ways"))?;
        let height = cur.read_f32::<LittleEndian>().map_err(trunc("ways"))?;
        let width = cur.read_f32::<LittleEndian>().map_err(trunc("ways"))?;
        let length = cur.read_f32::<LittleEndian>().map_err(trunc("ways"))?;
        let name_off = cur.read_u32::<LittleEndian>().map_err(trunc("ways"))? as usize;
        let name_len = cur.read_u32::<LittleEndian>().map_err(trunc("ways"))? as usize;

        let highway = Highway::from_index(highway)
            .ok_or(GraphError::BadIndex { file: "ways".into(), index: highway as u32 })?;
        let name = names
            .get(name_off..name_off + name_len)
            .and_then(|b| std::str::from_utf8(b).ok())
            .ok_or(GraphError::Truncated { file: "ways".into() })?
            .to_owned();

        builder.add_way(Way {
            name,
            highway,
            transports: Transports(transports),
            roundabout: flags & WAY_ROUNDABOUT != 0,
            speed_limit,
            weight,
            height,
            width,
            length,
        });
    }

    // Segments.
    let (mut cur, segment_count) = open_section(&segments, "segments", MAGIC_SEGMENTS)?;
    for _ in 0..segment_count {
        let node1 = cur.read_u32::<LittleEndian>().map_err(trunc("segments"))?;
        let node2 = cur.read_u32::<LittleEndian>().map_err(trunc("segments"))?;
        let way = cur.read_u32::<LittleEndian>().map_err(trunc("segments"))?;
        let distance = cur.read_f32::<LittleEndian>().map_err(trunc("segments"))?;
        let flags = cur.read_u8().map_err(trunc("segments"))?;

        if node1 >= node_count || node2 >= node_count {
            return Err(GraphError::BadIndex {
                file: "segments".into(),
                index: node1.max(node2),
            });
        }
        if way >= way_count {
            return Err(GraphError::BadIndex { file: "segments".into(), index: way });
        }

        builder.push_segment_raw(NodeId(node1), NodeId(node2), WayId(way), distance, SegFlags(flags));
    }

    // Relations.
    let (mut cur, relation_count) = open_section(&relations, "relations", MAGIC_RELATIONS)?;
    for _ in 0..relation_count {
        let from = cur.read_u32::<LittleEndian>().map_err(trunc("relations"))?;
        let via = cur.read_u32::<LittleEndian>().map_err(trunc("relations"))?;
        let to = cur.read_u32::<LittleEndian>().map_err(trunc("relations"))?;
        let kind = cur.read_u8().map_err(trunc("relations"))?;

        if from >= segment_count || to >= segment_count {
            return Err(GraphError::BadIndex { file: "relations".into(), index: from.max(to) });
        }
        if via >= node_count {
            return Err(GraphError::BadIndex { file: "relations".into(), index: via });
        }
        let kind = match kind {
            0 => RestrictionKind::Only,
            1 => RestrictionKind::No,
            other => {
                return Err(GraphError::BadIndex { file: "relations".into(), index: other as u32 });
            }
        };

        builder.add_turn_restriction(SegmentId(from), NodeId(via), SegmentId(to), kind);
    }

    info!(
        nodes = node_count,
        segments = segment_count,
        ways = way_count,
        relations = relation_count,
        "graph files loaded"
    );

    Ok(builder.build())
}

// ── Saving ────────────────────────────────────────────────────────────────────

/// Write `graph` as the four binary files under `dir` with the given
/// `prefix`.  The exact inverse of [`load`].
pub fn save(graph: &Graph, dir: &Path, prefix: &str) -> GraphResult<()> {
    // Nodes.
    let mut buf = header(MAGIC_NODES, graph.node_count() as u32);
    for i in 0..graph.node_count() {
        let pos = graph.node_pos[i];
        buf.write_f32::<LittleEndian>(pos.lat)?;
        buf.write_f32::<LittleEndian>(pos.lon)?;
        buf.write_u8(graph.node_flags[i].0)?;
    }
    write_all(dir, prefix, "nodes", &buf)?;

    // Ways: fixed records then the name table.
    let mut names: Vec<u8> = Vec::new();
    let mut buf = header(MAGIC_WAYS, graph.way_count() as u32);
    let mut records: Vec<u8> = Vec::new();
    for way in &graph.ways {
        let name_off = names.len() as u32;
        names.extend_from_slice(way.name.as_bytes());

        records.write_u8(way.highway as u8)?;
        records.write_u8(if way.roundabout { WAY_ROUNDABOUT } else { 0 })?;
        records.write_u16::<LittleEndian>(way.transports.0)?;
        records.write_f32::<LittleEndian>(way.speed_limit)?;
        records.write_f32::<LittleEndian>(way.weight)?;
        records.write_f32::<LittleEndian>(way.height)?;
        records.write_f32::<LittleEndian>(way.width)?;
        records.write_f32::<LittleEndian>(way.length)?;
        records.write_u32::<LittleEndian>(name_off)?;
        records.write_u32::<LittleEndian>(way.name.len() as u32)?;
    }
    buf.write_u32::<LittleEndian>(names.len() as u32)?;
    buf.extend_from_slice(&records);
    buf.extend_from_slice(&names);
    write_all(dir, prefix, "ways", &buf)?;

    // Segments.
    let mut buf = header(MAGIC_SEGMENTS, graph.segment_count() as u32);
    for i in 0..graph.segment_count() {
        buf.write_u32::<LittleEndian>(graph.seg_node1[i].0)?;
        buf.write_u32::<LittleEndian>(graph.seg_node2[i].0)?;
        buf.write_u32::<LittleEndian>(graph.seg_way[i].0)?;
        buf.write_f32::<LittleEndian>(graph.seg_distance[i])?;
        buf.write_u8(graph.seg_flags[i].0)?;
    }
    write_all(dir, prefix, "segments", &buf)?;

    // Relations.
    let mut buf = header(MAGIC_RELATIONS, graph.relation_count() as u32);
    for r in &graph.relations {
        buf.write_u32::<LittleEndian>(r.from.0)?;
        buf.write_u32::<LittleEndian>(r.via.0)?;
        buf.write_u32::<LittleEndian>(r.to.0)?;
        buf.write_u8(match r.kind {
            RestrictionKind::Only => 0,
            RestrictionKind::No => 1,
        })?;
    }
    write_all(dir, prefix, "relations", &buf)?;

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn file_path(dir: &Path, prefix: &str, kind: &str) -> std::path::PathBuf {
    dir.join(format!("{prefix}-{kind}.bin"))
}

fn read_all(dir: &Path, prefix: &str, kind: &str) -> GraphResult<Vec<u8>> {
    Ok(fs::read(file_path(dir, prefix, kind))?)
}

fn write_all(dir: &Path, prefix: &str, kind: &str, bytes: &[u8]) -> GraphResult<()> {
    let mut f = fs::File::create(file_path(dir, prefix, kind))?;
    f.write_all(bytes)?;
    Ok(())
}

fn header(magic: u32, count: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&magic.to_le_bytes());
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf
}

/// Validate a file's header and return a cursor past it plus the record count.
fn open_section<'a>(bytes: &'a [u8], file: &str, magic: u32) -> GraphResult<(Cursor<&'a [u8]>, u32)> {
    let mut cur = Cursor::new(bytes);

    let found_magic = cur.read_u32::<LittleEndian>().map_err(trunc(file))?;
    if found_magic != magic {
        return Err(GraphError::BadMagic { file: file.into(), found: found_magic });
    }

    let version = cur.read_u32::<LittleEndian>().map_err(trunc(file))?;
    if version != FORMAT_VERSION {
        return Err(GraphError::UnsupportedVersion {
            file: file.into(),
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let count = cur.read_u32::<LittleEndian>().map_err(trunc(file))?;
    Ok((cur, count))
}

fn trunc(file: &str) -> impl FnOnce(std::io::Error) -> GraphError {
    let file = file.to_owned();
    move |_| GraphError::Truncated { file }
}
