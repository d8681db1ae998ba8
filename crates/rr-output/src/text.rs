//! Plain-text writers: the turn-by-turn table and the every-node table.
//!
//! Both are tab-separated (via the `csv` crate) with a commented header row,
//! so they stay greppable and spreadsheet-importable.

use std::io;

use crate::annotate::{Importance, RoutePoint};
use crate::error::OutputResult;
use crate::translations::OutputContext;

fn km(m: f32) -> String {
    format!("{:.3}", m / 1_000.0)
}

fn minutes(s: f32) -> String {
    format!("{:.1}", s / 60.0)
}

/// Turn-by-turn table: one row per important point (waypoints and described
/// junctions), with section and cumulative totals.
pub fn write_text<W: io::Write>(
    out: W,
    points: &[RoutePoint],
    ctx: &OutputContext,
) -> OutputResult<()> {
    let t = &ctx.translations;
    let mut w = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);

    w.write_record([
        "#Latitude",
        "Longitude",
        "Section Distance",
        "Section Duration",
        "Total Distance",
        "Total Duration",
        "Point Type",
        "Turn",
        "Bearing",
        "Highway",
    ])?;

    let mut section_dist = 0.0f32;
    let mut section_dur = 0.0f32;
    let mut first = true;

    for p in points {
        if p.importance == Importance::Ignore {
            continue;
        }
        section_dist += p.seg_distance_m;
        section_dur += p.seg_duration_s;
        if p.importance <= Importance::JunctCont {
            continue;
        }

        let ptype = if p.importance == Importance::Waypoint { "Waypt" } else { "Junct" };
        let lat = format!("{:.6}", p.position.lat);
        let lon = format!("{:.6}", p.position.lon);

        if first {
            // Departure row: no section totals yet, just the heading out.
            let bearing = p.next_bearing_deg.map_or(String::new(), |b| {
                format!("{:+}", ((22 + b) / 45 + 4) % 8 - 4)
            });
            let highway = p
                .next_way_name
                .as_deref()
                .map_or("", |n| t.way_display(n, p.next_highway))
                .to_owned();
            w.write_record(&[
                lat,
                lon,
                km(0.0),
                minutes(0.0),
                km(p.cum_distance_m),
                minutes(p.cum_duration_s),
                ptype.into(),
                String::new(),
                bearing,
                highway,
            ])?;
            first = false;
        } else if let Some(next_name) = p.next_way_name.as_deref() {
            // Intermediate row: turn and heading onto the next way.
            let turn = p
                .turn_deg
                .map_or(String::new(), |d| format!("{:+}", (22 + d) / 45));
            let bearing = p.next_bearing_deg.map_or(String::new(), |b| {
                format!("{:+}", ((22 + b) / 45 + 4) % 8 - 4)
            });
            w.write_record(&[
                lat,
                lon,
                km(section_dist),
                minutes(section_dur),
                km(p.cum_distance_m),
                minutes(p.cum_duration_s),
                ptype.into(),
                turn,
                bearing,
                t.way_display(next_name, p.next_highway).to_owned(),
            ])?;
        } else {
            // Arrival row.
            w.write_record(&[
                lat,
                lon,
                km(section_dist),
                minutes(section_dur),
                km(p.cum_distance_m),
                minutes(p.cum_duration_s),
                ptype.into(),
                String::new(),
                String::new(),
                String::new(),
            ])?;
        }

        section_dist = 0.0;
        section_dur = 0.0;
    }

    w.flush()?;
    Ok(())
}

/// Full table: one row per visited node, including unimportant ones.
pub fn write_text_all<W: io::Write>(
    out: W,
    points: &[RoutePoint],
    ctx: &OutputContext,
) -> OutputResult<()> {
    let t = &ctx.translations;
    let mut w = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);

    w.write_record([
        "#Latitude",
        "Longitude",
        "Node",
        "Type",
        "Segment Dist",
        "Segment Durat",
        "Total Dist",
        "Total Durat",
        "Speed",
        "Bearing",
        "Highway",
    ])?;

    for p in points {
        if p.importance == Importance::Ignore {
            continue;
        }

        let node = if p.node.is_fake() {
            format!("fake{}{}", p.node.fake_index(), if p.super_node { "*" } else { "" })
        } else {
            format!("{}{}", p.node.0, if p.super_node { "*" } else { "" })
        };
        let ptype = match p.importance {
            Importance::Waypoint => "Waypt",
            Importance::Uturn => "U-turn",
            Importance::MiniRb => "Mini-RB",
            Importance::Change => "Change",
            Importance::Unimportant => "Inter",
            _ => "Junct",
        };

        if p.highway.is_none() {
            // First point of the route or of a later pair.
            w.write_record(&[
                format!("{:.6}", p.position.lat),
                format!("{:.6}", p.position.lon),
                node,
                ptype.into(),
                km(0.0),
                minutes(0.0),
                km(p.cum_distance_m),
                minutes(p.cum_duration_s),
                String::new(),
                String::new(),
                String::new(),
            ])?;
        } else {
            w.write_record(&[
                format!("{:.6}", p.position.lat),
                format!("{:.6}", p.position.lon),
                node,
                ptype.into(),
                km(p.seg_distance_m),
                minutes(p.seg_duration_s),
                km(p.cum_distance_m),
                minutes(p.cum_duration_s),
                format!("{:.0}", p.speed_kph),
                format!("{}", p.bearing_deg),
                t.way_display(&p.way_name, p.highway).to_owned(),
            ])?;
        }
    }

    w.flush()?;
    Ok(())
}
