//! GPX writers: a track of every visited point and a route of the described
//! ones.

use std::io::{self, Write};

use crate::annotate::{Importance, RoutePoint};
use crate::error::OutputResult;
use crate::translations::OutputContext;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn gpx_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<gpx version="1.1" creator="rr-router" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns="http://www.topografix.com/GPX/1/1" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#
    )
}

/// Track output: every visited point, one `<trkseg>` per routed waypoint
/// pair so unroutable pairs appear as breaks in the track.
pub fn write_gpx_track<W: Write>(
    mut out: W,
    points: &[RoutePoint],
    ctx: &OutputContext,
) -> OutputResult<()> {
    gpx_header(&mut out)?;
    writeln!(out, "<trk>")?;
    writeln!(out, "<name>{} route</name>", xml_escape(ctx.route_kind()))?;

    let mut current_leg: Option<usize> = None;
    for p in points {
        if current_leg != Some(p.leg) {
            if current_leg.is_some() {
                writeln!(out, "</trkseg>")?;
            }
            writeln!(out, "<trkseg>")?;
            current_leg = Some(p.leg);
        }
        writeln!(
            out,
            r#"<trkpt lat="{:.6}" lon="{:.6}"/>"#,
            p.position.lat, p.position.lon
        )?;
    }
    if current_leg.is_some() {
        writeln!(out, "</trkseg>")?;
    }

    writeln!(out, "</trk>")?;
    writeln!(out, "</gpx>")?;
    Ok(())
}

/// Route output: one `<rtept>` per described point, each carrying the step
/// taken to reach the next one.
pub fn write_gpx_route<W: Write>(
    mut out: W,
    points: &[RoutePoint],
    ctx: &OutputContext,
) -> OutputResult<()> {
    let t = &ctx.translations;

    gpx_header(&mut out)?;
    writeln!(out, "<rte>")?;
    writeln!(out, "<name>{} route</name>", xml_escape(ctx.route_kind()))?;

    let mut section_dist = 0.0f32;
    let mut section_dur = 0.0f32;
    let mut prev_step: Option<String> = None;
    let mut inter_count = 0;
    let mut trip_count = 0;
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

        // Close the previous point with the step that led here.
        if let Some(step) = prev_step.take() {
            writeln!(
                out,
                "<desc>{} for {:.3} km, {:.1} min</desc></rtept>",
                step,
                section_dist / 1_000.0,
                section_dur / 60.0
            )?;
        }

        let last = p.next_way_name.is_none();
        let name = if first {
            first = false;
            t.gpx_start.clone()
        } else if last {
            t.gpx_finish.clone()
        } else if p.importance == Importance::Waypoint {
            inter_count += 1;
            format!("{}{}", t.gpx_inter, inter_count)
        } else {
            trip_count += 1;
            format!("{}{:03}", t.gpx_trip, trip_count)
        };

        writeln!(
            out,
            r#"<rtept lat="{:.6}" lon="{:.6}"><name>{}</name>"#,
            p.position.lat,
            p.position.lon,
            xml_escape(&name)
        )?;

        if last {
            writeln!(
                out,
                "<desc>Total journey {:.3} km, {:.1} min</desc></rtept>",
                p.cum_distance_m / 1_000.0,
                p.cum_duration_s / 60.0
            )?;
        } else {
            let heading = p
                .next_bearing_deg
                .map_or("", |b| t.heading_word(b));
            let way = p
                .next_way_name
                .as_deref()
                .map_or("", |n| t.way_display(n, p.next_highway));
            prev_step = Some(format!("Head {} on {}", heading, xml_escape(way)));
        }

        section_dist = 0.0;
        section_dur = 0.0;
    }

    writeln!(out, "</rte>")?;
    writeln!(out, "</gpx>")?;
    Ok(())
}
