//! HTML writer: a self-contained turn-by-turn page.

use std::io::Write;

use crate::annotate::{Importance, RoutePoint};
use crate::error::OutputResult;
use crate::translations::OutputContext;

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Write the described points as an HTML table of instructions.
pub fn write_html<W: Write>(
    mut out: W,
    points: &[RoutePoint],
    ctx: &OutputContext,
) -> OutputResult<()> {
    let t = &ctx.translations;
    let title = format!("{} route", ctx.route_kind());

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<title>{}</title>", html_escape(&title))?;
    writeln!(out, r#"<meta charset="utf-8">"#)?;
    writeln!(out, "<style>")?;
    writeln!(out, "table {{ border-collapse: collapse; }}")?;
    writeln!(out, "td.l {{ font-weight: bold; padding-right: 0.5em; }}")?;
    writeln!(out, "tr.c {{ display: none; }} /* coords */")?;
    writeln!(out, "tr.t {{ font-weight: bold; }} /* total */")?;
    writeln!(out, "span.b, span.t {{ font-variant: small-caps; }}")?;
    writeln!(out, "</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{}</h1>", html_escape(&title))?;
    writeln!(out, "<table>")?;

    let mut section_dist = 0.0f32;
    let mut section_dur = 0.0f32;
    let mut prev_way: Option<String> = None;
    let mut count = 0;
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

        // The stretch that led to this point.
        if !first {
            let way = prev_way.as_deref().unwrap_or("");
            writeln!(
                out,
                "<tr class='s'><td class='l'>Follow:<td class='r'>{} for {:.3} km, {:.1} min \
                 [<span class='j'>{:.1} km, {:.0} minutes</span>]",
                html_escape(way),
                section_dist / 1_000.0,
                section_dur / 60.0,
                p.cum_distance_m / 1_000.0,
                p.cum_duration_s / 60.0
            )?;
        }

        count += 1;
        writeln!(
            out,
            "<tr class='c'><td class='l'>{}:<td class='r'>{:.6} {:.6}",
            count, p.position.lat, p.position.lon
        )?;

        let kind = match p.importance {
            Importance::Waypoint => &t.waypoint,
            Importance::MiniRb | Importance::RbEntry | Importance::RbExit => &t.roundabout,
            _ => &t.junction,
        };

        if first {
            let heading = p.next_bearing_deg.map_or("", |b| t.heading_word(b));
            writeln!(
                out,
                "<tr class='n'><td class='l'>Start:<td class='r'>At <span class='w'>{}</span>, \
                 head <span class='b'>{}</span>",
                html_escape(&t.waypoint),
                heading
            )?;
            first = false;
        } else if p.next_way_name.is_some() {
            if let Some(ordinal) = p.rb_exit_ordinal {
                let heading = p.next_bearing_deg.map_or("", |b| t.heading_word(b));
                writeln!(
                    out,
                    "<tr class='n'><td class='l'>At:<td class='r'>{}, take <span class='t'>the \
                     {} exit</span> heading <span class='b'>{}</span>",
                    html_escape(&t.roundabout),
                    html_escape(&t.ordinal_word(ordinal)),
                    heading
                )?;
            } else {
                let turn = p.turn_deg.map_or("", |d| t.turn_word(d));
                let heading = p.next_bearing_deg.map_or("", |b| t.heading_word(b));
                writeln!(
                    out,
                    "<tr class='n'><td class='l'>At:<td class='r'>{}, go <span class='t'>{}</span> \
                     heading <span class='b'>{}</span>",
                    html_escape(kind),
                    turn,
                    heading
                )?;
            }
        } else {
            writeln!(
                out,
                "<tr class='n'><td class='l'>Stop:<td class='r'>At <span class='w'>{}</span>",
                html_escape(&t.waypoint)
            )?;
            writeln!(
                out,
                "<tr class='t'><td class='l'>Total:<td class='r'><span class='j'>{:.1} km, {:.0} \
                 minutes</span>",
                p.cum_distance_m / 1_000.0,
                p.cum_duration_s / 60.0
            )?;
        }

        prev_way = p
            .next_way_name
            .as_deref()
            .map(|n| t.way_display(n, p.next_highway).to_owned());
        section_dist = 0.0;
        section_dur = 0.0;
    }

    writeln!(out, "</table>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}
