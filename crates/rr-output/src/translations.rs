//! Message catalogue and output context.
//!
//! The writers never consult process-wide state: everything locale- or
//! option-dependent travels in an [`OutputContext`] passed explicitly.  The
//! default catalogue is English; embedders load another language (with the
//! `serde` feature) or edit fields directly.

use rr_core::Highway;
use rr_router::Optimise;

use crate::annotate::{heading_index, turn_index};

/// Localised words and phrases used by the formatters.
///
/// The `turn` and `heading` wheels have nine entries: eight 45° sectors plus
/// a repeat of the first so either end of the range maps to a word.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Translations {
    pub turn: [String; 9],
    pub heading: [String; 9],
    pub ordinal: [String; 10],
    /// Spoken names of the highway classes, used when a way is unnamed.
    pub highway: [String; 13],

    pub route_shortest: String,
    pub route_quickest: String,
    pub waypoint: String,
    pub junction: String,
    pub roundabout: String,

    pub gpx_start: String,
    pub gpx_finish: String,
    pub gpx_inter: String,
    pub gpx_trip: String,
}

impl Default for Translations {
    fn default() -> Self {
        let s = |x: &str| x.to_owned();
        Translations {
            turn: [
                s("Very sharp left"),
                s("Sharp left"),
                s("Left"),
                s("Slight left"),
                s("Straight on"),
                s("Slight right"),
                s("Right"),
                s("Sharp right"),
                s("Very sharp right"),
            ],
            heading: [
                s("South"),
                s("South-West"),
                s("West"),
                s("North-West"),
                s("North"),
                s("North-East"),
                s("East"),
                s("South-East"),
                s("South"),
            ],
            ordinal: [
                s("First"),
                s("Second"),
                s("Third"),
                s("Fourth"),
                s("Fifth"),
                s("Sixth"),
                s("Seventh"),
                s("Eighth"),
                s("Ninth"),
                s("Tenth"),
            ],
            highway: [
                s("motorway"),
                s("trunk road"),
                s("primary road"),
                s("secondary road"),
                s("tertiary road"),
                s("unclassified road"),
                s("residential road"),
                s("service road"),
                s("track"),
                s("cycleway"),
                s("path"),
                s("steps"),
                s("ferry"),
            ],
            route_shortest: s("Shortest"),
            route_quickest: s("Quickest"),
            waypoint: s("Waypoint"),
            junction: s("Junction"),
            roundabout: s("Roundabout"),
            gpx_start: s("START"),
            gpx_finish: s("FINISH"),
            gpx_inter: s("INTER"),
            gpx_trip: s("TRIP"),
        }
    }
}

impl Translations {
    /// The word for a turn of `turn_deg` degrees.
    pub fn turn_word(&self, turn_deg: i32) -> &str {
        &self.turn[turn_index(turn_deg)]
    }

    /// The word for a compass heading of `bearing_deg` degrees.
    pub fn heading_word(&self, bearing_deg: i32) -> &str {
        &self.heading[heading_index(bearing_deg)]
    }

    /// The ordinal word for a 1-based count, falling back to digits past ten.
    pub fn ordinal_word(&self, n: usize) -> String {
        match self.ordinal.get(n.wrapping_sub(1)) {
            Some(word) => word.clone(),
            None => n.to_string(),
        }
    }

    /// A way's display name: its own name, or the spoken class name.
    pub fn way_display<'a>(&'a self, name: &'a str, highway: Option<Highway>) -> &'a str {
        if !name.is_empty() {
            return name;
        }
        match highway {
            Some(h) => &self.highway[h.index()],
            None => "",
        }
    }
}

/// Everything the writers need besides the annotated points themselves.
#[derive(Clone, Default)]
pub struct OutputContext {
    pub translations: Translations,
    pub optimise: Optimise,
}

impl OutputContext {
    pub fn new(optimise: Optimise) -> OutputContext {
        OutputContext { translations: Translations::default(), optimise }
    }

    /// "Shortest" or "Quickest", for titles and route names.
    pub fn route_kind(&self) -> &str {
        match self.optimise {
            Optimise::Shortest => &self.translations.route_shortest,
            Optimise::Quickest => &self.translations.route_quickest,
        }
    }
}
