//! `rr-profile` — transport-specific routing parameters.
//!
//! A [`Profile`] says which highway classes a transport may use, how fast it
//! travels on each, whether it obeys one-way markings and turn restrictions,
//! and what physical limits (weight, height, width, length) apply.  Profiles
//! are plain data: the router consumes an already-constructed structure and
//! never mutates it during a call.
//!
//! [`Profile::builtin`] provides a usable default per [`Transport`];
//! embedders tweak fields directly or (with the `serde` feature) deserialize
//! a full profile from a configuration file.

use rr_core::{Highway, Transport};

#[cfg(test)]
mod tests;

/// Transport rules for one routing call.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    /// The transport the route is computed for.
    pub transport: Transport,

    /// Bitmask of allowed highway classes (see [`Highway::bit`]).
    pub allow: u16,

    /// Travel speed per highway class in km/h.  Classes with speed 0 are
    /// never used even if allowed.
    pub speed: [f32; Highway::COUNT],

    /// Obey one-way markings.  Pedestrians ignore them.
    pub oneway: bool,

    /// Honour turn restrictions at junctions.
    pub turns: bool,

    /// Permit re-traversing the arrival segment (turning back on oneself).
    pub uturn: bool,

    /// Vehicle weight in tonnes; `None` ignores way weight limits.
    pub weight: Option<f32>,
    /// Vehicle height in metres; `None` ignores way height limits.
    pub height: Option<f32>,
    /// Vehicle width in metres; `None` ignores way width limits.
    pub width: Option<f32>,
    /// Vehicle length in metres; `None` ignores way length limits.
    pub length: Option<f32>,
}

impl Profile {
    /// `true` if the profile may use ways of class `highway` at all.
    #[inline]
    pub fn allows_highway(&self, highway: Highway) -> bool {
        self.allow & highway.bit() != 0 && self.speed[highway.index()] > 0.0
    }

    /// Travel speed on `highway` in km/h.
    #[inline]
    pub fn speed_kph(&self, highway: Highway) -> f32 {
        self.speed[highway.index()]
    }

    /// The highest speed over all allowed classes, in km/h.  Used to turn a
    /// great-circle distance into an admissible duration lower bound.
    pub fn max_speed_kph(&self) -> f32 {
        Highway::ALL
            .into_iter()
            .filter(|&h| self.allows_highway(h))
            .map(|h| self.speed[h.index()])
            .fold(0.0, f32::max)
    }

    /// Restrict the allowed classes to those with a non-zero speed.
    fn from_speeds(transport: Transport, speed: [f32; Highway::COUNT]) -> Profile {
        let allow = Highway::ALL
            .into_iter()
            .filter(|h| speed[h.index()] > 0.0)
            .fold(0u16, |mask, h| mask | h.bit());

        Profile {
            transport,
            allow,
            speed,
            oneway: true,
            turns: true,
            uturn: false,
            weight: None,
            height: None,
            width: None,
            length: None,
        }
    }

    /// The built-in default profile for `transport`.
    ///
    /// Speeds are conservative defaults in km/h, indexed as
    /// motorway, trunk, primary, secondary, tertiary, unclassified,
    /// residential, service, track, cycleway, path, steps, ferry.
    pub fn builtin(transport: Transport) -> Profile {
        match transport {
            Transport::Foot => {
                let mut p = Profile::from_speeds(
                    transport,
                    [0.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 10.0],
                );
                p.oneway = false;
                p.turns = false;
                p.uturn = true;
                p
            }
            Transport::Horse => {
                let mut p = Profile::from_speeds(
                    transport,
                    [0.0, 0.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 10.0],
                );
                p.uturn = true;
                p
            }
            Transport::Wheelchair => {
                let mut p = Profile::from_speeds(
                    transport,
                    [0.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 0.0, 4.0, 4.0, 0.0, 10.0],
                );
                p.oneway = false;
                p.turns = false;
                p.uturn = true;
                p.width = Some(0.8);
                p
            }
            Transport::Bicycle => Profile::from_speeds(
                transport,
                [0.0, 0.0, 20.0, 20.0, 20.0, 20.0, 20.0, 16.0, 12.0, 20.0, 12.0, 0.0, 10.0],
            ),
            Transport::Moped => Profile::from_speeds(
                transport,
                [0.0, 48.0, 48.0, 48.0, 48.0, 48.0, 40.0, 32.0, 0.0, 0.0, 0.0, 0.0, 10.0],
            ),
            Transport::Motorbike => Profile::from_speeds(
                transport,
                [112.0, 96.0, 96.0, 88.0, 80.0, 64.0, 48.0, 32.0, 0.0, 0.0, 0.0, 0.0, 10.0],
            ),
            Transport::Motorcar => Profile::from_speeds(
                transport,
                [112.0, 96.0, 96.0, 88.0, 80.0, 64.0, 48.0, 32.0, 16.0, 0.0, 0.0, 0.0, 10.0],
            ),
            Transport::Goods => {
                let mut p = Profile::from_speeds(
                    transport,
                    [96.0, 96.0, 96.0, 88.0, 80.0, 64.0, 48.0, 32.0, 16.0, 0.0, 0.0, 0.0, 10.0],
                );
                p.weight = Some(5.0);
                p.height = Some(2.5);
                p.width = Some(2.0);
                p.length = Some(5.0);
                p
            }
            Transport::Hgv => {
                let mut p = Profile::from_speeds(
                    transport,
                    [89.0, 80.0, 80.0, 80.0, 72.0, 64.0, 48.0, 32.0, 16.0, 0.0, 0.0, 0.0, 10.0],
                );
                p.weight = Some(10.0);
                p.height = Some(3.0);
                p.width = Some(2.5);
                p.length = Some(6.0);
                p
            }
            Transport::Psv => {
                let mut p = Profile::from_speeds(
                    transport,
                    [89.0, 80.0, 80.0, 80.0, 72.0, 64.0, 48.0, 32.0, 16.0, 0.0, 0.0, 0.0, 10.0],
                );
                p.weight = Some(15.0);
                p.height = Some(3.0);
                p.width = Some(2.5);
                p.length = Some(6.0);
                p
            }
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::builtin(Transport::default())
    }
}
