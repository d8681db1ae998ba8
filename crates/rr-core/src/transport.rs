//! Transport types and the per-way allowed-transports bitmask.

/// The means of transport a route is computed for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Transport {
    Foot,
    Horse,
    Wheelchair,
    Bicycle,
    Moped,
    Motorbike,
    #[default]
    Motorcar,
    Goods,
    Hgv,
    Psv,
}

impl Transport {
    pub const COUNT: usize = 10;

    pub const ALL: [Transport; Transport::COUNT] = [
        Transport::Foot,
        Transport::Horse,
        Transport::Wheelchair,
        Transport::Bicycle,
        Transport::Moped,
        Transport::Motorbike,
        Transport::Motorcar,
        Transport::Goods,
        Transport::Hgv,
        Transport::Psv,
    ];

    /// Bit for use in a [`Transports`] mask.
    #[inline(always)]
    pub fn bit(self) -> u16 {
        1 << self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Foot => "foot",
            Transport::Horse => "horse",
            Transport::Wheelchair => "wheelchair",
            Transport::Bicycle => "bicycle",
            Transport::Moped => "moped",
            Transport::Motorbike => "motorbike",
            Transport::Motorcar => "motorcar",
            Transport::Goods => "goods",
            Transport::Hgv => "hgv",
            Transport::Psv => "psv",
        }
    }

    /// Parse the canonical lowercase name.
    pub fn from_name(name: &str) -> Option<Transport> {
        Transport::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Transports bitmask ────────────────────────────────────────────────────────

/// Set of transports permitted on a way.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transports(pub u16);

impl Transports {
    pub const NONE: Transports = Transports(0);
    pub const ALL: Transports = Transports((1 << Transport::COUNT as u16) - 1);

    #[inline]
    pub fn single(t: Transport) -> Transports {
        Transports(t.bit())
    }

    #[inline]
    pub fn contains(self, t: Transport) -> bool {
        self.0 & t.bit() != 0
    }

    #[inline]
    pub fn with(self, t: Transport) -> Transports {
        Transports(self.0 | t.bit())
    }
}

impl FromIterator<Transport> for Transports {
    fn from_iter<I: IntoIterator<Item = Transport>>(iter: I) -> Self {
        iter.into_iter().fold(Transports::NONE, Transports::with)
    }
}
