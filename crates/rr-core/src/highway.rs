//! The highway-class taxonomy shared by ways, profiles, and the annotator.

/// Classification of a way, from most to least major.
///
/// The discriminant order matters: profile speed tables and the junction
/// importance matrix are indexed by it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Highway {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Service,
    Track,
    Cycleway,
    Path,
    Steps,
    Ferry,
}

/// Whether a junction branch is worth mentioning in route instructions.
///
/// Row = class of the way being travelled, column = class of the branch not
/// taken.  A motorway driver does not care about a crossing path; on a path
/// every branch matters.
const JUNCTION_OTHER_WAY: [[bool; Highway::COUNT]; Highway::COUNT] = {
    const T: bool = true;
    const F: bool = false;
    [
        // M, T, P, S, T, U, R, S, T, C, P, S, F = class of branch not taken
        [T, F, F, F, F, F, F, F, F, F, F, F, T], // Motorway
        [T, T, F, F, F, F, F, F, F, F, F, F, T], // Trunk
        [T, T, T, F, F, F, F, F, F, F, F, F, T], // Primary
        [T, T, T, T, F, F, F, F, F, F, F, F, T], // Secondary
        [T, T, T, T, T, F, F, F, F, F, F, F, T], // Tertiary
        [T, T, T, T, T, T, F, F, F, F, F, F, T], // Unclassified
        [T, T, T, T, T, T, T, F, F, F, F, F, T], // Residential
        [T, T, T, T, T, T, T, T, F, F, F, F, T], // Service
        [T, T, T, T, T, T, T, T, T, F, F, F, T], // Track
        [T, T, T, T, T, T, T, T, T, T, F, F, T], // Cycleway
        [T, T, T, T, T, T, T, T, T, T, T, T, T], // Path
        [T, T, T, T, T, T, T, T, T, T, T, T, T], // Steps
        [T, T, T, T, T, T, T, T, T, T, T, T, T], // Ferry
    ]
};

impl Highway {
    /// Number of highway classes.
    pub const COUNT: usize = 13;

    /// All classes in declaration order.
    pub const ALL: [Highway; Highway::COUNT] = [
        Highway::Motorway,
        Highway::Trunk,
        Highway::Primary,
        Highway::Secondary,
        Highway::Tertiary,
        Highway::Unclassified,
        Highway::Residential,
        Highway::Service,
        Highway::Track,
        Highway::Cycleway,
        Highway::Path,
        Highway::Steps,
        Highway::Ferry,
    ];

    /// Table position, usable as an array index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` if a branch of class `other`, not taken at a junction while
    /// travelling a way of class `self`, should be mentioned.
    #[inline]
    pub fn junction_important(self, other: Highway) -> bool {
        JUNCTION_OTHER_WAY[self.index()][other.index()]
    }

    /// Bit for use in an allowed-highways mask.
    #[inline(always)]
    pub fn bit(self) -> u16 {
        1 << self.index()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Highway::Motorway => "motorway",
            Highway::Trunk => "trunk",
            Highway::Primary => "primary",
            Highway::Secondary => "secondary",
            Highway::Tertiary => "tertiary",
            Highway::Unclassified => "unclassified",
            Highway::Residential => "residential",
            Highway::Service => "service",
            Highway::Track => "track",
            Highway::Cycleway => "cycleway",
            Highway::Path => "path",
            Highway::Steps => "steps",
            Highway::Ferry => "ferry",
        }
    }

    /// Parse the canonical lowercase name.
    pub fn from_name(name: &str) -> Option<Highway> {
        Highway::ALL.into_iter().find(|h| h.as_str() == name)
    }

    /// Decode a table index as stored in graph files.
    pub fn from_index(i: u8) -> Option<Highway> {
        Highway::ALL.get(i as usize).copied()
    }
}

impl std::fmt::Display for Highway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
