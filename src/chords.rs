//! Chord shapes offered by the chord picker.

use serde::{Serialize, Serializer};

/// Fret of a finger position; `Played(0)` is an open string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fret {
    Played(u8),
    Muted,
}

impl Serialize for Fret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fret::Played(fret) => serializer.serialize_u8(*fret),
            Fret::Muted => serializer.serialize_str("x"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Barre {
    pub from_string: u8,
    pub to_string: u8,
    pub fret: u8,
}

impl Barre {
    const fn new(from_string: u8, to_string: u8, fret: u8) -> Self {
        Self {
            from_string,
            to_string,
            fret,
        }
    }
}

/// A chord diagram: strings are numbered 1 (high E) to 6 (low E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordShape {
    pub title: &'static str,
    pub short_name: &'static str,
    pub fingers: &'static [(u8, Fret)],
    pub barres: &'static [Barre],
    pub position: u8,
}

pub fn catalog() -> &'static [ChordShape] {
    CATALOG
}

/// Case-sensitive lookup: `Am` and `AM` are different chords.
pub fn find_by_short_name(short_name: &str) -> Option<&'static ChordShape> {
    CATALOG.iter().find(|c| c.short_name == short_name.trim())
}

use Fret::{Muted as X, Played as F};

static CATALOG: &[ChordShape] = &[
    ChordShape {
        title: "A Major",
        short_name: "A",
        fingers: &[(2, F(2)), (3, F(2)), (4, F(2)), (5, F(0)), (6, X)],
        barres: &[Barre::new(4, 2, 2)],
        position: 1,
    },
    ChordShape {
        title: "A Minor",
        short_name: "Am",
        fingers: &[(2, F(1)), (3, F(2)), (4, F(2)), (5, F(0)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "B Major",
        short_name: "B",
        fingers: &[(1, F(2)), (2, F(4)), (3, F(4)), (4, F(4)), (5, F(2)), (6, X)],
        barres: &[Barre::new(5, 1, 2)],
        position: 1,
    },
    ChordShape {
        title: "B Minor",
        short_name: "Bm",
        fingers: &[(1, F(2)), (2, F(3)), (3, F(4)), (4, F(4)), (5, F(2)), (6, X)],
        barres: &[Barre::new(5, 1, 2)],
        position: 1,
    },
    ChordShape {
        title: "C Major",
        short_name: "C",
        fingers: &[(1, F(0)), (2, F(1)), (3, F(0)), (4, F(2)), (5, F(3)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "C Minor",
        short_name: "Cm",
        fingers: &[(1, F(3)), (2, F(4)), (3, F(5)), (4, F(5)), (5, F(3)), (6, X)],
        barres: &[Barre::new(5, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "D Major",
        short_name: "D",
        fingers: &[(1, F(2)), (2, F(3)), (3, F(2)), (4, F(0)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D Minor",
        short_name: "Dm",
        fingers: &[(1, F(1)), (2, F(3)), (3, F(2)), (4, F(0)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "E Major",
        short_name: "E",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(1)), (4, F(2)), (5, F(2)), (6, F(0))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "E Minor",
        short_name: "Em",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(0)), (4, F(2)), (5, F(2)), (6, F(0))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "F Major",
        short_name: "F",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "F Minor",
        short_name: "Fm",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(1)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "G Major",
        short_name: "G",
        fingers: &[(1, F(3)), (2, F(0)), (3, F(0)), (4, F(0)), (5, F(2)), (6, F(3))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "G Minor",
        short_name: "Gm",
        fingers: &[(5, F(3)), (4, F(3))],
        barres: &[Barre::new(5, 1, 1)],
        position: 3,
    },
    ChordShape {
        title: "A Minor 7",
        short_name: "Am7",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(2)), (4, F(2)), (5, F(1)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "E Minor 7",
        short_name: "Em7",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(0)), (4, F(2)), (5, F(2)), (6, F(0))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D Minor 7",
        short_name: "Dm7",
        fingers: &[(1, F(1)), (2, F(3)), (3, F(2)), (4, F(0)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "B Minor 7",
        short_name: "Bm7",
        fingers: &[(1, F(2)), (2, F(3)), (3, F(4)), (4, F(4)), (5, F(2)), (6, X)],
        barres: &[Barre::new(5, 1, 2)],
        position: 1,
    },
    ChordShape {
        title: "A7",
        short_name: "A7",
        fingers: &[(1, F(0)), (2, F(2)), (3, F(0)), (4, F(2)), (5, F(0)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "E7",
        short_name: "E7",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(1)), (4, F(0)), (5, F(2)), (6, F(0))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D7",
        short_name: "D7",
        fingers: &[(1, F(2)), (2, F(1)), (3, F(2)), (4, F(0)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "G7",
        short_name: "G7",
        fingers: &[(1, F(3)), (2, F(0)), (3, F(0)), (4, F(0)), (5, F(2)), (6, F(3))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "C7",
        short_name: "C7",
        fingers: &[(1, F(0)), (2, F(1)), (3, F(0)), (4, F(2)), (5, F(3)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "C Major 7",
        short_name: "CMaj7",
        fingers: &[(1, F(0)), (2, F(1)), (3, F(0)), (4, F(2)), (5, F(0)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "G Major 7",
        short_name: "GMaj7",
        fingers: &[(1, F(3)), (2, F(0)), (3, F(0)), (4, F(0)), (5, F(2)), (6, F(2))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D Major 7",
        short_name: "DMaj7",
        fingers: &[(1, F(2)), (2, F(3)), (3, F(2)), (4, F(0)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "A Major 7",
        short_name: "AMaj7",
        fingers: &[(1, F(0)), (2, F(2)), (3, F(2)), (4, F(2)), (5, F(0)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "E Major 7",
        short_name: "EMaj7",
        fingers: &[(1, F(0)), (2, F(0)), (3, F(1)), (4, F(1)), (5, F(2)), (6, F(0))],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "F Major 7",
        short_name: "FMaj7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "B Major 7",
        short_name: "BMaj7",
        fingers: &[(1, F(2)), (2, F(4)), (3, F(4)), (4, F(4)), (5, F(2)), (6, X)],
        barres: &[Barre::new(5, 1, 2)],
        position: 1,
    },
    ChordShape {
        title: "B7",
        short_name: "B7",
        fingers: &[(1, F(2)), (2, F(4)), (3, F(4)), (4, F(4)), (5, F(2)), (6, X)],
        barres: &[Barre::new(5, 1, 2)],
        position: 1,
    },
    ChordShape {
        title: "C Minor 7",
        short_name: "Cm7",
        fingers: &[(1, F(3)), (2, F(4)), (3, F(5)), (4, F(5)), (5, F(3)), (6, X)],
        barres: &[Barre::new(5, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "F7",
        short_name: "F7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "F Minor 7",
        short_name: "Fm7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(1)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "G Minor 7",
        short_name: "Gm7",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(3)), (4, F(5)), (5, F(5)), (6, X)],
        barres: &[Barre::new(5, 1, 3)],
        position: 1,
    },
    ChordShape {
        title: "F# Major",
        short_name: "F#",
        fingers: &[(1, F(2)), (2, F(2)), (3, F(3)), (4, F(4)), (5, F(4)), (6, F(2))],
        barres: &[Barre::new(6, 1, 2)],
        position: 2,
    },
    ChordShape {
        title: "F# Minor",
        short_name: "F#m",
        fingers: &[(1, F(2)), (2, F(2)), (3, F(2)), (4, F(4)), (5, F(4)), (6, F(2))],
        barres: &[Barre::new(6, 1, 2)],
        position: 2,
    },
    ChordShape {
        title: "F#7",
        short_name: "F#7",
        fingers: &[(1, F(2)), (2, F(2)), (3, F(3)), (4, F(4)), (5, F(4)), (6, F(2))],
        barres: &[Barre::new(6, 1, 2)],
        position: 2,
    },
    ChordShape {
        title: "F# Minor 7",
        short_name: "F#m7",
        fingers: &[(1, F(2)), (2, F(2)), (3, F(2)), (4, F(4)), (5, F(4)), (6, F(2))],
        barres: &[Barre::new(6, 1, 2)],
        position: 2,
    },
    ChordShape {
        title: "F# Major 7",
        short_name: "F#Maj7",
        fingers: &[(1, F(2)), (2, F(2)), (3, F(3)), (4, F(4)), (5, F(4)), (6, F(2))],
        barres: &[Barre::new(6, 1, 2)],
        position: 2,
    },
    ChordShape {
        title: "G# Major",
        short_name: "G#",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(4)), (4, F(5)), (5, F(5)), (6, F(3))],
        barres: &[Barre::new(6, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "G# Minor",
        short_name: "G#m",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(3)), (4, F(5)), (5, F(5)), (6, F(3))],
        barres: &[Barre::new(6, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "G#7",
        short_name: "G#7",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(4)), (4, F(5)), (5, F(5)), (6, F(3))],
        barres: &[Barre::new(6, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "G# Minor 7",
        short_name: "G#m7",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(3)), (4, F(5)), (5, F(5)), (6, F(3))],
        barres: &[Barre::new(6, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "G# Major 7",
        short_name: "G#Maj7",
        fingers: &[(1, F(3)), (2, F(3)), (3, F(4)), (4, F(5)), (5, F(5)), (6, F(3))],
        barres: &[Barre::new(6, 1, 3)],
        position: 3,
    },
    ChordShape {
        title: "A# Major",
        short_name: "A#",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "A# Minor",
        short_name: "A#m",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(1)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "A#7",
        short_name: "A#7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "A# Minor 7",
        short_name: "A#m7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(1)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "A# Major 7",
        short_name: "A#Maj7",
        fingers: &[(1, F(1)), (2, F(1)), (3, F(2)), (4, F(3)), (5, F(3)), (6, F(1))],
        barres: &[Barre::new(6, 1, 1)],
        position: 1,
    },
    ChordShape {
        title: "C# Major",
        short_name: "C#",
        fingers: &[(1, F(1)), (2, F(2)), (3, F(1)), (4, F(3)), (5, F(4)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "C# Minor",
        short_name: "C#m",
        fingers: &[(1, F(4)), (2, F(5)), (3, F(6)), (4, F(6)), (5, F(4)), (6, X)],
        barres: &[Barre::new(5, 1, 4)],
        position: 4,
    },
    ChordShape {
        title: "C#7",
        short_name: "C#7",
        fingers: &[(1, F(1)), (2, F(2)), (3, F(1)), (4, F(3)), (5, F(4)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "C# Minor 7",
        short_name: "C#m7",
        fingers: &[(1, F(4)), (2, F(5)), (3, F(6)), (4, F(6)), (5, F(4)), (6, X)],
        barres: &[Barre::new(5, 1, 4)],
        position: 4,
    },
    ChordShape {
        title: "C# Major 7",
        short_name: "C#Maj7",
        fingers: &[(1, F(1)), (2, F(2)), (3, F(1)), (4, F(3)), (5, F(1)), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D# Major",
        short_name: "D#",
        fingers: &[(1, F(3)), (2, F(4)), (3, F(3)), (4, F(1)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D# Minor",
        short_name: "D#m",
        fingers: &[(1, F(2)), (2, F(4)), (3, F(3)), (4, F(1)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D#7",
        short_name: "D#7",
        fingers: &[(1, F(3)), (2, F(4)), (3, F(3)), (4, F(1)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D# Minor 7",
        short_name: "D#m7",
        fingers: &[(1, F(2)), (2, F(4)), (3, F(3)), (4, F(1)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
    ChordShape {
        title: "D# Major 7",
        short_name: "D#Maj7",
        fingers: &[(1, F(3)), (2, F(4)), (3, F(3)), (4, F(1)), (5, X), (6, X)],
        barres: &[],
        position: 1,
    },
];
