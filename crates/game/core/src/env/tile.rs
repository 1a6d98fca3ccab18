/// Classification of a single grid cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Ground = 0,
    /// Barns. Blocks movement and path search.
    Solid = 1,
    /// Fences. Blocks movement unless the mover is leaping.
    Jumpable = 2,
    /// Ponds. Blocks movement but stays navigable for path search.
    Water = 3,
    /// Home burrow marker.
    Burrow = 4,
}

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        TileKind::Ground,
        TileKind::Solid,
        TileKind::Jumpable,
        TileKind::Water,
        TileKind::Burrow,
    ];

    /// Whether a moving box touching this tile is stopped.
    pub fn is_blocking(self, include_jumpable: bool) -> bool {
        match self {
            TileKind::Solid | TileKind::Water => true,
            TileKind::Jumpable => include_jumpable,
            TileKind::Ground | TileKind::Burrow => false,
        }
    }

    /// Whether path search may route through this tile.
    pub fn is_navigable(self) -> bool {
        self != TileKind::Solid
    }

    /// Single-character form used by text map layouts.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Ground => '.',
            TileKind::Solid => '#',
            TileKind::Jumpable => '+',
            TileKind::Water => '~',
            TileKind::Burrow => 'o',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.glyph() == glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_rules() {
        for include in [false, true] {
            assert!(TileKind::Solid.is_blocking(include));
            assert!(TileKind::Water.is_blocking(include));
            assert!(!TileKind::Ground.is_blocking(include));
            assert!(!TileKind::Burrow.is_blocking(include));
        }
        assert!(TileKind::Jumpable.is_blocking(true));
        assert!(!TileKind::Jumpable.is_blocking(false));
    }

    #[test]
    fn water_is_navigable_but_solid_is_not() {
        assert!(TileKind::Water.is_navigable());
        assert!(!TileKind::Solid.is_navigable());
    }

    #[test]
    fn glyphs_and_names_resolve() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(TileKind::from_glyph('?'), None);
        assert_eq!("jumpable".parse::<TileKind>().ok(), Some(TileKind::Jumpable));
        assert_eq!(TileKind::Water.to_string(), "water");
    }
}
