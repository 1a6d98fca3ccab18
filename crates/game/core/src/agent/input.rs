use bitflags::bitflags;

bitflags! {
    /// Keys held during one tick, as sampled by the input collaborator.
    ///
    /// Opposing directions may both be set; the player controller resolves
    /// them (down wins over up, right over left).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct InputState: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
        const LEAP  = 1 << 4;
        const HIDE  = 1 << 5;
    }
}

impl InputState {
    pub const MOVEMENT: Self = Self::UP.union(Self::DOWN).union(Self::LEFT).union(Self::RIGHT);
}
