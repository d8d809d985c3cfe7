use crate::bitmask_flags::{BitmaskFlags, FlagBitmask};

/// One logical movement flag. Several physical keys may map onto the same flag.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntentFlag {
    Forward = 0,
    Backward = 1,
    Left = 2,
    Right = 3,
    Sprint = 4,
}

impl IntentFlag {
    pub const ALL: [IntentFlag; 5] = [
        IntentFlag::Forward,
        IntentFlag::Backward,
        IntentFlag::Left,
        IntentFlag::Right,
        IntentFlag::Sprint,
    ];

    pub const DIRECTIONS: [IntentFlag; 4] = [
        IntentFlag::Forward,
        IntentFlag::Backward,
        IntentFlag::Left,
        IntentFlag::Right,
    ];
}

impl FlagBitmask for IntentFlag {
    type Storage = u8;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// What the user currently wants to do, independent of which physical keys are held.
///
/// State only changes on key edges. A press on an already-held flag is a no-op, and a release
/// clears the flag no matter which of its physical keys went up.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct MovementIntent {
    flags: BitmaskFlags<u8>,
}

impl MovementIntent {
    /// Apply one press (`pressed = true`) or release edge for a logical flag.
    #[inline]
    pub fn on_flag_edge(&mut self, flag: IntentFlag, pressed: bool) {
        self.flags.set(flag, pressed);
    }

    /// Apply an edge for an optional flag. Unmapped keys arrive as `None` and are ignored.
    #[inline]
    pub fn on_key_edge(&mut self, flag: Option<IntentFlag>, pressed: bool) {
        if let Some(flag) = flag {
            self.on_flag_edge(flag, pressed);
        }
    }

    #[inline]
    pub fn has(&self, flag: IntentFlag) -> bool {
        self.flags.has(flag)
    }

    pub fn forward(&self) -> bool {
        self.has(IntentFlag::Forward)
    }

    pub fn backward(&self) -> bool {
        self.has(IntentFlag::Backward)
    }

    pub fn left(&self) -> bool {
        self.has(IntentFlag::Left)
    }

    pub fn right(&self) -> bool {
        self.has(IntentFlag::Right)
    }

    pub fn sprint(&self) -> bool {
        self.has(IntentFlag::Sprint)
    }

    /// True when any directional flag is held. Sprint alone does not move the character.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.flags.has_any(&IntentFlag::DIRECTIONS)
    }

    /// Drop every held flag, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}
