use serde::{Deserialize, Serialize};

/// Held-button mask in pad wire layout (bit set = held).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const L2: u16 = 1 << 0;
    pub const R2: u16 = 1 << 1;
    pub const L1: u16 = 1 << 2;
    pub const R1: u16 = 1 << 3;
    pub const TRIANGLE: u16 = 1 << 4;
    pub const CIRCLE: u16 = 1 << 5;
    pub const CROSS: u16 = 1 << 6;
    pub const SQUARE: u16 = 1 << 7;
    pub const SELECT: u16 = 1 << 8;
    pub const L3: u16 = 1 << 9;
    pub const R3: u16 = 1 << 10;
    pub const START: u16 = 1 << 11;
    pub const UP: u16 = 1 << 12;
    pub const RIGHT: u16 = 1 << 13;
    pub const DOWN: u16 = 1 << 14;
    pub const LEFT: u16 = 1 << 15;

    pub const NONE: Self = Self(0);

    /// Decode a wire mask where a cleared bit means held.
    pub fn from_active_low(raw: u16) -> Self {
        Self(!raw)
    }

    pub fn held(self, button: u16) -> bool {
        self.0 & button != 0
    }

    pub fn with(self, button: u16) -> Self {
        Self(self.0 | button)
    }
}

/// Direction of one stick axis after the dead zone is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDir {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl AxisDir {
    pub fn sign(self) -> i32 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Neutral => Self::Neutral,
            Self::Positive => Self::Negative,
        }
    }
}

/// One analog stick, unsigned bytes centred on [`Stick::CENTRE`].
/// Smaller `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stick {
    pub x: u8,
    pub y: u8,
}

impl Default for Stick {
    fn default() -> Self {
        Self::CENTRED
    }
}

impl Stick {
    pub const CENTRE: u8 = 127;
    pub const CENTRED: Self = Self {
        x: Self::CENTRE,
        y: Self::CENTRE,
    };

    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// `(x, y)` directions outside a dead zone of `dead_zone` around the centre.
    pub fn direction(self, dead_zone: u8) -> (AxisDir, AxisDir) {
        (axis(self.x, dead_zone), axis(self.y, dead_zone))
    }
}

fn axis(value: u8, dead_zone: u8) -> AxisDir {
    let value = i32::from(value);
    let centre = i32::from(Stick::CENTRE);
    let dz = i32::from(dead_zone);
    if value < centre - dz {
        AxisDir::Negative
    } else if value > centre + dz {
        AxisDir::Positive
    } else {
        AxisDir::Neutral
    }
}

/// One device sample. `status == 0` means the sample is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadReport {
    pub status: u8,
    pub buttons: Buttons,
    pub left: Stick,
    pub right: Stick,
}

impl PadReport {
    /// Ready report with centred sticks and nothing held.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn not_ready() -> Self {
        Self {
            status: 0xff,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == 0
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = Buttons(buttons);
        self
    }

    pub fn with_left(mut self, x: u8, y: u8) -> Self {
        self.left = Stick::new(x, y);
        self
    }

    pub fn with_right(mut self, x: u8, y: u8) -> Self {
        self.right = Stick::new(x, y);
        self
    }
}
