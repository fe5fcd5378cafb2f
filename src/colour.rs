/// A fill colour in the DeviceRGB space; r, g, and b range from 0.0 to 1.0
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a `#RRGGBB` or `#RGB` colour (the `#` is optional, surrounding whitespace
    /// is ignored). Returns [None] for anything else.
    pub fn from_hex(hex: &str) -> Option<Colour> {
        let s = hex.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        match s.len() {
            6 => Some(Colour::new_rgb_bytes(
                channel(&s[0..2])?,
                channel(&s[2..4])?,
                channel(&s[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let twice = |i: usize| channel(&s[i..i + 1]).map(|c| c * 17);
                Some(Colour::new_rgb_bytes(twice(0)?, twice(1)?, twice(2)?))
            }
            _ => None,
        }
    }

    /// Parse a hex colour, falling back to black when the input is absent or invalid
    pub fn from_hex_or_black(hex: Option<&str>) -> Colour {
        hex.and_then(Colour::from_hex).unwrap_or(colours::BLACK)
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

impl<T: Into<f32>> From<[T; 3]> for Colour {
    fn from(c: [T; 3]) -> Self {
        let [r, g, b] = c;
        Colour {
            r: r.into(),
            g: g.into(),
            b: b.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Colour = Colour {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const RED: Colour = Colour {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}
