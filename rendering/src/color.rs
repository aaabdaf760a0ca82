use std::sync::LazyLock;

use glam::Vec4;

/// Number of hue steps in the outfit color grid (one row per saturation/intensity pair).
pub const HSI_H_STEPS: u32 = 19;
/// Number of saturation/intensity rows in the outfit color grid.
pub const HSI_SI_VALUES: u32 = 7;
/// Size of the 6x6x6 web palette addressed by 8-bit color codes.
pub const EIGHT_BIT_PALETTE_SIZE: usize = 216;

static EIGHT_BIT_PALETTE: LazyLock<[Color; EIGHT_BIT_PALETTE_SIZE]> = LazyLock::new(|| {
    std::array::from_fn(|index| {
        let index = index as u32;
        let r = (index / 36) % 6 * 51;
        let g = (index / 6) % 6 * 51;
        let b = index % 6 * 51;
        Color::rgb(r as u8, g as u8, b as u8)
    })
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn from_rgb(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Looks up a code of the 216-entry web palette. Codes past the palette
    /// are the caller's responsibility to filter out.
    pub fn from_8bit(index: u8) -> Self {
        debug_assert!(
            (index as usize) < EIGHT_BIT_PALETTE_SIZE,
            "8-bit color {index} outside palette"
        );
        EIGHT_BIT_PALETTE
            .get(index as usize)
            .copied()
            .unwrap_or(Color::BLACK)
    }

    /// Converts an outfit color code into RGB.
    ///
    /// The code packs a hue step (`code % 19`) and a saturation/intensity row
    /// (`code / 19`). Hue step 0 is the grey column, getting darker row by row.
    /// Codes outside the 19x7 grid fall back to code 0.
    pub fn from_hsi(packed: u32) -> Self {
        let color = if packed >= HSI_H_STEPS * HSI_SI_VALUES {
            0
        } else {
            packed
        };

        let (hue, saturation, intensity) = if color % HSI_H_STEPS != 0 {
            let hue = (color % HSI_H_STEPS) as f32 / 18.0;
            let (saturation, intensity) = match color / HSI_H_STEPS {
                0 => (0.25, 1.0),
                1 => (0.25, 0.75),
                2 => (0.5, 0.75),
                3 => (0.667, 0.75),
                4 => (1.0, 1.0),
                5 => (1.0, 0.75),
                _ => (1.0, 0.5),
            };
            (hue, saturation, intensity)
        } else {
            (
                0.0,
                0.0,
                1.0 - color as f32 / HSI_H_STEPS as f32 / HSI_SI_VALUES as f32,
            )
        };

        if intensity == 0.0 {
            return Color::BLACK;
        }

        if saturation == 0.0 {
            let grey = (intensity * 255.0) as u8;
            return Color::rgb(grey, grey, grey);
        }

        let (red, green, blue);
        if hue < 1.0 / 6.0 {
            red = intensity;
            blue = intensity * (1.0 - saturation);
            green = blue + (intensity - blue) * 6.0 * hue;
        } else if hue < 2.0 / 6.0 {
            green = intensity;
            blue = intensity * (1.0 - saturation);
            red = green - (intensity - blue) * (6.0 * hue - 1.0);
        } else if hue < 3.0 / 6.0 {
            green = intensity;
            red = intensity * (1.0 - saturation);
            blue = red + (intensity - red) * (6.0 * hue - 2.0);
        } else if hue < 4.0 / 6.0 {
            blue = intensity;
            red = intensity * (1.0 - saturation);
            green = blue - (intensity - red) * (6.0 * hue - 3.0);
        } else if hue < 5.0 / 6.0 {
            blue = intensity;
            green = intensity * (1.0 - saturation);
            red = green + (intensity - green) * (6.0 * hue - 4.0);
        } else {
            red = intensity;
            green = intensity * (1.0 - saturation);
            blue = red - (intensity - green) * (6.0 * hue - 5.0);
        }

        Color::rgb(
            (red * 255.0) as u8,
            (green * 255.0) as u8,
            (blue * 255.0) as u8,
        )
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}
