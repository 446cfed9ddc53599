/// 8-bit RGBA color

use glam::Vec4;

/// RGBA color with 0-255 channels
///
/// Defaults to opaque white. Uploads always go through the normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    /// Opaque color
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Channels as floats, divided by 255 when `normalize` is set
    pub fn to_array(&self, normalize: bool) -> [f32; 4] {
        let channels = [
            self.red as f32,
            self.green as f32,
            self.blue as f32,
            self.alpha as f32,
        ];
        if normalize {
            channels.map(|c| c / 255.0)
        } else {
            channels
        }
    }

    /// Normalized color as a vector, the form uploaded to shaders
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::from_array(self.to_array(true))
    }

    /// Whether the alpha channel is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.alpha == u8::MAX
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
