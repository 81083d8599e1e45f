/// Opaque color channel triple, 0-255 per channel.
pub type Rgb = [u8; 3];

/// Color with alpha, 0-255 per channel.
pub type Rgba = [u8; 4];

/// Attach an alpha channel to an RGB triple.
pub const fn with_alpha(rgb: Rgb, alpha: u8) -> Rgba {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Fully opaque variant of an RGB triple.
pub const fn opaque(rgb: Rgb) -> Rgba {
    with_alpha(rgb, 255)
}

/// Scale a unit opacity into an alpha channel value.
///
/// Input outside `[0, 1]` is clamped so upstream data noise cannot wrap.
pub fn alpha_from_unit(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
