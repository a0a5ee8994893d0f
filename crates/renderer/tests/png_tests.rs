//! Tests for PNG encoding: output must decode as 8-bit RGBA with the exact
//! pixels that went in.

use renderer::png::create_png;

// ============================================================================
// Helper functions
// ============================================================================

/// Two-colour pattern like a real overlay: red water, transparent land.
fn generate_overlay_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if (x / 8 + y / 8) % 3 == 0 {
                pixels.extend_from_slice(&[255, 0, 0, 200]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    pixels
}

// ============================================================================
// Decoding tests
// ============================================================================

#[test]
fn test_create_png_simple() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 0, 255, 255, // blue
        255, 255, 255, 0, // transparent white
    ];

    let png = create_png(&pixels, 2, 2).unwrap();
    let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgba8);

    let rgba = decoded.to_rgba8();
    assert_eq!(rgba.dimensions(), (2, 2));
    assert_eq!(rgba.as_raw().as_slice(), &pixels[..]);
}

#[test]
fn test_non_square_orientation() {
    // 3 wide, 2 tall: first row must stay on top.
    let mut pixels = vec![0u8; 3 * 2 * 4];
    pixels[0..4].copy_from_slice(&[1, 2, 3, 4]);
    pixels[20..24].copy_from_slice(&[9, 8, 7, 6]);

    let png = create_png(&pixels, 3, 2).unwrap();
    let rgba = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(rgba.dimensions(), (3, 2));
    assert_eq!(rgba.get_pixel(0, 0).0, [1, 2, 3, 4]);
    assert_eq!(rgba.get_pixel(2, 1).0, [9, 8, 7, 6]);
}

#[test]
fn test_overlay_sized_image_roundtrip() {
    let (width, height) = (800, 563);
    let pixels = generate_overlay_pixels(width, height);
    let png = create_png(&pixels, width, height).unwrap();

    let rgba = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(rgba.dimensions(), (width as u32, height as u32));
    assert_eq!(rgba.as_raw(), &pixels);

    // Two-colour overlays compress well.
    assert!(png.len() < pixels.len() / 10, "png is {} bytes", png.len());
}

#[test]
fn test_single_pixel() {
    let png = create_png(&[255, 0, 0, 200], 1, 1).unwrap();
    let rgba = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 200]);
}
