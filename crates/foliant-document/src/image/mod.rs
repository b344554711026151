// SPDX-License-Identifier: MIT
//
// Image helpers — sample card artwork and PNG encoding.

use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use foliant_core::error::{FoliantError, Result};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;

/// Border colour for generated sample cards.
const BORDER: Rgb<u8> = Rgb([40, 40, 40]);

// -- Sample artwork -----------------------------------------------------------

/// Generate a white card with a dark rectangular border.
///
/// The border sits at one twelfth of the shorter edge and is three pixels
/// thick. Cards are used as placeholder input for the image operations.
pub fn sample_card(width: u32, height: u32) -> RgbImage {
    let mut card = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let inset = width.min(height) / 12;
    for offset in 0..3u32 {
        let edge = inset + offset;
        if width <= 2 * edge + 1 || height <= 2 * edge + 1 {
            break;
        }
        draw_hollow_rect_mut(
            &mut card,
            Rect::at(edge as i32, edge as i32).of_size(width - 2 * edge, height - 2 * edge),
            BORDER,
        );
    }

    card
}

/// Generate a sample card and encode it as PNG bytes.
pub fn sample_card_png(width: u32, height: u32) -> Result<Vec<u8>> {
    encode_png(&DynamicImage::ImageRgb8(sample_card(width, height)))
}

// -- Encoding -----------------------------------------------------------------

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| FoliantError::ImageError(format!("failed to encode PNG: {}", err)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_has_a_white_field_and_a_dark_border() {
        let card = sample_card(800, 600);
        assert_eq!(card.dimensions(), (800, 600));

        // Corner and centre stay white; 600 / 12 puts the border at 50.
        assert_eq!(*card.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*card.get_pixel(400, 300), Rgb([255, 255, 255]));
        assert_eq!(*card.get_pixel(50, 50), BORDER);
        assert_eq!(*card.get_pixel(52, 52), BORDER);
        assert_eq!(*card.get_pixel(53, 53), Rgb([255, 255, 255]));
    }

    #[test]
    fn tiny_cards_do_not_panic() {
        let card = sample_card(4, 4);
        assert_eq!(card.dimensions(), (4, 4));
    }

    #[test]
    fn png_bytes_decode_back_to_the_same_size() {
        let bytes = sample_card_png(64, 48).unwrap();
        let decoded = ::image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
