use crate::image_classifier::models::model_config::TensorLayout;
use image::{imageops, RgbImage};
use tract_onnx::prelude::*;

/// Scales `image` to fit `width`x`height`, keeping its aspect ratio and
/// padding the remainder with black.
pub fn resize_image(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.width() == image.height() && width == height {
        return imageops::resize(image, width, height, imageops::FilterType::Triangle);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);

    let mut padded = RgbImage::new(width, height);
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;

    for (x, y, pixel) in scaled.enumerate_pixels() {
        padded.put_pixel(x + x_offset, y + y_offset, *pixel);
    }

    padded
}

fn image_to_tensor(image: &RgbImage, layout: TensorLayout) -> Tensor {
    let (height, width) = (image.height() as usize, image.width() as usize);

    match layout {
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
                image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
            })
            .into()
        }
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
            })
            .into()
        }
    }
}

pub fn resize_image_to_tensor(
    image: &RgbImage,
    width: u32,
    height: u32,
    layout: TensorLayout,
) -> Tensor {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized, layout)
}
