// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sigilcore

//! Image loading and saving.
//!
//! The codec itself only sees [`Channel`] grids; this module is the
//! boundary to image files. Color images embed in the blue channel by
//! convention and are reassembled around the watermarked channel on save;
//! grayscale images round-trip their single channel. Saving clamps
//! samples to 0–255 and rounds to 8-bit, so out-of-range excursions from
//! the embedding are clipped rather than wrapped.

use std::path::Path;

use crate::transform::Channel;
use crate::wm::WatermarkError;

/// A decoded image, reduced to the channels the codec cares about.
#[derive(Debug, Clone)]
pub enum LoadedImage {
    /// Single-channel image.
    Gray(Channel),
    /// Color image split into planar channels.
    Rgb {
        red: Channel,
        green: Channel,
        blue: Channel,
    },
}

impl LoadedImage {
    /// The channel bits are embedded into: blue for color, the only
    /// channel for grayscale.
    pub fn embed_channel(&self) -> &Channel {
        match self {
            Self::Gray(ch) => ch,
            Self::Rgb { blue, .. } => blue,
        }
    }

    /// Replace the embedding channel, keeping the others untouched.
    ///
    /// # Panics
    /// Panics if the replacement dimensions differ from the original; the
    /// embedding pipeline always preserves the channel shape.
    pub fn with_embed_channel(self, channel: Channel) -> Self {
        match self {
            Self::Gray(old) => {
                assert_eq!((old.width(), old.height()), (channel.width(), channel.height()));
                Self::Gray(channel)
            }
            Self::Rgb { red, green, blue } => {
                assert_eq!(
                    (blue.width(), blue.height()),
                    (channel.width(), channel.height())
                );
                Self::Rgb {
                    red,
                    green,
                    blue: channel,
                }
            }
        }
    }

    pub fn width(&self) -> usize {
        self.embed_channel().width()
    }

    pub fn height(&self) -> usize {
        self.embed_channel().height()
    }
}

/// Produces pixel channels from stored images.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<LoadedImage, WatermarkError>;
}

/// Consumes pixel channels back into stored images.
pub trait ImageSink {
    fn save(&self, path: &Path, image: &LoadedImage) -> Result<(), WatermarkError>;
}

/// Filesystem image I/O via the `image` crate. PNG, JPEG and BMP are
/// enabled; the container format follows the file extension on save.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageIo;

fn clamp_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

impl ImageSource for FsImageIo {
    fn load(&self, path: &Path) -> Result<LoadedImage, WatermarkError> {
        let dynamic = image::open(path)?;

        match dynamic {
            image::DynamicImage::ImageLuma8(gray) => {
                let (w, h) = (gray.width() as usize, gray.height() as usize);
                let data = gray.pixels().map(|p| p.0[0] as f32).collect();
                Ok(LoadedImage::Gray(Channel::from_vec(w, h, data)))
            }
            other => {
                let rgb = other.to_rgb8();
                let (w, h) = (rgb.width() as usize, rgb.height() as usize);
                let mut red = Vec::with_capacity(w * h);
                let mut green = Vec::with_capacity(w * h);
                let mut blue = Vec::with_capacity(w * h);
                for pixel in rgb.pixels() {
                    red.push(pixel.0[0] as f32);
                    green.push(pixel.0[1] as f32);
                    blue.push(pixel.0[2] as f32);
                }
                Ok(LoadedImage::Rgb {
                    red: Channel::from_vec(w, h, red),
                    green: Channel::from_vec(w, h, green),
                    blue: Channel::from_vec(w, h, blue),
                })
            }
        }
    }
}

impl ImageSink for FsImageIo {
    fn save(&self, path: &Path, img: &LoadedImage) -> Result<(), WatermarkError> {
        match img {
            LoadedImage::Gray(ch) => {
                let (w, h) = (ch.width() as u32, ch.height() as u32);
                let data: Vec<u8> = ch.data().iter().map(|&v| clamp_u8(v)).collect();
                let buffer = image::GrayImage::from_raw(w, h, data)
                    .expect("channel dimensions match sample count");
                buffer.save(path)?;
            }
            LoadedImage::Rgb { red, green, blue } => {
                let (w, h) = (red.width() as u32, red.height() as u32);
                let mut data = Vec::with_capacity(red.data().len() * 3);
                for i in 0..red.data().len() {
                    data.push(clamp_u8(red.data()[i]));
                    data.push(clamp_u8(green.data()[i]));
                    data.push(clamp_u8(blue.data()[i]));
                }
                let buffer = image::RgbImage::from_raw(w, h, data)
                    .expect("channel dimensions match sample count");
                buffer.save(path)?;
            }
        }
        Ok(())
    }
}
