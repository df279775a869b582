//! Pixel mask provider
//!
//! The map is rasterized once into an RGBA buffer; a point is walkable when
//! its pixel is opaque enough to be drawn (alpha > 0) and its colour sits
//! within a per-channel tolerance of the walkable colour.
//!
//! Rasterization is a separate [`RasterJob`] so hosts can run it off the
//! input path. Until it completes the provider fails closed. The job only
//! holds a weak handle to the provider's buffer slot: once the provider is
//! dropped (stage torn down) a late job finds nothing to write into and is
//! abandoned.

use std::cell::OnceCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use resvg::{tiny_skia, usvg};
use serde::{Deserialize, Serialize};

use super::CollisionProvider;
use crate::consts::COLOR_TOLERANCE;
use crate::error::RegionError;
use crate::geom::RegionDescription;
use crate::pixel_of;

/// Opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Every channel within `tolerance` of this colour
    #[inline]
    pub fn matches(&self, [r, g, b]: [u8; 3], tolerance: u8) -> bool {
        r.abs_diff(self.r) <= tolerance
            && g.abs_diff(self.g) <= tolerance
            && b.abs_diff(self.b) <= tolerance
    }
}

/// Immutable straight-alpha RGBA image, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RegionError> {
        if width == 0 || height == 0 {
            return Err(RegionError::EmptyBuffer { width, height });
        }
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(RegionError::BufferLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build by evaluating `pixel(x, y)` for every pixel
    pub fn from_fn(
        width: u32,
        height: u32,
        mut pixel: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, RegionError> {
        let mut data = Vec::with_capacity(Self::byte_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// RGBA byte count, or an error when it overflows `usize`
    fn byte_len(width: u32, height: u32) -> Result<usize, RegionError> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(RegionError::BufferTooLarge { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA at integer coordinates, `None` outside the image
    pub fn rgba(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Map dimensions and walkable colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelConfig {
    pub width: u32,
    pub height: u32,
    pub walkable: Rgb,
    pub tolerance: u8,
}

impl PixelConfig {
    pub fn new(width: u32, height: u32, walkable: Rgb) -> Self {
        Self {
            width,
            height,
            walkable,
            tolerance: COLOR_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// What gets rasterized into the collision buffer
#[derive(Debug, Clone)]
pub enum RasterSource {
    /// SVG markup, stretched to the configured size
    Svg(String),
    /// Even-odd region painted in the walkable colour on a transparent canvas
    Region(RegionDescription),
    /// Already decoded pixels (must match the configured size)
    Pixels(PixelBuffer),
}

impl RasterSource {
    /// Produce the collision buffer for `config`
    pub fn rasterize(&self, config: &PixelConfig) -> Result<PixelBuffer, RegionError> {
        match self {
            RasterSource::Svg(svg) => rasterize_svg(svg, config.width, config.height),
            RasterSource::Region(region) => {
                let svg = region.to_svg(config.width, config.height, config.walkable);
                rasterize_svg(&svg, config.width, config.height)
            }
            RasterSource::Pixels(buffer) => {
                check_size(buffer, config)?;
                Ok(buffer.clone())
            }
        }
    }
}

fn check_size(buffer: &PixelBuffer, config: &PixelConfig) -> Result<(), RegionError> {
    if buffer.width() != config.width || buffer.height() != config.height {
        return Err(RegionError::SizeMismatch {
            width: config.width,
            height: config.height,
            actual_width: buffer.width(),
            actual_height: buffer.height(),
        });
    }
    Ok(())
}

/// Render SVG markup into a `width` x `height` straight-alpha buffer
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> Result<PixelBuffer, RegionError> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| RegionError::Svg(e.to_string()))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RegionError::EmptyBuffer { width, height })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied colour; compare against straight RGB
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    PixelBuffer::new(width, height, data)
}

#[derive(Debug, Default)]
struct RasterSlot {
    buffer: OnceCell<PixelBuffer>,
}

/// Colour-sampling collision provider (fails closed until rasterized)
#[derive(Debug)]
pub struct PixelCollisionProvider {
    slot: Rc<RasterSlot>,
    config: PixelConfig,
}

/// Pending rasterization for one [`PixelCollisionProvider`]
#[derive(Debug)]
pub struct RasterJob {
    slot: Weak<RasterSlot>,
    source: RasterSource,
    config: PixelConfig,
}

/// How a [`RasterJob`] finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Buffer installed, provider is ready
    Ready,
    /// Provider was dropped first; nothing was written
    Abandoned,
}

/// Create a not-yet-ready pixel provider and the job that will make it ready
///
/// The source is moved into the job, so the caller cannot alter the map after
/// this point.
pub fn create_pixel_provider(
    source: RasterSource,
    config: PixelConfig,
) -> Result<(PixelCollisionProvider, RasterJob), RegionError> {
    if config.width == 0 || config.height == 0 {
        return Err(RegionError::EmptyBuffer {
            width: config.width,
            height: config.height,
        });
    }
    if let RasterSource::Pixels(buffer) = &source {
        check_size(buffer, &config)?;
    }

    let slot = Rc::new(RasterSlot::default());
    let job = RasterJob {
        slot: Rc::downgrade(&slot),
        source,
        config,
    };
    Ok((PixelCollisionProvider { slot, config }, job))
}

impl PixelCollisionProvider {
    pub fn config(&self) -> &PixelConfig {
        &self.config
    }

    /// The rasterized map, once available
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.slot.buffer.get()
    }
}

impl CollisionProvider for PixelCollisionProvider {
    fn point_walkable(&self, pos: Vec2) -> bool {
        let Some(buffer) = self.slot.buffer.get() else {
            return false;
        };
        if !pos.is_finite() {
            return false;
        }

        let (x, y) = pixel_of(pos);
        match buffer.rgba(x, y) {
            Some([r, g, b, a]) => {
                a > 0 && self.config.walkable.matches([r, g, b], self.config.tolerance)
            }
            None => false,
        }
    }

    fn is_ready(&self) -> bool {
        self.slot.buffer.get().is_some()
    }
}

impl RasterJob {
    /// True once the owning provider has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.slot.strong_count() == 0
    }

    /// Rasterize and install the buffer (at most once per provider)
    ///
    /// On failure the provider stays not-ready forever, which keeps every
    /// query answering "not walkable".
    pub fn run(self) -> Result<RasterOutcome, RegionError> {
        if self.is_abandoned() {
            log::debug!("Collision map job abandoned before rasterizing");
            return Ok(RasterOutcome::Abandoned);
        }

        let buffer = self.source.rasterize(&self.config).inspect_err(|e| {
            log::error!("Failed to rasterize collision map: {e}");
        })?;

        let Some(slot) = self.slot.upgrade() else {
            log::debug!("Collision map job abandoned after rasterizing");
            return Ok(RasterOutcome::Abandoned);
        };
        let (w, h) = (buffer.width(), buffer.height());
        if slot.buffer.set(buffer).is_err() {
            log::warn!("Collision map already loaded, keeping the first one");
        } else {
            log::info!("Collision map loaded: {}x{} pixels", w, h);
        }
        Ok(RasterOutcome::Ready)
    }

    /// Run on the browser's task queue so creation never blocks the frame
    #[cfg(target_arch = "wasm32")]
    pub fn spawn(self) {
        wasm_bindgen_futures::spawn_local(async move {
            // Failures are already logged by run()
            let _ = self.run();
        });
    }
}
