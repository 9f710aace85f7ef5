//! Parallax layers and the scrolling floor
//!
//! A layer is a cyclic run of segments laid end to end. Each tick every
//! segment moves left; any segment whose right edge has crossed x = 0 is
//! moved behind the current last segment. The wrapped segment is placed a
//! little over its new neighbour (`seam_overlap`) so no seam shows.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::{GameConfig, LayerConfig};

/// Sub-pixel slack allowed between neighbours when checking coverage
const SEAM_TOLERANCE: f32 = 1e-3;

/// One tiled piece of a scrolling layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub x: f32,
    pub texture: u32,
    pub variant: u32,
    pub width: f32,
    pub scale: f32,
}

impl Segment {
    /// On-screen width
    #[inline]
    pub fn extent(&self) -> f32 {
        self.width * self.scale
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.extent()
    }
}

/// Variant cycling for the one layer that re-textures on wrap
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VariantCycle {
    pub current: u32,
    pub count: u32,
}

/// A single cyclic strip of segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollLayer {
    /// Ordered front to back; `segments[0]` is the leftmost
    pub segments: VecDeque<Segment>,
    /// Scroll speed (pixels/s)
    pub speed: f32,
    pub seam_overlap: f32,
    pub variants: Option<VariantCycle>,
    /// Total wraps since the layer was built
    pub wraps: u64,
}

impl ScrollLayer {
    /// Number of segments that keep `[0, viewport]` covered after wrapping
    pub fn segments_needed(viewport_width: f32, extent: f32, seam_overlap: f32) -> usize {
        let step = extent - seam_overlap;
        (viewport_width / step).ceil() as usize + 1
    }

    /// Build a layer from x = 0, neighbours already overlapping by `seam_overlap`
    pub fn new(
        viewport_width: f32,
        texture: u32,
        width: f32,
        scale: f32,
        speed: f32,
        seam_overlap: f32,
    ) -> Self {
        let extent = width * scale;
        let count = Self::segments_needed(viewport_width, extent, seam_overlap);
        let step = extent - seam_overlap;
        let segments = (0..count)
            .map(|i| Segment {
                x: i as f32 * step,
                texture,
                variant: 0,
                width,
                scale,
            })
            .collect();
        Self {
            segments,
            speed,
            seam_overlap,
            variants: None,
            wraps: 0,
        }
    }

    pub fn from_config(viewport_width: f32, layer: &LayerConfig, seam_overlap: f32) -> Self {
        Self::new(
            viewport_width,
            layer.texture,
            layer.segment_width,
            layer.scale,
            layer.speed,
            seam_overlap,
        )
    }

    /// Turn this into the variant layer
    pub fn with_variants(mut self, count: u32) -> Self {
        self.variants = Some(VariantCycle {
            current: 0,
            count: count.max(1),
        });
        self
    }

    /// Shift every segment left by `speed * dt` and wrap the ones that left the screen
    pub fn advance(&mut self, dt: f32) {
        let dx = self.speed * dt;
        for segment in &mut self.segments {
            segment.x -= dx;
        }
        self.wrap();
    }

    fn wrap(&mut self) {
        // Each segment can wrap at most once per pass
        for _ in 0..self.segments.len() {
            let leading_off = self.segments.front().is_some_and(|s| s.right() <= 0.0);
            if !leading_off {
                break;
            }
            let Some(mut segment) = self.segments.pop_front() else {
                break;
            };
            if let Some(last) = self.segments.back() {
                segment.x = last.right() - self.seam_overlap;
            }
            if let Some(cycle) = self.variants.as_mut() {
                cycle.current = (cycle.current + 1) % cycle.count;
                segment.variant = cycle.current;
            }
            self.segments.push_back(segment);
            self.wraps += 1;
        }
    }

    /// Leftmost covered x
    pub fn left(&self) -> f32 {
        self.segments.front().map_or(0.0, |s| s.x)
    }

    /// Rightmost covered x
    pub fn right(&self) -> f32 {
        self.segments.back().map_or(0.0, |s| s.right())
    }

    /// Sum of segment extents
    pub fn total_width(&self) -> f32 {
        self.segments.iter().map(Segment::extent).sum()
    }

    /// True if `[0, viewport]` is covered with no gap between neighbours
    pub fn covers(&self, viewport_width: f32) -> bool {
        if self.left() > 0.0 || self.right() < viewport_width - SEAM_TOLERANCE {
            return false;
        }
        self.segments
            .iter()
            .zip(self.segments.iter().skip(1))
            .all(|(a, b)| b.x <= a.right() + SEAM_TOLERANCE)
    }
}

/// All background layers, back to front
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollLayerSet {
    pub layers: Vec<ScrollLayer>,
}

impl ScrollLayerSet {
    pub fn from_config(config: &GameConfig) -> Self {
        let parallax = &config.parallax;
        let layers = parallax
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let built =
                    ScrollLayer::from_config(config.viewport.width, layer, parallax.seam_overlap);
                if parallax.variant_layer == Some(i) {
                    built.with_variants(parallax.variant_count)
                } else {
                    built
                }
            })
            .collect();
        Self { layers }
    }

    pub fn advance(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.advance(dt);
        }
    }
}

/// The walkable floor: uniform tiles plus a static collision surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTrack {
    pub tiles: ScrollLayer,
    /// y of the floor line (top edge of the tiles)
    pub floor_y: f32,
    pub viewport_width: f32,
    pub tile_size: f32,
}

impl GroundTrack {
    pub fn from_config(config: &GameConfig) -> Self {
        let tile = config.ground.tile_size;
        Self {
            tiles: ScrollLayer::new(
                config.viewport.width,
                0,
                tile,
                1.0,
                config.ground.speed,
                config.parallax.seam_overlap,
            ),
            floor_y: config.floor_y(),
            viewport_width: config.viewport.width,
            tile_size: tile,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.tiles.advance(dt);
    }

    /// Collision surface spanning the whole viewport
    pub fn surface(&self) -> Rect {
        Rect::new(0.0, self.floor_y, self.viewport_width, self.tile_size)
    }

    /// Clamp a body of the given height resting on the floor.
    /// Returns the corrected top y when the body reached the floor.
    pub fn rest(&self, top: f32, height: f32) -> Option<f32> {
        if top + height >= self.floor_y {
            Some(self.floor_y - height)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_layer_counts() {
        let set = ScrollLayerSet::from_config(&GameConfig::default());
        assert_eq!(set.layers.len(), 5);
        for layer in &set.layers {
            assert_eq!(layer.segments.len(), 3);
            assert!(layer.total_width() >= VIEWPORT_WIDTH + PARALLAX_SEGMENT_WIDTH);
        }
        assert!(set.layers[VARIANT_LAYER].variants.is_some());
        assert!(set.layers[0].variants.is_none());
    }

    #[test]
    fn test_wrap_moves_leading_segment_to_tail() {
        let mut layer = ScrollLayer::new(100.0, 1, 60.0, 1.0, 60.0, 1.0);
        assert_eq!(layer.segments.len(), 3);
        // 61 px in one step puts the first segment fully off screen
        layer.advance(61.0 / 60.0);
        assert_eq!(layer.wraps, 1);
        let last = layer.segments.back().unwrap();
        let before = &layer.segments[layer.segments.len() - 2];
        assert!((last.x - (before.right() - 1.0)).abs() < 1e-4);
        assert!(layer.covers(100.0));
    }

    #[test]
    fn test_wrap_rotates_without_reordering() {
        let mut layer = ScrollLayer::new(100.0, 1, 60.0, 1.0, 60.0, 1.0);
        let first_x: Vec<f32> = layer.segments.iter().map(|s| s.x).collect();
        // Three wraps bring the strip back to its original order
        for _ in 0..3 {
            let before = layer.wraps;
            while layer.wraps == before {
                layer.advance(1.0 / 60.0);
            }
        }
        assert_eq!(layer.segments.len(), 3);
        assert!(layer.segments.iter().zip(layer.segments.iter().skip(1)).all(|(a, b)| a.x < b.x));
        assert_eq!(layer.left(), layer.segments[0].x);
        assert!(layer.left() <= 0.0 && layer.left() > -60.0);
        assert_ne!(layer.segments[0].x, first_x[0]);
    }

    #[test]
    fn test_variant_layer_cycles() {
        let mut layer = ScrollLayer::new(100.0, 1, 60.0, 1.0, 60.0, 1.0).with_variants(3);
        let mut seen = Vec::new();
        for _ in 0..4 {
            let before = layer.wraps;
            while layer.wraps == before {
                layer.advance(1.0 / 60.0);
            }
            seen.push(layer.segments.back().unwrap().variant);
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_plain_layer_keeps_variant_zero() {
        let mut layer = ScrollLayer::new(100.0, 1, 60.0, 1.0, 600.0, 1.0);
        for _ in 0..500 {
            layer.advance(1.0 / 60.0);
        }
        assert!(layer.wraps > 0);
        assert!(layer.segments.iter().all(|s| s.variant == 0));
    }

    #[test]
    fn test_ground_rest() {
        let ground = GroundTrack::from_config(&GameConfig::default());
        assert_eq!(ground.floor_y, 418.0);
        assert_eq!(ground.rest(300.0, 64.0), None);
        assert_eq!(ground.rest(360.0, 64.0), Some(354.0));
        assert_eq!(ground.surface().top(), 418.0);
    }

    #[test]
    fn test_ground_tiles_cover_after_long_run() {
        let mut ground = GroundTrack::from_config(&GameConfig::default());
        for _ in 0..10_000 {
            ground.advance(SIM_DT);
            assert!(ground.tiles.covers(VIEWPORT_WIDTH));
        }
        assert!(ground.tiles.wraps > 0);
    }

    proptest! {
        #[test]
        fn prop_layers_never_gap(
            width in 20.0f32..900.0,
            scale in 0.5f32..2.0,
            speed in 1.0f32..900.0,
            viewport in 100.0f32..1200.0,
            ticks in 1usize..600,
        ) {
            let mut layer = ScrollLayer::new(viewport, 1, width, scale, speed, 1.0).with_variants(3);
            for _ in 0..ticks {
                layer.advance(SIM_DT);
                prop_assert!(layer.covers(viewport));
                prop_assert!(layer.total_width() >= viewport + width * scale);
            }
        }
    }
}
