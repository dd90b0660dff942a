//! Software `Surface` over an RGBA pixel buffer
//!
//! Calls are buffered and rasterized on read-back. A clear that covers the
//! whole surface under the identity transform discards everything buffered
//! before it, so driving many frames only costs the last one.

use haze_core::{Color, Extent};
use haze_particles::{CompositeMode, Surface};
use image::RgbaImage;
use std::rc::Rc;

/// 2D affine transform `[a, b, c, d, e, f]`: `(x, y) → (a·x + c·y + e, b·x + d·y + f)`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Affine([f32; 6]);

impl Affine {
    const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.0;
        self.0 = [a, b, c, d, a * tx + c * ty + e, b * tx + d * ty + f];
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let [a, b, c, d, e, f] = self.0;
        self.0 = [
            a * cos + c * sin,
            b * cos + d * sin,
            c * cos - a * sin,
            d * cos - b * sin,
            e,
            f,
        ];
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    fn inverse(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.0;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self([
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            (c * f - d * e) * inv,
            (b * e - a * f) * inv,
        ]))
    }
}

#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine,
    alpha: f32,
    mode: CompositeMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            mode: CompositeMode::SourceOver,
        }
    }
}

/// One buffered surface call
enum Op {
    Clear { x: f32, y: f32, w: f32, h: f32 },
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Alpha(f32),
    Composite(CompositeMode),
    Image { image: Rc<RgbaImage>, x: f32, y: f32, w: f32, h: f32 },
    Fill { x: f32, y: f32, w: f32, h: f32, color: Color },
}

pub struct RasterSurface {
    width: u32,
    height: u32,
    opacity: f32,
    ops: Vec<Op>,
    /// Record-time state, only used to recognise full clears
    state: DrawState,
    stack: Vec<DrawState>,
}

impl RasterSurface {
    pub fn new(extent: Extent) -> Self {
        Self {
            width: extent.width.max(1.0) as u32,
            height: extent.height.max(1.0) as u32,
            opacity: 1.0,
            ops: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Buffered calls waiting to be rasterized
    pub fn pending_ops(&self) -> usize {
        self.ops.len()
    }

    /// Rasterize the buffered frame and composite the layer, at its opacity,
    /// over an opaque `background`
    pub fn to_image(&self, background: Color) -> RgbaImage {
        let layer = self.rasterize();
        let bg = premultiply(background.r, background.g, background.b, 1.0);
        let mut out = RgbaImage::new(self.width, self.height);
        for (px, src) in out.pixels_mut().zip(layer) {
            let s = src.map(|v| v * self.opacity);
            let mixed = [
                s[0] + bg[0] * (1.0 - s[3]),
                s[1] + bg[1] * (1.0 - s[3]),
                s[2] + bg[2] * (1.0 - s[3]),
                1.0,
            ];
            px.0 = mixed.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
        out
    }

    /// Replay the buffered calls into premultiplied RGBA pixels
    fn rasterize(&self) -> Vec<[f32; 4]> {
        let mut raster = Rasterizer {
            width: self.width,
            height: self.height,
            pixels: vec![[0.0; 4]; pixel_index(self.width, 0, self.height)],
            state: DrawState::default(),
            stack: Vec::new(),
        };
        for op in &self.ops {
            raster.apply(op);
        }
        raster.pixels
    }

    fn covers_surface(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.state.transform == Affine::IDENTITY
            && x <= 0.0
            && y <= 0.0
            && x + w >= self.width as f32
            && y + h >= self.height as f32
    }
}

impl Surface for RasterSurface {
    type Image = Rc<RgbaImage>;

    fn extent(&self) -> Extent {
        Extent::new(self.width as f32, self.height as f32)
    }

    fn resize(&mut self, extent: Extent) {
        // Like a canvas, resizing wipes the content and state
        self.width = extent.width.max(1.0) as u32;
        self.height = extent.height.max(1.0) as u32;
        self.ops.clear();
        self.state = DrawState::default();
        self.stack.clear();
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if self.covers_surface(x, y, w, h) {
            self.ops.clear();
        } else {
            self.ops.push(Op::Clear { x, y, w, h });
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.ops.push(Op::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform.translate(x, y);
        self.ops.push(Op::Translate(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform.rotate(radians);
        self.ops.push(Op::Rotate(radians));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
        self.ops.push(Op::Alpha(alpha));
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.mode = mode;
        self.ops.push(Op::Composite(mode));
    }

    fn draw_image(&mut self, image: &Rc<RgbaImage>, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Op::Image {
            image: Rc::clone(image),
            x,
            y,
            w,
            h,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(Op::Fill { x, y, w, h, color });
    }
}

/// Replays ops into a pixel buffer
struct Rasterizer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Rasterizer {
    fn apply(&mut self, op: &Op) {
        match op {
            Op::Clear { x, y, w, h } => {
                self.cover(*x, *y, *w, *h, |_, _, _| [0.0; 4]);
            }
            Op::Save => self.stack.push(self.state),
            Op::Restore => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            Op::Translate(x, y) => self.state.transform.translate(*x, *y),
            Op::Rotate(r) => self.state.transform.rotate(*r),
            Op::Alpha(a) => self.state.alpha = a.clamp(0.0, 1.0),
            Op::Composite(mode) => self.state.mode = *mode,
            Op::Image { image, x, y, w, h } => {
                let alpha = self.state.alpha;
                let mode = self.state.mode;
                let (iw, ih) = image.dimensions();
                if iw == 0 || ih == 0 {
                    return;
                }
                self.cover(
                    *x,
                    *y,
                    *w,
                    *h,
                    |u, v, dst| {
                        let sx = ((u * iw as f32) as u32).min(iw - 1);
                        let sy = ((v * ih as f32) as u32).min(ih - 1);
                        let [r, g, b, a] = image.get_pixel(sx, sy).0;
                        let src = premultiply(
                            r as f32 / 255.0,
                            g as f32 / 255.0,
                            b as f32 / 255.0,
                            a as f32 / 255.0 * alpha,
                        );
                        composite(mode, src, dst)
                    },
                );
            }
            Op::Fill { x, y, w, h, color } => {
                let mode = self.state.mode;
                let src = premultiply(color.r, color.g, color.b, color.a * self.state.alpha);
                self.cover(
                    *x,
                    *y,
                    *w,
                    *h,
                    |_, _, dst| composite(mode, src, dst),
                );
            }
        }
    }

    /// Visit every pixel whose centre falls inside the transformed rect.
    /// `shade` gets the rect-local (u, v) in [0, 1) and the current pixel and
    /// returns the new pixel.
    fn cover(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        mut shade: impl FnMut(f32, f32, [f32; 4]) -> [f32; 4],
    ) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let transform = self.state.transform;
        let Some(inverse) = transform.inverse() else {
            return;
        };

        let corners = [
            transform.apply(x, y),
            transform.apply(x + w, y),
            transform.apply(x, y + h),
            transform.apply(x + w, y + h),
        ];
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for (cx, cy) in corners {
            min_x = min_x.min(cx);
            min_y = min_y.min(cy);
            max_x = max_x.max(cx);
            max_y = max_y.max(cy);
        }
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let (lx, ly) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                let u = (lx - x) / w;
                let v = (ly - y) / h;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let idx = pixel_index(self.width, px, py);
                let dst = self.pixels[idx];
                self.pixels[idx] = shade(u, v, dst);
            }
        }
    }
}

/// Row-major offset of `(px, py)`; `pixel_index(w, 0, h)` is the buffer length
fn pixel_index(width: u32, px: u32, py: u32) -> usize {
    py as usize * width as usize + px as usize
}

fn premultiply(r: f32, g: f32, b: f32, a: f32) -> [f32; 4] {
    let a = a.clamp(0.0, 1.0);
    [r * a, g * a, b * a, a]
}

/// Porter-Duff on premultiplied pixels
fn composite(mode: CompositeMode, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let (sa, da) = (src[3], dst[3]);
    match mode {
        CompositeMode::SourceOver => [
            src[0] + dst[0] * (1.0 - sa),
            src[1] + dst[1] * (1.0 - sa),
            src[2] + dst[2] * (1.0 - sa),
            sa + da * (1.0 - sa),
        ],
        CompositeMode::SourceAtop => [
            src[0] * da + dst[0] * (1.0 - sa),
            src[1] * da + dst[1] * (1.0 - sa),
            src[2] * da + dst[2] * (1.0 - sa),
            da,
        ],
    }
}
