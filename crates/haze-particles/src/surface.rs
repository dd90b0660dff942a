//! Abstract 2D drawing surface and a command-recording implementation

use haze_core::{Color, Extent};

/// How new pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Draw over existing content
    #[default]
    SourceOver,
    /// Draw only where existing content is opaque, keeping its alpha
    SourceAtop,
}

/// The drawing operations the simulator needs from a host canvas.
///
/// `save`/`restore` cover the transform, global alpha and composite mode.
pub trait Surface {
    /// Decoded image type this surface can blit
    type Image;

    fn extent(&self) -> Extent;
    fn resize(&mut self, extent: Extent);
    /// Opacity of the whole layer when composited by the host
    fn set_opacity(&mut self, opacity: f32);

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite_mode(&mut self, mode: CompositeMode);
    fn draw_image(&mut self, image: &Self::Image, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Extent),
    SetOpacity(f32),
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate(f32),
    GlobalAlpha(f32),
    Composite(CompositeMode),
    DrawImage { x: f32, y: f32, w: f32, h: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Color },
}

/// Surface that records every call instead of drawing.
/// Used for headless tracing and for asserting draw output in tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    extent: Extent,
    opacity: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            opacity: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Number of sprites drawn since the last `take_commands`
    pub fn image_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .count()
    }

    /// Number of full clears since the last `take_commands`
    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    type Image = ();

    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        self.commands.push(DrawCommand::Resize(extent));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.commands.push(DrawCommand::SetOpacity(opacity));
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, w, h });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.commands.push(DrawCommand::Composite(mode));
    }

    fn draw_image(&mut self, _image: &(), x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::DrawImage { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }
}
