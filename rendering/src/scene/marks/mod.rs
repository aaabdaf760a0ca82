mod types;

pub use types::*;

use game_types::{MarkType, MarksSettings};
use glam::Vec2;
use tracing::{debug, trace};

use crate::instance::{Instance, Material, RenderBackend};
use crate::scene::constants::{
    FIELD_SIZE, FRAME_SIZES_COUNT, MARK_THICKNESS_BOLD, MARK_THICKNESS_THIN,
};

/// Draws the registered mark bands as nested frames around a field.
///
/// Bands are drawn in registration order from the inside out. Each band uses
/// the frame sized at the current offset, then the offset grows by its
/// thickness. Bands with no drawable mark leave their ring to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarksView {
    marks_start_size: u32,
    bands: Vec<MarksViewInformation>,
}

impl MarksView {
    pub fn new(marks_start_size: u32) -> Result<Self, MarksError> {
        if marks_start_size >= FRAME_SIZES_COUNT {
            return Err(MarksError::InvalidStartSize(marks_start_size));
        }
        Ok(Self {
            marks_start_size,
            bands: Vec::new(),
        })
    }

    pub fn from_settings(settings: &MarksSettings) -> Result<Self, MarksError> {
        let mut view = Self::new(settings.start_size)?;
        for band in &settings.bands {
            view.add_mark_to_view(band.mark_type, band.thickness)?;
        }
        Ok(view)
    }

    pub fn marks_start_size(&self) -> u32 {
        self.marks_start_size
    }

    pub fn set_marks_start_size(&mut self, marks_start_size: u32) -> Result<(), MarksError> {
        if marks_start_size + self.used_thickness() >= FRAME_SIZES_COUNT {
            return Err(MarksError::InvalidStartSize(marks_start_size));
        }
        self.marks_start_size = marks_start_size;
        Ok(())
    }

    pub fn bands(&self) -> &[MarksViewInformation] {
        &self.bands
    }

    fn used_thickness(&self) -> u32 {
        self.bands.iter().map(|band| band.mark_thickness).sum()
    }

    pub fn add_mark_to_view(
        &mut self,
        mark_type: MarkType,
        mark_thickness: u32,
    ) -> Result<(), MarksError> {
        if mark_thickness != MARK_THICKNESS_THIN && mark_thickness != MARK_THICKNESS_BOLD {
            return Err(MarksError::InvalidThickness(mark_thickness));
        }

        let offset = self.marks_start_size + self.used_thickness();
        if offset + mark_thickness >= FRAME_SIZES_COUNT {
            return Err(MarksError::OutOfBudget {
                offset,
                thickness: mark_thickness,
                budget: FRAME_SIZES_COUNT,
            });
        }

        debug!(
            "Mark band {} (thickness {}) at offset {}",
            mark_type.label(),
            mark_thickness,
            offset
        );
        self.bands.push(MarksViewInformation {
            mark_type,
            mark_thickness,
        });
        Ok(())
    }

    /// Draws one tinted frame per set mark over the field at `screen`.
    /// Returns the number of frames drawn.
    pub fn draw_marks(
        &self,
        backend: &mut dyn RenderBackend,
        texture: &MarksTexture,
        marks: &Marks,
        screen: Vec2,
        zoom: Vec2,
    ) -> usize {
        if marks.is_empty() {
            return 0;
        }

        let field = FIELD_SIZE as f32;
        let frame = Vec2::new(field / texture.width as f32, field / texture.height as f32);
        let position = screen * zoom;
        let size = Vec2::splat(field) * zoom;

        let mut drawn = 0;
        let mut offset = self.marks_start_size;
        for band in &self.bands {
            let Some(code) = marks.mark_color(band.mark_type) else {
                continue;
            };
            let Some(color) = frame_color(code) else {
                trace!(
                    "Skipping {} mark with color code {}",
                    band.mark_type.label(),
                    code
                );
                continue;
            };

            let tex_min = Vec2::new(
                offset as f32 * frame.x,
                (MARK_THICKNESS_BOLD - band.mark_thickness) as f32 * frame.y,
            );
            backend.draw(
                Instance::with_texture_region(
                    position,
                    size,
                    texture.texture,
                    tex_min,
                    tex_min + frame,
                )
                .with_color(color)
                .with_material(Material::Marks),
            );
            drawn += 1;
            offset += band.mark_thickness;
        }
        drawn
    }
}
