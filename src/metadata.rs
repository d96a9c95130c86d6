use egui::{Id, Pos2, Vec2};
use serde::{Deserialize, Serialize};

const KEY: &str = "nox_canvas_metadata";

/// Pan and zoom of a canvas widget, kept in egui memory between frames.
///
/// `pan` is relative to the widget's top left corner. Drawing code works with
/// a copy whose pan is shifted by the widget position, see [`Metadata::on_screen`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Current zoom factor
    pub zoom: f32,
    /// Current pan offset
    pub pan: Vec2,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            zoom: 1.,
            pan: Vec2::default(),
        }
    }
}

impl Metadata {
    pub fn load(ui: &egui::Ui, custom_id: Option<&str>) -> Self {
        ui.data_mut(|data| data.get_persisted::<Metadata>(key(custom_id)).unwrap_or_default())
    }

    pub fn save(self, ui: &mut egui::Ui, custom_id: Option<&str>) {
        ui.data_mut(|data| {
            data.insert_persisted(key(custom_id), self);
        });
    }

    /// Copy of the metadata that maps canvas positions to absolute screen positions.
    pub fn on_screen(&self, top_left: Pos2) -> Self {
        Self {
            zoom: self.zoom,
            pan: self.pan + top_left.to_vec2(),
        }
    }

    pub fn canvas_to_screen_pos(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn canvas_to_screen_size(&self, size: f32) -> f32 {
        size * self.zoom
    }

    pub fn screen_to_canvas_pos(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    /// Zooms by `delta` keeping the canvas point under `center` in place.
    /// The resulting zoom is clamped to `[min, max]`.
    pub fn zoom_at(&mut self, center: Pos2, delta: f32, min: f32, max: f32) {
        let graph_center_pos = (center.to_vec2() - self.pan) / self.zoom;
        let new_zoom = (self.zoom * (1. + delta)).clamp(min, max);

        let pan_delta = graph_center_pos * self.zoom - graph_center_pos * new_zoom;
        self.pan += pan_delta;
        self.zoom = new_zoom;
    }
}

fn key(custom_id: Option<&str>) -> Id {
    match custom_id {
        Some(id) => Id::new((KEY, id)),
        None => Id::new(KEY),
    }
}
