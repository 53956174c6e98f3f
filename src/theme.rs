use eframe::egui::{self, Color32, CornerRadius, RichText, Stroke, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub foreground: Color32,
    pub panel: Color32,
    pub button: Color32,
    pub button_active: Color32,
    pub secondary_text: Color32,
    pub muted_text: Color32,
    pub error_text: Color32,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(0xf4, 0xf4, 0xf4),
            foreground: Color32::BLACK,
            panel: Color32::WHITE,
            button: Color32::from_rgb(0xe0, 0xe0, 0xe0),
            button_active: Color32::from_rgb(0xd0, 0xd0, 0xd0),
            secondary_text: Color32::from_rgb(0x44, 0x44, 0x44),
            muted_text: Color32::from_rgb(0x66, 0x66, 0x66),
            error_text: Color32::from_rgb(200, 60, 60),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x2b, 0x2b, 0x2b),
            foreground: Color32::from_rgb(0xf4, 0xf4, 0xf4),
            panel: Color32::from_rgb(0x3c, 0x3c, 0x3c),
            button: Color32::from_rgb(0x6a, 0xa8, 0x4f),
            button_active: Color32::from_rgb(0xb6, 0xd7, 0xa8),
            secondary_text: Color32::from_rgb(0xcc, 0xcc, 0xcc),
            muted_text: Color32::from_rgb(0x99, 0x99, 0x99),
            error_text: Color32::from_rgb(220, 80, 80),
        }
    }

    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn is_dark(&self) -> bool {
        let [r, g, b, _] = self.background.to_array();
        let luminance = 0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b);
        luminance < 128.0
    }

    pub fn apply_style(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.visuals = if self.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        let corner_radius = CornerRadius::same(4);
        style.spacing.button_padding = Vec2::new(12.0, 8.0);
        style.spacing.item_spacing.y = style.spacing.item_spacing.y.max(6.0);

        style.visuals.window_fill = self.background;
        style.visuals.panel_fill = self.background;
        style.visuals.override_text_color = Some(self.foreground);
        style.visuals.extreme_bg_color = self.panel;

        style.visuals.widgets.inactive.bg_fill = self.button;
        style.visuals.widgets.inactive.weak_bg_fill = self.button;
        style.visuals.widgets.inactive.corner_radius = corner_radius;
        style.visuals.widgets.inactive.bg_stroke = Stroke::NONE;

        style.visuals.widgets.hovered.bg_fill = self.button_active;
        style.visuals.widgets.hovered.weak_bg_fill = self.button_active;
        style.visuals.widgets.hovered.corner_radius = corner_radius;

        style.visuals.widgets.active.bg_fill = self.button_active;
        style.visuals.widgets.active.weak_bg_fill = self.button_active;
        style.visuals.widgets.active.corner_radius = corner_radius;

        style.visuals.selection.bg_fill = self.button;

        ctx.set_style(style);
    }

    pub fn text(&self, text: impl Into<String>, size: f32) -> RichText {
        RichText::new(text.into()).color(self.foreground).size(size)
    }

    pub fn secondary(&self, text: impl Into<String>, size: f32) -> RichText {
        RichText::new(text.into())
            .color(self.secondary_text)
            .size(size)
    }
}
