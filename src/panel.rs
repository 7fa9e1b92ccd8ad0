// The control panel under the live image: layout, hit-testing and drawing.
//
// Layout is recomputed from `Controls` every frame, so hidden widgets
// (color tools in grayscale mode, Snap in mirror mode) drop out of both the
// drawing and the hit-testing.

use crate::controls::{Channel, Controls, TextField, Toggle, UiAction};
use crate::draw::{GLYPH_HEIGHT, draw_outline, draw_text_5x7, text_width};
use crate::effects::{SLIDER_MAX, SLIDER_MIN};
use crate::types::{FrameBuffer, Rect};

pub const PANEL_HEIGHT: usize = 250;
/// Narrowest panel the widget rows fit in; the config loader enforces it.
pub const MIN_VIDEO_WIDTH: usize = 640;

const BACKGROUND: u32 = 0x00_E4_D8_C4;
const TEXT: u32 = 0x00_20_20_20;
const BUTTON: u32 = 0x00_39_5E_8C;
const BUTTON_TEXT: u32 = 0x00_FF_FF_FF;
const FIELD: u32 = 0x00_FF_FF_FF;
const FOCUS: u32 = 0x00_39_5E_8C;
const TRACK: u32 = 0x00_A8_9C_88;

const LEFT: i32 = 40;
const RIGHT_MARGIN: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetId {
    Snap,
    Check(Toggle),
    Slider(Channel),
    ResetColors,
    Input(TextField),
    Browse,
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct Widget {
    pub id: WidgetId,
    pub rect: Rect,
    pub label: &'static str,
}

pub struct Panel {
    top: i32,
    width: u32,
}

impl Panel {
    /// A panel starting at row `top` spanning `width` pixels.
    pub fn new(top: usize, width: usize) -> Self {
        Self { top: top as i32, width: width as u32 }
    }

    /// Visible widgets for the current state, in drawing order.
    pub fn widgets(&self, controls: &Controls) -> Vec<Widget> {
        let t = self.top;
        let w = |id, rect, label| Widget { id, rect, label };
        let mut out = Vec::new();

        if controls.snap_visible() {
            let x = (self.width as i32 - 80) / 2;
            out.push(w(WidgetId::Snap, Rect::new(x, t + 8, 80, 20), "Snap"));
        }

        out.push(w(WidgetId::Check(Toggle::DetectFace), Rect::new(LEFT, t + 38, 12, 12), "Detect Face"));
        out.push(w(WidgetId::Check(Toggle::Mirror), Rect::new(200, t + 38, 12, 12), "Mirror"));
        out.push(w(WidgetId::Check(Toggle::Grayscale), Rect::new(320, t + 38, 12, 12), "Black and White"));

        if controls.color_tools_visible() {
            let track_x = LEFT + 30;
            let track_w = self.width.saturating_sub(track_x as u32 + 80).max(1);
            for (i, (channel, label)) in
                [(Channel::Red, "R:"), (Channel::Green, "G:"), (Channel::Blue, "B:")].into_iter().enumerate()
            {
                let y = t + 62 + 22 * i as i32;
                out.push(w(WidgetId::Slider(channel), Rect::new(track_x, y, track_w, 14), label));
            }
            out.push(w(WidgetId::ResetColors, Rect::new(LEFT, t + 128, 110, 20), "Reset Colors"));
        }

        out.push(w(WidgetId::Input(TextField::SaveName), Rect::new(130, t + 160, 200, 16), "Save Name:"));
        out.push(w(WidgetId::Input(TextField::SaveHeight), Rect::new(200, t + 186, 50, 16), "Height:"));
        out.push(w(WidgetId::Input(TextField::SaveWidth), Rect::new(310, t + 186, 50, 16), "Width:"));

        // Bottom row hangs off the right edge; Save Path stretches to fill.
        let exit_x = self.width as i32 - RIGHT_MARGIN - 70;
        let browse_x = exit_x - 80;
        let path_w = (browse_x - 10 - 130).max(1) as u32;
        out.push(w(WidgetId::Input(TextField::SavePath), Rect::new(130, t + 214, path_w, 16), "Save Path"));
        out.push(w(WidgetId::Browse, Rect::new(browse_x, t + 212, 70, 20), "Browse"));
        out.push(w(WidgetId::Exit, Rect::new(exit_x, t + 212, 70, 20), "Exit"));

        out
    }

    pub fn hit(&self, controls: &Controls, x: i32, y: i32) -> Option<WidgetId> {
        self.widgets(controls)
            .into_iter()
            .find(|wd| wd.rect.contains(x, y))
            .map(|wd| wd.id)
    }

    pub fn rect_of(&self, controls: &Controls, id: WidgetId) -> Option<Rect> {
        self.widgets(controls).into_iter().find(|wd| wd.id == id).map(|wd| wd.rect)
    }

    /// Slider value for cursor column `x` over `track`, clamped to the range.
    pub fn slider_value(track: Rect, x: i32) -> i32 {
        let span = (track.w as i32 - 1).max(1);
        let offset = (x - track.x).clamp(0, span);
        let range = SLIDER_MAX - SLIDER_MIN;
        SLIDER_MIN + ((offset * range) as f32 / span as f32).round() as i32
    }

    /// Actions for a left-button press at (x, y).
    pub fn press(&self, controls: &Controls, x: i32, y: i32) -> Vec<UiAction> {
        let hit = self.hit(controls, x, y);
        let mut actions = Vec::new();

        // Clicking anywhere but the focused field drops focus.
        if let Some(focused) = controls.focus {
            if hit != Some(WidgetId::Input(focused)) {
                actions.push(UiAction::Focus(None));
            }
        }

        match hit {
            Some(WidgetId::Snap) => actions.push(UiAction::Snap),
            Some(WidgetId::Check(toggle)) => actions.push(UiAction::Toggle(toggle)),
            Some(WidgetId::Slider(channel)) => {
                if let Some(rect) = self.rect_of(controls, WidgetId::Slider(channel)) {
                    actions.push(UiAction::SetSlider(channel, Self::slider_value(rect, x)));
                }
            }
            Some(WidgetId::ResetColors) => actions.push(UiAction::ResetColors),
            Some(WidgetId::Input(field)) => actions.push(UiAction::Focus(Some(field))),
            Some(WidgetId::Browse) => actions.push(UiAction::BrowseFolder),
            Some(WidgetId::Exit) => actions.push(UiAction::Exit),
            None => {}
        }
        actions
    }

    pub fn render(&self, fb: &mut FrameBuffer, controls: &Controls) {
        fb.fill_rect(Rect::new(0, self.top, self.width, PANEL_HEIGHT as u32), BACKGROUND);

        // Caption that isn't attached to a single widget.
        draw_text_5x7(fb, LEFT, self.top + 191, "Save Dimensions:", TEXT);

        for wd in self.widgets(controls) {
            match wd.id {
                WidgetId::Snap | WidgetId::ResetColors | WidgetId::Browse | WidgetId::Exit => {
                    draw_button(fb, wd.rect, wd.label)
                }
                WidgetId::Check(toggle) => {
                    fb.fill_rect(wd.rect, FIELD);
                    draw_outline(fb, wd.rect, TEXT);
                    if controls.is_on(toggle) {
                        let inner = Rect::new(wd.rect.x + 3, wd.rect.y + 3, wd.rect.w - 6, wd.rect.h - 6);
                        fb.fill_rect(inner, TEXT);
                    }
                    draw_text_5x7(fb, wd.rect.x + wd.rect.w as i32 + 6, wd.rect.y + 3, wd.label, TEXT);
                }
                WidgetId::Slider(channel) => {
                    draw_slider(fb, wd.rect, wd.label, controls.slider(channel));
                }
                WidgetId::Input(field) => {
                    let focused = controls.focus == Some(field);
                    draw_input(fb, wd.rect, wd.label, controls.text(field), focused);
                }
            }
        }
    }
}

fn draw_button(fb: &mut FrameBuffer, rect: Rect, label: &str) {
    fb.fill_rect(rect, BUTTON);
    let tx = rect.x + (rect.w as i32 - text_width(label)) / 2;
    let ty = rect.y + (rect.h as i32 - GLYPH_HEIGHT) / 2;
    draw_text_5x7(fb, tx, ty, label, BUTTON_TEXT);
}

fn draw_slider(fb: &mut FrameBuffer, track: Rect, label: &str, value: i32) {
    draw_text_5x7(fb, LEFT, track.y + 4, label, TEXT);

    let line = Rect::new(track.x, track.y + track.h as i32 / 2 - 1, track.w, 3);
    fb.fill_rect(line, TRACK);

    let span = (track.w as i32 - 1).max(1);
    let kx = track.x + (value - SLIDER_MIN) * span / (SLIDER_MAX - SLIDER_MIN);
    fb.fill_rect(Rect::new(kx - 3, track.y, 7, track.h), BUTTON);

    draw_text_5x7(fb, track.x + track.w as i32 + 10, track.y + 4, &value.to_string(), TEXT);
}

fn draw_input(fb: &mut FrameBuffer, rect: Rect, label: &str, text: &str, focused: bool) {
    draw_text_5x7(fb, rect.x - text_width(label) - 6, rect.y + 5, label, TEXT);

    fb.fill_rect(rect, FIELD);
    draw_outline(fb, rect, if focused { FOCUS } else { TRACK });

    // Show the tail of long text so the caret stays visible.
    let fits = ((rect.w as i32 - 8) / text_width("m").max(1)).max(0) as usize;
    let count = text.chars().count();
    let shown: String = text.chars().skip(count.saturating_sub(fits)).collect();
    draw_text_5x7(fb, rect.x + 4, rect.y + 5, &shown, TEXT);

    if focused {
        let cx = rect.x + 4 + text_width(&shown);
        fb.fill_rect(Rect::new(cx, rect.y + 3, 1, rect.h - 6), TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel::new(480, 640)
    }

    fn center(r: Rect) -> (i32, i32) {
        (r.x + r.w as i32 / 2, r.y + r.h as i32 / 2)
    }

    fn ids(controls: &Controls) -> Vec<WidgetId> {
        panel().widgets(controls).into_iter().map(|w| w.id).collect()
    }

    fn overlaps(a: Rect, b: Rect) -> bool {
        a.x < b.x + b.w as i32 && b.x < a.x + a.w as i32 && a.y < b.y + b.h as i32 && b.y < a.y + a.h as i32
    }

    #[test]
    fn test_widgets_fit_inside_panel() {
        for width in [MIN_VIDEO_WIDTH, 800, 1024, 1920] {
            let p = Panel::new(480, width);
            let area = Rect::new(0, 480, width as u32, PANEL_HEIGHT as u32);
            let widgets = p.widgets(&Controls::default());
            for wd in &widgets {
                assert!(area.contains(wd.rect.x, wd.rect.y), "{width}: {:?}", wd.id);
                let (ex, ey) = (wd.rect.x + wd.rect.w as i32 - 1, wd.rect.y + wd.rect.h as i32 - 1);
                assert!(area.contains(ex, ey), "{width}: {:?}", wd.id);
            }
            for (i, a) in widgets.iter().enumerate() {
                for b in &widgets[i + 1..] {
                    assert!(!overlaps(a.rect, b.rect), "{width}: {:?} overlaps {:?}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_wide_panel_keeps_exit_near_right_edge() {
        let p = Panel::new(480, 1024);
        let c = Controls::default();
        let exit = p.rect_of(&c, WidgetId::Exit).unwrap();
        assert_eq!(exit.x + exit.w as i32, 1024 - 60);
        let (x, y) = center(exit);
        assert_eq!(p.press(&c, x, y), vec![UiAction::Exit]);
    }

    #[test]
    fn test_grayscale_hides_color_tools() {
        let mut c = Controls::default();
        assert!(ids(&c).contains(&WidgetId::Slider(Channel::Red)));
        assert!(ids(&c).contains(&WidgetId::ResetColors));

        c.grayscale = true;
        let hidden = ids(&c);
        assert!(!hidden.contains(&WidgetId::Slider(Channel::Red)));
        assert!(!hidden.contains(&WidgetId::Slider(Channel::Green)));
        assert!(!hidden.contains(&WidgetId::Slider(Channel::Blue)));
        assert!(!hidden.contains(&WidgetId::ResetColors));

        c.grayscale = false;
        assert!(ids(&c).contains(&WidgetId::Slider(Channel::Blue)));
    }

    #[test]
    fn test_mirror_hides_snap() {
        let mut c = Controls::default();
        assert!(ids(&c).contains(&WidgetId::Snap));
        c.mirror = true;
        assert!(!ids(&c).contains(&WidgetId::Snap));
        c.mirror = false;
        assert!(ids(&c).contains(&WidgetId::Snap));
    }

    #[test]
    fn test_hidden_snap_is_not_clickable() {
        let p = panel();
        let mut c = Controls::default();
        let (x, y) = center(p.rect_of(&c, WidgetId::Snap).unwrap());
        assert_eq!(p.press(&c, x, y), vec![UiAction::Snap]);

        c.mirror = true;
        assert!(p.press(&c, x, y).is_empty());
    }

    #[test]
    fn test_press_maps_buttons_and_checks() {
        let p = panel();
        let c = Controls::default();
        let click = |id| {
            let (x, y) = center(p.rect_of(&c, id).unwrap());
            p.press(&c, x, y)
        };
        assert_eq!(click(WidgetId::Exit), vec![UiAction::Exit]);
        assert_eq!(click(WidgetId::Browse), vec![UiAction::BrowseFolder]);
        assert_eq!(click(WidgetId::ResetColors), vec![UiAction::ResetColors]);
        assert_eq!(click(WidgetId::Check(Toggle::Mirror)), vec![UiAction::Toggle(Toggle::Mirror)]);
        assert_eq!(
            click(WidgetId::Input(TextField::SavePath)),
            vec![UiAction::Focus(Some(TextField::SavePath))]
        );
    }

    #[test]
    fn test_slider_ends_and_middle() {
        let track = Rect::new(70, 0, 361, 14);
        assert_eq!(Panel::slider_value(track, 0), SLIDER_MIN);
        assert_eq!(Panel::slider_value(track, 70), SLIDER_MIN);
        assert_eq!(Panel::slider_value(track, 250), 0);
        assert_eq!(Panel::slider_value(track, 430), SLIDER_MAX);
        assert_eq!(Panel::slider_value(track, 9999), SLIDER_MAX);
    }

    #[test]
    fn test_press_on_slider_sets_value() {
        let p = panel();
        let c = Controls::default();
        let rect = p.rect_of(&c, WidgetId::Slider(Channel::Green)).unwrap();
        let actions = p.press(&c, rect.x, rect.y + 2);
        assert_eq!(actions, vec![UiAction::SetSlider(Channel::Green, SLIDER_MIN)]);
    }

    #[test]
    fn test_click_elsewhere_drops_focus() {
        let p = panel();
        let mut c = Controls::default();
        c.focus = Some(TextField::SaveName);
        assert_eq!(p.press(&c, 5, 485), vec![UiAction::Focus(None)]);

        let (x, y) = center(p.rect_of(&c, WidgetId::Input(TextField::SaveName)).unwrap());
        assert_eq!(p.press(&c, x, y), vec![UiAction::Focus(Some(TextField::SaveName))]);
    }

    #[test]
    fn test_render_paints_background_and_leaves_video() {
        let mut fb = FrameBuffer::new(640, 480 + PANEL_HEIGHT);
        panel().render(&mut fb, &Controls::default());
        assert_eq!(fb.pixels[0], 0);
        assert_eq!(fb.pixels[(480 + PANEL_HEIGHT - 1) * 640], BACKGROUND);
    }
}
