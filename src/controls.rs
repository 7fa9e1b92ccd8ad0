// UI state re-read by the loop every iteration, and the actions that change it.

use crate::config::SnapshotConfig;
use crate::effects::{ChannelOffsets, SLIDER_MAX, SLIDER_MIN};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    DetectFace,
    Mirror,
    Grayscale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    SaveName,
    SaveHeight,
    SaveWidth,
    SavePath,
}

impl TextField {
    fn digits_only(self) -> bool {
        matches!(self, TextField::SaveHeight | TextField::SaveWidth)
    }
}

/// Everything the panel can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Snap,
    ResetColors,
    BrowseFolder,
    Exit,
    Toggle(Toggle),
    SetSlider(Channel, i32),
    Focus(Option<TextField>),
    Type(char),
    Backspace,
    SetSavePath(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub detect_face: bool,
    pub mirror: bool,
    pub grayscale: bool,
    red: i32,
    green: i32,
    blue: i32,
    pub save_name: String,
    pub save_path: String,
    pub save_height: String,
    pub save_width: String,
    pub focus: Option<TextField>,
}

impl Default for Controls {
    fn default() -> Self {
        Self::from_config(&SnapshotConfig::default())
    }
}

impl Controls {
    pub fn from_config(cfg: &SnapshotConfig) -> Self {
        Self {
            detect_face: false,
            mirror: false,
            grayscale: false,
            red: 0,
            green: 0,
            blue: 0,
            save_name: cfg.name.clone(),
            save_path: cfg
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            save_height: cfg.height.to_string(),
            save_width: cfg.width.to_string(),
            focus: None,
        }
    }

    pub fn slider(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Set a slider, clamped to its declared range.
    pub fn set_slider(&mut self, channel: Channel, value: i32) {
        let value = value.clamp(SLIDER_MIN, SLIDER_MAX);
        match channel {
            Channel::Red => self.red = value,
            Channel::Green => self.green = value,
            Channel::Blue => self.blue = value,
        }
    }

    pub fn reset_colors(&mut self) {
        self.red = 0;
        self.green = 0;
        self.blue = 0;
    }

    pub fn offsets(&self) -> ChannelOffsets {
        ChannelOffsets { red: self.red, green: self.green, blue: self.blue }
    }

    /// Sliders and "Reset Colors" are hidden in grayscale mode.
    pub fn color_tools_visible(&self) -> bool {
        !self.grayscale
    }

    /// Snap is hidden while the mirrored view is shown.
    pub fn snap_visible(&self) -> bool {
        !self.mirror
    }

    pub fn is_on(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::DetectFace => self.detect_face,
            Toggle::Mirror => self.mirror,
            Toggle::Grayscale => self.grayscale,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::SaveName => &self.save_name,
            TextField::SaveHeight => &self.save_height,
            TextField::SaveWidth => &self.save_width,
            TextField::SavePath => &self.save_path,
        }
    }

    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::SaveName => &mut self.save_name,
            TextField::SaveHeight => &mut self.save_height,
            TextField::SaveWidth => &mut self.save_width,
            TextField::SavePath => &mut self.save_path,
        }
    }

    /// Apply a state-only action. Snap, BrowseFolder and Exit need the app and
    /// are ignored here.
    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Toggle(Toggle::DetectFace) => self.detect_face = !self.detect_face,
            UiAction::Toggle(Toggle::Mirror) => self.mirror = !self.mirror,
            UiAction::Toggle(Toggle::Grayscale) => self.grayscale = !self.grayscale,
            UiAction::SetSlider(channel, value) => self.set_slider(channel, value),
            UiAction::ResetColors => self.reset_colors(),
            UiAction::Focus(field) => self.focus = field,
            UiAction::Type(c) => {
                if let Some(field) = self.focus {
                    if c.is_control() || (field.digits_only() && !c.is_ascii_digit()) {
                        return;
                    }
                    self.text_mut(field).push(c);
                }
            }
            UiAction::Backspace => {
                if let Some(field) = self.focus {
                    self.text_mut(field).pop();
                }
            }
            UiAction::SetSavePath(path) => self.save_path = path.display().to_string(),
            UiAction::Snap | UiAction::BrowseFolder | UiAction::Exit => {}
        }
    }
}
