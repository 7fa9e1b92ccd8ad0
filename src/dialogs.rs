// Modal popups and the folder picker.

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

pub trait Dialogs {
    /// Show a blocking error popup.
    fn error(&self, title: &str, message: &str);
    /// Ask the user for a folder; `None` if cancelled.
    fn pick_folder(&self) -> Option<PathBuf>;
}

/// Native dialogs via rfd.
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn error(&self, title: &str, message: &str) {
        log::warn!("{title}: {message}");
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn pick_folder(&self) -> Option<PathBuf> {
        FileDialog::new().set_title("Save Path").pick_folder()
    }
}
