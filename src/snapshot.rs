// Snapshot writer: validate the save fields, resize the frame, write a PNG.

use crate::config::SnapshotConfig;
use crate::controls::Controls;
use crate::dialogs::Dialogs;
use chrono::{Local, NaiveDateTime};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Display text doubles as the popup message.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("You must select a folder to save photos.")]
    MissingPath,
    #[error("You must enter dimensions for the photos.\nDefault: H=480 W=640")]
    MissingDimensions,
    #[error("{field} must be a whole number from 1 to {max}, got '{value}'.")]
    InvalidDimension { field: &'static str, value: String, max: u32 },
    #[error("Invalid timestamp format '{0}'.")]
    TimestampFormat(String),
    #[error("A snapshot is already being saved.")]
    Busy,
    #[error("Could not save '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// The raw field contents a save is attempted with.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotRequest<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub width: &'a str,
    pub height: &'a str,
}

impl<'a> SnapshotRequest<'a> {
    pub fn from_controls(controls: &'a Controls) -> Self {
        Self {
            name: &controls.save_name,
            path: &controls.save_path,
            width: &controls.save_width,
            height: &controls.save_height,
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    pub dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    Idle,
    Saving,
}

/// Check the fields in the order the user is told about them:
/// folder first, then both sizes present, then each size in 1..=max_dimension.
pub fn validate(req: &SnapshotRequest<'_>, max_dimension: u32) -> Result<SnapshotTarget, SnapshotError> {
    let path = req.path.trim();
    if path.is_empty() {
        return Err(SnapshotError::MissingPath);
    }
    let (width, height) = (req.width.trim(), req.height.trim());
    if width.is_empty() || height.is_empty() {
        return Err(SnapshotError::MissingDimensions);
    }

    Ok(SnapshotTarget {
        dir: PathBuf::from(path),
        width: parse_dimension("Width", width, max_dimension)?,
        height: parse_dimension("Height", height, max_dimension)?,
    })
}

// An unbounded size would reach the resize below and abort on allocation.
fn parse_dimension(field: &'static str, value: &str, max: u32) -> Result<u32, SnapshotError> {
    match value.parse::<u32>() {
        Ok(v) if (1..=max).contains(&v) => Ok(v),
        _ => Err(SnapshotError::InvalidDimension { field, value: value.to_string(), max }),
    }
}

/// `{name}{timestamp}.png`, with `/` in the formatted timestamp replaced by `-`.
pub fn file_name(name: &str, now: &NaiveDateTime, format: &str) -> Result<String, SnapshotError> {
    let mut stamp = String::new();
    // chrono reports a bad format string as a fmt::Error instead of panicking here.
    write!(stamp, "{}", now.format(format))
        .map_err(|_| SnapshotError::TimestampFormat(format.to_string()))?;
    Ok(format!("{name}{}.png", stamp.replace('/', "-")))
}

pub struct SnapshotWriter {
    state: SnapshotState,
    timestamp_format: String,
    cooldown: Duration,
    max_dimension: u32,
}

impl SnapshotWriter {
    pub fn new(cfg: &SnapshotConfig) -> Self {
        Self {
            state: SnapshotState::Idle,
            timestamp_format: cfg.timestamp_format.clone(),
            cooldown: Duration::from_millis(cfg.cooldown_ms),
            max_dimension: cfg.max_dimension,
        }
    }

    pub fn state(&self) -> SnapshotState {
        self.state
    }

    /// Save `frame` and report any failure through a popup.
    /// Returns the written file on success.
    pub fn snap(
        &mut self,
        frame: &DynamicImage,
        req: &SnapshotRequest<'_>,
        dialogs: &dyn Dialogs,
    ) -> Option<PathBuf> {
        match self.save_at(frame, req, Local::now().naive_local()) {
            Ok(path) => Some(path),
            Err(e) => {
                if matches!(e, SnapshotError::Write { .. } | SnapshotError::TimestampFormat(_)) {
                    log::error!("Snapshot failed: {e}");
                }
                dialogs.error("Error", &e.to_string());
                None
            }
        }
    }

    /// Idle -> Saving -> Idle around one save attempt.
    pub fn save_at(
        &mut self,
        frame: &DynamicImage,
        req: &SnapshotRequest<'_>,
        now: NaiveDateTime,
    ) -> Result<PathBuf, SnapshotError> {
        if self.state == SnapshotState::Saving {
            return Err(SnapshotError::Busy);
        }
        self.state = SnapshotState::Saving;
        let result = self.write(frame, req, &now);
        if result.is_ok() && !self.cooldown.is_zero() {
            std::thread::sleep(self.cooldown);
        }
        self.state = SnapshotState::Idle;
        result
    }

    fn write(
        &self,
        frame: &DynamicImage,
        req: &SnapshotRequest<'_>,
        now: &NaiveDateTime,
    ) -> Result<PathBuf, SnapshotError> {
        // 1) Fields, 2) file name, 3) resize, 4) write.
        let target = validate(req, self.max_dimension)?;
        let name = file_name(req.name, now, &self.timestamp_format)?;
        let path = target.dir.join(&name);

        let resized = frame.resize_exact(target.width, target.height, FilterType::CatmullRom);
        save_png(&resized, &path)?;

        log::info!("Saved snapshot {} ({}x{})", path.display(), target.width, target.height);
        Ok(path)
    }
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), SnapshotError> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| SnapshotError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::testing::RecordingDialogs;
    use chrono::NaiveDate;
    use image::{GenericImageView, Rgb, RgbImage};

    fn frame() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([200, 100, 50])))
    }

    fn writer() -> SnapshotWriter {
        SnapshotWriter::new(&SnapshotConfig { cooldown_ms: 0, ..SnapshotConfig::default() })
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 7, 9).unwrap()
    }

    fn files_in(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect()
    }

    #[test]
    fn test_file_name_is_filesystem_safe() {
        let name = file_name("me", &at(), "%m/%d_%I.%M.%S").unwrap();
        assert_eq!(name, "me03-05_02.07.09.png");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_file_name_bad_format_is_error() {
        assert!(matches!(file_name("x", &at(), "%Q"), Err(SnapshotError::TimestampFormat(_))));
    }

    #[test]
    fn test_validate_order() {
        let req = SnapshotRequest { name: "", path: "  ", width: "", height: "" };
        assert!(matches!(validate(&req, 8192), Err(SnapshotError::MissingPath)));

        let req = SnapshotRequest { name: "", path: "/tmp", width: "640", height: "" };
        assert!(matches!(validate(&req, 8192), Err(SnapshotError::MissingDimensions)));

        let req = SnapshotRequest { name: "", path: "/tmp", width: "0", height: "480" };
        assert!(matches!(validate(&req, 8192), Err(SnapshotError::InvalidDimension { field: "Width", .. })));

        let req = SnapshotRequest { name: "", path: "/tmp", width: "640", height: "4x" };
        assert!(matches!(validate(&req, 8192), Err(SnapshotError::InvalidDimension { field: "Height", .. })));

        let req = SnapshotRequest { name: "", path: "/tmp", width: " 640 ", height: "480" };
        let target = validate(&req, 8192).unwrap();
        assert_eq!((target.width, target.height), (640, 480));
    }

    #[test]
    fn test_empty_path_pops_up_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dialogs = RecordingDialogs::default();
        let mut w = writer();

        let req = SnapshotRequest { name: "me", path: "", width: "640", height: "480" };
        assert!(w.snap(&frame(), &req, &dialogs).is_none());

        let popups = dialogs.popups.borrow();
        assert_eq!(popups.len(), 1);
        assert_eq!(popups[0].1, "You must select a folder to save photos.");
        assert!(files_in(dir.path()).is_empty());
        assert_eq!(w.state(), SnapshotState::Idle);
    }

    #[test]
    fn test_missing_dimensions_pops_up() {
        let dir = tempfile::tempdir().unwrap();
        let dialogs = RecordingDialogs::default();
        let path = dir.path().display().to_string();
        let req = SnapshotRequest { name: "me", path: &path, width: "", height: "480" };

        assert!(writer().snap(&frame(), &req, &dialogs).is_none());
        assert!(dialogs.popups.borrow()[0].1.starts_with("You must enter dimensions"));
        assert!(files_in(dir.path()).is_empty());
    }

    #[test]
    fn test_validate_rejects_sizes_above_max() {
        let req = SnapshotRequest { name: "", path: "/tmp", width: "8193", height: "480" };
        assert!(matches!(
            validate(&req, 8192),
            Err(SnapshotError::InvalidDimension { field: "Width", max: 8192, .. })
        ));

        let req = SnapshotRequest { name: "", path: "/tmp", width: "8192", height: "8192" };
        assert!(validate(&req, 8192).is_ok());
    }

    #[test]
    fn test_huge_dimensions_pop_up_and_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dialogs = RecordingDialogs::default();
        let path = dir.path().display().to_string();
        let tiny = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let req = SnapshotRequest {
            name: "big",
            path: &path,
            width: "4294967295",
            height: "4294967295",
        };

        let mut w = writer();
        assert!(w.snap(&tiny, &req, &dialogs).is_none());

        let popups = dialogs.popups.borrow();
        assert_eq!(popups.len(), 1);
        assert!(popups[0].1.starts_with("Width must be a whole number from 1 to 8192"));
        assert!(files_in(dir.path()).is_empty());
        assert_eq!(w.state(), SnapshotState::Idle);
    }

    #[test]
    fn test_valid_save_writes_one_png_at_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().display().to_string();
        let req = SnapshotRequest { name: "shot", path: &path, width: "32", height: "20" };

        let written = writer().save_at(&frame(), &req, at()).unwrap();

        assert_eq!(files_in(dir.path()), vec![written.clone()]);
        assert_eq!(written.file_name().unwrap(), "shot03-05_02.07.09.png");
        let back = image::open(&written).unwrap();
        assert_eq!(back.dimensions(), (32, 20));
    }

    #[test]
    fn test_snap_with_live_clock_names_file_by_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let dialogs = RecordingDialogs::default();
        let path = dir.path().display().to_string();
        let req = SnapshotRequest { name: "me", path: &path, width: "16", height: "16" };

        let written = writer().snap(&frame(), &req, &dialogs).unwrap();
        let name = written.file_name().unwrap().to_string_lossy().to_string();

        assert!(dialogs.popups.borrow().is_empty());
        // me + MM-DD_HH.MM.SS + .png
        assert_eq!(name.len(), "me".len() + "MM-DD_HH.MM.SS".len() + ".png".len());
        assert!(name.starts_with("me") && name.ends_with(".png"));
        assert_eq!(&name[4..5], "-");
        assert_eq!(&name[7..8], "_");
    }

    #[test]
    fn test_grayscale_frame_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().display().to_string();
        let req = SnapshotRequest { name: "", path: &path, width: "10", height: "10" };
        let gray = DynamicImage::ImageRgb8(RgbImage::new(20, 20)).grayscale();

        let written = writer().save_at(&gray, &req, at()).unwrap();
        assert_eq!(image::open(written).unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").display().to_string();
        let req = SnapshotRequest { name: "", path: &path, width: "10", height: "10" };

        let err = writer().save_at(&frame(), &req, at()).unwrap_err();
        assert!(matches!(err, SnapshotError::Write { .. }));
    }

    #[test]
    fn test_request_reads_controls() {
        let mut c = Controls::default();
        c.save_name = "a".into();
        c.save_path = "/p".into();
        let req = SnapshotRequest::from_controls(&c);
        assert_eq!((req.name, req.path, req.width, req.height), ("a", "/p", "640", "480"));
    }
}
