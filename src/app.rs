// Application state and the capture-and-render loop.

use crate::camera::CameraCapture;
use crate::config::Config;
use crate::controls::{Controls, UiAction};
use crate::dialogs::Dialogs;
use crate::draw::Drawer;
use crate::error::Error;
use crate::face::FaceDetector;
use crate::panel::{PANEL_HEIGHT, Panel};
use crate::pipeline::FrameProcessor;
use crate::snapshot::{SnapshotRequest, SnapshotState, SnapshotWriter};
use crate::types::{FrameBuffer, Rect};

/// Outcome of applying one poll's worth of actions to `Controls`.
#[derive(Debug, Default, PartialEq)]
pub struct Dispatch {
    pub exit: bool,
    /// Actions that need the current frame or a dialog; run after rendering.
    pub deferred: Vec<UiAction>,
}

/// Apply state-only actions immediately and defer the rest.
pub fn dispatch(controls: &mut Controls, actions: Vec<UiAction>) -> Dispatch {
    let mut out = Dispatch::default();
    for action in actions {
        match action {
            UiAction::Exit => out.exit = true,
            UiAction::Snap | UiAction::BrowseFolder => out.deferred.push(action),
            other => controls.apply(other),
        }
    }
    out
}

pub struct App {
    drawer: Drawer,
    camera: CameraCapture,
    detector: Option<Box<dyn FaceDetector>>,
    dialogs: Box<dyn Dialogs>,
    processor: FrameProcessor,
    snapshots: SnapshotWriter,
    controls: Controls,
    panel: Panel,
    screen: FrameBuffer,
    video_area: Rect,
}

impl App {
    pub fn new(
        config: &Config,
        camera: CameraCapture,
        detector: Option<Box<dyn FaceDetector>>,
        dialogs: Box<dyn Dialogs>,
    ) -> Result<Self, Error> {
        let (vw, vh) = (config.window.video_width, config.window.video_height);
        let screen = FrameBuffer::new(vw, vh + PANEL_HEIGHT);
        let drawer = Drawer::new(&config.window, screen.width, screen.height)?;

        Ok(Self {
            drawer,
            camera,
            detector,
            dialogs,
            processor: FrameProcessor::new((config.face.output_width, config.face.output_height)),
            snapshots: SnapshotWriter::new(&config.snapshot),
            controls: Controls::from_config(&config.snapshot),
            panel: Panel::new(vh, vw),
            screen,
            video_area: Rect::new(0, 0, vw as u32, vh as u32),
        })
    }

    /// Poll, process, draw; until Exit or the window closes.
    pub fn run(&mut self) -> Result<(), Error> {
        let (cw, ch) = self.camera.resolution();
        log::info!("Preview running ({cw}x{ch} source)");

        while self.drawer.is_open() {
            // 1) Turn clicks, drags and keys into actions and apply the cheap ones.
            //    Visual: checkboxes and sliders react on this same frame.
            let actions = self.drawer.poll_actions(&self.panel, &self.controls);
            let Dispatch { exit, deferred } = dispatch(&mut self.controls, actions);
            if exit {
                log::info!("Exit requested");
                break;
            }

            // 2) Grab one frame and run it through the effect pipeline.
            let raw = self.camera.next_frame()?;
            let processed = self.processor.process(raw, &self.controls, self.detector.as_deref_mut());

            // 3) Compose and show.
            //    Visual: live image on top (letterboxed to the video area), panel below.
            self.screen.fill(0);
            self.screen.blit_image(&processed.view, self.video_area);
            self.panel.render(&mut self.screen, &self.controls);
            self.drawer.present(&self.screen)?;

            // 4) Actions that need this frame or a native dialog.
            //    Visual: Snap may pause the preview for the cooldown; a popup appears on errors.
            for action in deferred {
                match action {
                    UiAction::Snap
                        if self.controls.snap_visible()
                            && self.snapshots.state() == SnapshotState::Idle =>
                    {
                        let req = SnapshotRequest::from_controls(&self.controls);
                        self.snapshots.snap(&processed.frame, &req, self.dialogs.as_ref());
                    }
                    UiAction::BrowseFolder => {
                        if let Some(dir) = self.dialogs.pick_folder() {
                            self.controls.apply(UiAction::SetSavePath(dir));
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
