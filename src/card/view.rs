//! Presentation state exposed to the shell.

use image::RgbImage;

use crate::config::Size;

/// Shown in the QR view while no device could be opened.
pub const CAMERA_NOT_FOUND: &str = "Error: camera not found.";

/// Shown in the QR view until the first frame arrives.
pub const CAMERA_STARTING: &str = "Starting camera...";

/// Everything a shell needs to draw the card.
///
/// The controller is the only writer; shells read it after each event.
#[derive(Debug, Clone)]
pub struct CardView {
    surface: Size,
    credential_focused: bool,
    credential_len: usize,
    display_image: Option<RgbImage>,
    status_text: Option<&'static str>,
    error_text: Option<&'static str>,
    feedback_pulses: u64,
}

impl CardView {
    pub(crate) fn new(surface: Size) -> Self {
        Self {
            surface,
            credential_focused: false,
            credential_len: 0,
            display_image: None,
            status_text: None,
            error_text: None,
            feedback_pulses: 0,
        }
    }

    /// Current card size.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Whether the credential field holds input focus.
    pub fn credential_focused(&self) -> bool {
        self.credential_focused
    }

    /// Length of the text in the credential field.
    pub fn credential_len(&self) -> usize {
        self.credential_len
    }

    /// Latest viewfinder image, if any.
    pub fn display_image(&self) -> Option<&RgbImage> {
        self.display_image.as_ref()
    }

    /// Transient camera status shown in place of the viewfinder.
    pub fn status_text(&self) -> Option<&'static str> {
        self.status_text
    }

    /// Error shown in the QR view.
    pub fn error_text(&self) -> Option<&'static str> {
        self.error_text
    }

    /// How many times failure feedback (the shake) has fired.
    pub fn feedback_pulses(&self) -> u64 {
        self.feedback_pulses
    }

    pub(crate) fn resize(&mut self, surface: Size) {
        self.surface = surface;
    }

    pub(crate) fn set_focus(&mut self, focused: bool) {
        self.credential_focused = focused;
    }

    pub(crate) fn set_credential_len(&mut self, len: usize) {
        self.credential_len = len;
    }

    /// Clears the viewfinder and shows the starting status.
    pub(crate) fn camera_starting(&mut self) {
        self.display_image = None;
        self.error_text = None;
        self.status_text = Some(CAMERA_STARTING);
    }

    /// Clears everything the QR view showed.
    pub(crate) fn camera_idle(&mut self) {
        self.display_image = None;
        self.status_text = None;
        self.error_text = None;
    }

    pub(crate) fn camera_unavailable(&mut self) {
        self.display_image = None;
        self.status_text = None;
        self.error_text = Some(CAMERA_NOT_FOUND);
    }

    pub(crate) fn show_frame(&mut self, image: RgbImage) {
        self.status_text = None;
        self.display_image = Some(image);
    }

    pub(crate) fn shake(&mut self) {
        self.feedback_pulses += 1;
    }
}
