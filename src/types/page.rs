use serde::{Deserialize, Serialize};

/// What the capture side can read from the page's video element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoProbe {
    /// Playback position in seconds, if the element reports one.
    pub current_time: Option<f64>,
}

/// The page being watched, as seen by the capture side.
///
/// Every probe may come back empty while the page is still loading; callers
/// treat that as "not ready", never as a failure.
pub trait HostPage {
    fn location(&self) -> String;
    fn video(&self) -> Option<VideoProbe>;
    fn title(&self) -> Option<String>;
    fn has_controls(&self) -> bool;
    fn has_capture_button(&self) -> bool;
    fn insert_capture_button(&mut self);
    fn remove_capture_button(&mut self);
}

/// A plain-data page, used when the host reports its state in one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub location: String,
    pub video: Option<VideoProbe>,
    pub title: Option<String>,
    #[serde(default)]
    pub controls: bool,
    #[serde(default)]
    pub button_present: bool,
}

impl PageSnapshot {
    /// A watch page with a playing video and its controls bar loaded.
    pub fn watching(location: &str, current_time: f64, title: &str) -> Self {
        Self {
            location: location.to_string(),
            video: Some(VideoProbe {
                current_time: Some(current_time),
            }),
            title: Some(title.to_string()),
            controls: true,
            button_present: false,
        }
    }
}

impl HostPage for PageSnapshot {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn video(&self) -> Option<VideoProbe> {
        self.video
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn has_controls(&self) -> bool {
        self.controls
    }

    fn has_capture_button(&self) -> bool {
        self.button_present
    }

    fn insert_capture_button(&mut self) {
        self.button_present = true;
    }

    fn remove_capture_button(&mut self) {
        self.button_present = false;
    }
}
