use super::Gesture;

/// Abstract system-control command forwarded at the dispatch boundary.
/// Executing these (mixer, screenshot, media keys) belongs to an external
/// collaborator; the pipeline only names the intent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SystemCommand {
    AdjustVolume { confidence: f32 },
    TakeScreenshot,
    SendLike,
    ToggleMedia,
    StopMedia,
}

impl SystemCommand {
    /// Gesture → command mapping. `Gesture::None` never reaches dispatch.
    pub fn for_gesture(gesture: Gesture, confidence: f32) -> Option<SystemCommand> {
        match gesture {
            Gesture::Pinch => Some(SystemCommand::AdjustVolume { confidence }),
            Gesture::PeaceSign => Some(SystemCommand::TakeScreenshot),
            Gesture::ThumbsUp => Some(SystemCommand::SendLike),
            Gesture::Fist => Some(SystemCommand::ToggleMedia),
            Gesture::OpenPalm => Some(SystemCommand::StopMedia),
            Gesture::None => None,
        }
    }
}

impl std::fmt::Display for SystemCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemCommand::AdjustVolume { confidence } => {
                write!(f, "adjust_volume(confidence={:.2})", confidence)
            }
            SystemCommand::TakeScreenshot => write!(f, "take_screenshot"),
            SystemCommand::SendLike => write!(f, "send_like"),
            SystemCommand::ToggleMedia => write!(f, "toggle_media"),
            SystemCommand::StopMedia => write!(f, "stop_media"),
        }
    }
}
