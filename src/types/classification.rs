/// Gesture labels the classifier can produce. `None` is the explicit
/// "no gesture" sentinel so every frame yields exactly one label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Pinch,
    PeaceSign,
    ThumbsUp,
    Fist,
    OpenPalm,
    None,
}

impl Gesture {
    /// All real gestures, in classifier priority order.
    pub const ALL: [Gesture; 5] = [
        Gesture::Pinch,
        Gesture::PeaceSign,
        Gesture::ThumbsUp,
        Gesture::Fist,
        Gesture::OpenPalm,
    ];
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Gesture::Pinch => "pinch",
            Gesture::PeaceSign => "peace_sign",
            Gesture::ThumbsUp => "thumbs_up",
            Gesture::Fist => "fist",
            Gesture::OpenPalm => "open_palm",
            Gesture::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Per-frame classifier output for one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub label: Gesture,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: Gesture, confidence: f32) -> Self {
        Self { label, confidence }
    }

    pub fn none() -> Self {
        Self {
            label: Gesture::None,
            confidence: 0.0,
        }
    }
}
