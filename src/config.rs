use serde::{Deserialize, Serialize};

/// Application configuration.
/// All thresholds are loaded once at startup and treated as immutable for a
/// pipeline's lifetime; reconfiguration means building a fresh pipeline.

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub recognition: RecognitionConfig,
    pub channels: ChannelConfig,
    pub pipeline: PipelineConfig,
}

/// Landmark-source boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Hands below this detection confidence are skipped before extraction.
    pub min_detection_confidence: f32,
    pub max_num_hands: usize,
}

/// Classifier and stabilizer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Thumb–index planar distance (normalized units) below which the pinch
    /// rule matches.
    pub pinch_distance_threshold: f32,
    /// A finger with curl ratio above this is "extended".
    pub extension_threshold: f32,
    /// A finger with curl ratio below this is "curled".
    pub curl_threshold: f32,
    /// Index–middle spread required for a peace sign, normalized units.
    pub peace_spread_min: f32,
    /// Maximum |orientation| from vertical for thumbs_up, degrees.
    pub vertical_orientation_max_deg: f32,
    /// Minimum average confidence of the majority label before the
    /// stabilizer confirms a candidate.
    pub gesture_confidence_threshold: f32,
    /// Minimum time between two confirmations of the same label for the
    /// same hand.
    pub cooldown_period_seconds: f64,
    /// Stabilizer history window, frames.
    pub smoothing_buffer_size: usize,
    /// A hand unseen for this long starts fresh on reacquisition.
    pub hand_idle_timeout_seconds: f64,
    pub min_confidence: MinConfidence,
}

/// Per-gesture minimum classifier confidence; a matched rule scoring below
/// its minimum classifies as none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinConfidence {
    pub pinch: f32,
    pub peace_sign: f32,
    pub thumbs_up: f32,
    pub fist: f32,
    pub open_palm: f32,
}

/// Inter-stage queue capacities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub frame_queue_capacity: usize,
    pub event_queue_capacity: usize,
    pub command_queue_capacity: usize,
}

/// Orchestrator timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How long shutdown waits for in-flight frames before abandoning them.
    pub drain_deadline_ms: u64,
    /// Pacing for the simulated source.
    pub target_fps: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.7,
            max_num_hands: 2,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            pinch_distance_threshold: 0.05,
            extension_threshold: 1.0,
            curl_threshold: 0.6,
            peace_spread_min: 0.04,
            vertical_orientation_max_deg: 30.0,
            gesture_confidence_threshold: 0.6,
            cooldown_period_seconds: 1.0,
            smoothing_buffer_size: 5,
            hand_idle_timeout_seconds: 2.0,
            min_confidence: MinConfidence::default(),
        }
    }
}

impl Default for MinConfidence {
    fn default() -> Self {
        Self {
            pinch: 0.5,
            peace_sign: 0.5,
            thumbs_up: 0.5,
            fist: 0.5,
            open_palm: 0.5,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            frame_queue_capacity: 4,
            event_queue_capacity: 64,
            command_queue_capacity: 64,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drain_deadline_ms: 2000,
            target_fps: 30,
        }
    }
}

impl MinConfidence {
    pub fn for_gesture(&self, gesture: crate::types::Gesture) -> f32 {
        use crate::types::Gesture;
        match gesture {
            Gesture::Pinch => self.pinch,
            Gesture::PeaceSign => self.peace_sign,
            Gesture::ThumbsUp => self.thumbs_up,
            Gesture::Fist => self.fist,
            Gesture::OpenPalm => self.open_palm,
            Gesture::None => 0.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Reject out-of-range thresholds before they can reach the
    /// classification path. Fatal at pipeline construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.detection.min_detection_confidence) {
            return Err(ConfigError::ValidationError(
                "min_detection_confidence must be in [0, 1]".to_string(),
            ));
        }

        if self.detection.max_num_hands == 0 {
            return Err(ConfigError::ValidationError(
                "max_num_hands must be at least 1".to_string(),
            ));
        }

        if self.recognition.pinch_distance_threshold <= 0.0 {
            return Err(ConfigError::ValidationError(
                "pinch_distance_threshold must be positive".to_string(),
            ));
        }

        if self.recognition.curl_threshold >= self.recognition.extension_threshold {
            return Err(ConfigError::ValidationError(
                "curl_threshold must be below extension_threshold".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.recognition.gesture_confidence_threshold) {
            return Err(ConfigError::ValidationError(
                "gesture_confidence_threshold must be in [0, 1]".to_string(),
            ));
        }

        if self.recognition.cooldown_period_seconds < 0.0 {
            return Err(ConfigError::ValidationError(
                "cooldown_period_seconds must not be negative".to_string(),
            ));
        }

        if self.recognition.smoothing_buffer_size < 2 {
            return Err(ConfigError::ValidationError(
                "smoothing_buffer_size must be at least 2".to_string(),
            ));
        }

        if self.recognition.hand_idle_timeout_seconds <= 0.0 {
            return Err(ConfigError::ValidationError(
                "hand_idle_timeout_seconds must be positive".to_string(),
            ));
        }

        let min = &self.recognition.min_confidence;
        for (name, value) in [
            ("pinch", min.pinch),
            ("peace_sign", min.peace_sign),
            ("thumbs_up", min.thumbs_up),
            ("fist", min.fist),
            ("open_palm", min.open_palm),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "min_confidence.{} must be in [0, 1]",
                    name
                )));
            }
        }

        if self.channels.frame_queue_capacity == 0
            || self.channels.event_queue_capacity == 0
            || self.channels.command_queue_capacity == 0
        {
            return Err(ConfigError::ValidationError(
                "channel capacities must be positive".to_string(),
            ));
        }

        if self.pipeline.target_fps == 0 {
            return Err(ConfigError::ValidationError(
                "target_fps must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
