pub mod classification;
pub mod command;
pub mod event;
pub mod landmark;

pub use classification::{Classification, Gesture};
pub use command::SystemCommand;
pub use event::{Frame, GestureEvent};
pub use landmark::{HandObservation, Handedness, Landmark, LANDMARK_COUNT};
