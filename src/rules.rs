pub mod no_capture;

pub use no_capture::{NO_CAPTURE, NoCaptureLint};
