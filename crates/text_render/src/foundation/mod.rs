//! Foundation utilities shared by the renderer and the quiz tracker

pub mod logging;
