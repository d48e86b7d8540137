//! Rendering: Vulkan resource wrappers and the text renderer built on them

pub mod text;
pub mod vulkan;
