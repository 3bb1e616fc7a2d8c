pub mod img_stuffs;
pub mod metadata;
pub mod misc;
