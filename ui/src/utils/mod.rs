pub mod drop_handler;
pub mod file_picker;
pub mod thumbnails;
