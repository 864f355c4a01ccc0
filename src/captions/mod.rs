pub mod entry;
pub mod srt;
