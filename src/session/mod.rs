pub mod gate;
pub mod video_book;
