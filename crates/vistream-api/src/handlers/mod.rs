pub mod health;
pub mod video_stream;
