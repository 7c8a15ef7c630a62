pub mod next_line;
pub mod queued;
pub mod stream;
