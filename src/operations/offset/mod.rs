mod buffer;

pub use buffer::{buffer, buffer_all, buffer_with, BufferOptions};
