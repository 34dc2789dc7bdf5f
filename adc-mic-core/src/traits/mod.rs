pub mod codec_driver;
pub mod diagnostics;
pub mod region_allocator;
pub mod task;
