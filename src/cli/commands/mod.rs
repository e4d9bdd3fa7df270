mod convert;
mod toc;

pub use convert::handle_convert_command;
pub use toc::handle_toc_command;
