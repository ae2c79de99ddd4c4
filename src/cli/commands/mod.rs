mod command_result;
pub mod compile;
pub mod extract;
pub mod helper;
pub mod init;

pub use command_result::*;
