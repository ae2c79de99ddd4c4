pub mod catalog;
pub mod compile;
pub mod extract;
pub mod file_scanner;
pub mod parsers;
