pub mod shell;
pub mod table;
