pub mod guard;
pub mod table;
