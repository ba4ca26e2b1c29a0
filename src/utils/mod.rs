pub mod fetch;
pub mod pdf;
pub mod sniff;
pub mod text;
