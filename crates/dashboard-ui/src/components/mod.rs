pub mod filter_bar;
pub mod header;
