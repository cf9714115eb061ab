pub mod filter_bar;
pub mod help_bar;
pub mod search_input;
