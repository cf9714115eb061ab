pub mod detail;
pub mod list;
pub mod outfits;
pub mod recommendations;
pub mod status;
