pub mod dataset;
pub mod shuffle;
