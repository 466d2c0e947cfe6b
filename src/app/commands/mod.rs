pub mod process;
pub mod reclassify;
pub mod rotate;
pub mod update;
