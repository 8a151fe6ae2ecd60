pub mod lava;
pub mod persistence;
