pub mod bench;
pub mod worlds;
