pub mod engage;
pub mod squad;
