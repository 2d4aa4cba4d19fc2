pub mod genome;
pub mod hardware;
pub mod organism;
