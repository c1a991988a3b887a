pub mod fireworks;
