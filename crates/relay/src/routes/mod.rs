pub mod health;
pub mod relay;
