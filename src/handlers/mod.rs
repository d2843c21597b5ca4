pub mod health;
pub mod materials;
