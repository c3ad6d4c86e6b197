pub mod ai;
pub mod boss;
pub mod combat;
pub mod movement;
pub mod projectile;
