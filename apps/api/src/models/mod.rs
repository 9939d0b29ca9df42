pub mod pitch;
pub mod startup;
