pub mod clock;
pub mod controls;
pub mod handle;
