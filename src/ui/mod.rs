pub mod browser;
pub mod console;
pub mod drives;
pub mod input;
pub mod menu;
pub mod navigation;
