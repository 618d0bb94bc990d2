// ThreeCAD Core Library
// Re-export all modules for external use

pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod model;
pub mod platform;
pub mod session;
pub mod tasks;
pub mod ui;
pub mod viewer3d;

// Re-export ThreeCadApp from app module
pub use app::ThreeCadApp;
