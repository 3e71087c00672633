mod app;
mod pages;
mod widgets;

pub use app::launch_gui;
