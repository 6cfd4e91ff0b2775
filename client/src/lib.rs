mod app;
mod dom;
mod drawing;
mod nav;
mod pages;
mod quiz;
mod render;
mod state;
mod stimulus;
mod tutorial;
mod util;

pub use app::run;
