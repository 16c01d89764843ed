// Library exports for polargram

pub mod colormap;
pub mod events;
pub mod export;
pub mod figure;
pub mod grid;
pub mod histogram;
pub mod mesh;
