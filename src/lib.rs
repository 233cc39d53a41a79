//! Butterflies that drift over a page, hover on its important words and
//! scatter from the cursor.
//!
//! [`garden::GardenSimulation`] owns the whole simulation. The host feeds it
//! wall time, the pointer and a [`targets::TargetProvider`] over the page's
//! words, and reads back [`render::instance::SpriteInstance`] records to draw.

pub mod butterfly;
pub mod config;
pub mod cursor;
pub mod debug;
pub mod ecs;
pub mod flowers;
pub mod garden;
pub mod heatmap;
pub mod particles;
pub mod render;
pub mod schedule;
pub mod spawner;
pub mod targets;
pub mod util;
pub mod viewport;
pub mod wind;
