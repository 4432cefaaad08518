//! Cumulus generates layered, stippled cloud illustrations.
//!
//! The geometric heart is a two-pass construction: a noise-displaced
//! baseline is covered with overlapping construction circles, the walk along
//! their outer arcs gives a smooth coarse silhouette, and repeating the
//! circle/walk pass over that silhouette with smaller radii gives the final
//! fluffy outline.
//!
//! # Pipeline overview
//!
//! 1. **Baseline**: [`generate_noise_path`] displaces a straight line with
//!    coherent noise.
//! 2. **Circles**: [`build_circle_chain`] covers a path with randomly sized,
//!    always-overlapping construction circles.
//! 3. **Outline**: [`walk_circle_chain`] traces the outer tangent arcs of a
//!    chain into a continuous path.
//! 4. **Layers**: [`run_cloud_pipeline`] stacks N cloud layers over the lower
//!    part of the canvas, running the circle/walk pair twice per layer.
//! 5. **Paint** (optional): [`paint_scene`] renders the outlines in a
//!    hand-stippled, dotted-stroke style onto an RGBA canvas.
//!
//! Geometry stages are pure: they draw nothing, take their noise source and
//! RNG as parameters, and are deterministic for a fixed seed. Long runs
//! suspend cooperatively at [`Checkpoint`] boundaries and honor an advisory
//! [`CancelToken`] by returning partial results.
#![forbid(unsafe_code)]

pub mod cancel;
pub mod chain;
pub mod error;
pub mod geom;
pub mod noise_field;
pub mod paint;
pub mod path;
pub mod pipeline;
pub mod raster;
pub mod walk;

pub use cancel::{CancelToken, Checkpoint};
pub use chain::build_circle_chain;
pub use error::{CumulusError, CumulusResult};
pub use geom::{Circle, CircleChain, Point, PointPath, Vec2};
pub use noise_field::{ConstantField, NoiseSource, PerlinField};
pub use paint::{Painter, SketchStyle, paint_scene};
pub use path::generate_noise_path;
pub use pipeline::{
    CloudLayer, CloudPaths, LayerDebug, LayerSet, PipelineConfig, RadiusRange, build_cloud_layer,
    run_cloud_pipeline,
};
pub use walk::{ChainWalk, walk_circle_chain};
