//! Building blocks for the interactive globe viewer.
//!
//! The crate exposes the scene description, rotation and drag state
//! machines, the resize debouncer, and the wgpu renderer as separate
//! pieces so the interaction logic stays testable without a GPU or a
//! window. The binary wires them to a winit event loop.

pub mod assets;
pub mod config;
pub mod debounce;
pub mod input;
pub mod render;
pub mod rotation;
pub mod scene;
pub mod sphere;
pub mod viewer;

pub use assets::PendingTexture;
pub use config::GlobeConfig;
pub use debounce::ResizeDebouncer;
pub use input::DragTracker;
pub use render::{CameraParams, LightParams, Renderer};
pub use rotation::Rotation;
pub use scene::{GlobeScene, MeshNode, Shading, Side, Surface, TextureKind};
pub use sphere::SphereMesh;
pub use viewer::GlobeViewer;
