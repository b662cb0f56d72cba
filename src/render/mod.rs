pub mod camera;
pub mod compositor;
pub mod markers;
pub mod material;
pub mod raster;

pub use camera::OrthographicCamera;
pub use compositor::Compositor;
pub use markers::{MarkerLayer, MarkerStyle};
pub use material::{ColorMaterial, MaterialCache};
pub use raster::{DepthTest, Fragment, Framebuffer};
