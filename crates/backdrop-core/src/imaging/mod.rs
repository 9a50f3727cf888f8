//! Image processing for the photo pipeline.
//!
//! - `remover` -- `BackgroundRemover` port for the external segmentation model
//! - `composite` -- background fitting and "over" alpha compositing
//! - `pipeline` -- `ImagePipeline`, the download -> remove -> composite -> send flow
//! - `workspace` -- per-request temp directory that cleans itself up

pub mod composite;
pub mod pipeline;
pub mod remover;
pub mod workspace;

pub use pipeline::ImagePipeline;
pub use remover::BackgroundRemover;
pub use workspace::RequestWorkspace;
