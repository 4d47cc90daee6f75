//! Post-processing passes. Every pass draws a full-screen triangle into an
//! HDR target except the output pass, which writes the surface.

mod afterimage;
mod bloom;
mod fullscreen;
mod fxaa;
mod output;
mod target;

pub(crate) use afterimage::AfterimagePass;
pub(crate) use bloom::BloomPass;
pub(crate) use fxaa::FxaaPass;
pub(crate) use output::OutputPass;
pub(crate) use target::{HDR_FORMAT, RenderTarget, linear_sampler};
