//! The `RenderPass` trait, implemented by every stage of a frame.
//!
//! The [`Renderer`](crate::Renderer) runs its passes in registration order.
//! A pass sets all the device state it relies on at the start of `execute`;
//! a pass that changes depth or culling defaults restores them before
//! returning.
use crate::graph::FramePacket;
use crate::gpu::RenderDevice;
use crate::scene::{DrawStats, Scene};

pub trait RenderPass {
    /// Short label used in logs and frame statistics.
    fn name(&self) -> &'static str;

    /// Records the pass.
    fn execute(&mut self, device: &mut dyn RenderDevice, scene: &mut Scene, packet: &FramePacket) -> DrawStats;

    /// Releases the pass's GPU resources.  Called once at teardown.
    fn destroy(&mut self, device: &mut dyn RenderDevice);
}
