pub mod frame_packet;
pub mod pass_trait;

pub use frame_packet::{CameraPacket, FramePacket, LightPacket};
pub use pass_trait::RenderPass;
