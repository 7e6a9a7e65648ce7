pub mod lit_pass;
pub mod shadow_pass;
pub mod skybox_pass;

pub use lit_pass::LitPass;
pub use shadow_pass::{ShadowPass, DEFAULT_SHADOW_RESOLUTION};
pub use skybox_pass::SkyboxPass;
