//! Uniform names shared with the GLSL sources under `assets/shaders/`.

// per object
pub const MODEL: &str = "u_model";
pub const IS_GHOST: &str = "u_is_ghost";
pub const IS_SELECTED: &str = "u_is_selected";
pub const TEXTURED: &str = "u_textured";
pub const IS_UNLIT: &str = "u_is_unlit";

// per frame
pub const PROJECTION: &str = "u_projection";
pub const VIEW: &str = "u_view";
pub const VIEW_POS: &str = "u_view_pos";
pub const LIGHT_POS: &str = "u_light_pos";
pub const LIGHT_COLOR: &str = "u_light_color";
pub const AMBIENT_COLOR: &str = "u_ambient_color";
pub const LIGHT_SPACE: &str = "u_light_space";

// samplers
pub const OBJECT_TEXTURE: &str = "u_object_texture";
pub const SHADOW_MAP: &str = "u_shadow_map";
pub const SKYBOX: &str = "u_skybox";

/// Texture unit of the per-object colour texture.
pub const OBJECT_TEXTURE_UNIT: u32 = 0;
/// Texture unit the shadow depth map is bound to during the lit pass.
pub const SHADOW_MAP_UNIT: u32 = 1;
/// Texture unit of the sky cube map during the skybox pass.
pub const SKYBOX_UNIT: u32 = 0;
