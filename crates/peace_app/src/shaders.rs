use std::path::Path;

use anyhow::{Context, Result};
use peace_renderer::ShaderSource;

/// Sources of the three built-in programs.
pub struct ShaderSet {
    pub depth: ShaderSource,
    pub lit: ShaderSource,
    pub skybox: ShaderSource,
}

const BUILTIN: [(&str, &str, &str); 3] = [
    (
        "depth",
        include_str!("../../../assets/shaders/depth.vert"),
        include_str!("../../../assets/shaders/depth.frag"),
    ),
    (
        "lit",
        include_str!("../../../assets/shaders/lit.vert"),
        include_str!("../../../assets/shaders/lit.frag"),
    ),
    (
        "skybox",
        include_str!("../../../assets/shaders/skybox.vert"),
        include_str!("../../../assets/shaders/skybox.frag"),
    ),
];

fn read_stage(dir: &Path, name: &str, ext: &str) -> Result<String> {
    let path = dir.join("shaders").join(format!("{}.{}", name, ext));
    std::fs::read_to_string(&path).with_context(|| format!("reading shader {}", path.display()))
}

/// Loads `<asset_dir>/shaders/{depth,lit,skybox}.{vert,frag}`, or the
/// sources compiled into the binary when no directory is given.
pub fn load(asset_dir: Option<&Path>) -> Result<ShaderSet> {
    let source = |(name, vert, frag): (&str, &str, &str)| -> Result<ShaderSource> {
        let (vertex, fragment) = match asset_dir {
            Some(dir) => (read_stage(dir, name, "vert")?, read_stage(dir, name, "frag")?),
            None => (vert.to_owned(), frag.to_owned()),
        };
        Ok(ShaderSource { label: name.to_owned(), vertex, fragment })
    };
    let [depth, lit, skybox] = BUILTIN;
    Ok(ShaderSet {
        depth: source(depth)?,
        lit: source(lit)?,
        skybox: source(skybox)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_have_entry_points() {
        let set = load(None).unwrap();
        for src in [&set.depth, &set.lit, &set.skybox] {
            assert!(src.vertex.contains("void main"));
            assert!(src.fragment.contains("void main"));
        }
        assert!(set.lit.fragment.contains("u_shadow_map"));
    }

    #[test]
    fn asset_dir_reads_from_disk() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let set = load(Some(&dir)).unwrap();
        assert_eq!(set.skybox.label, "skybox");
    }

    #[test]
    fn missing_asset_dir_is_an_error() {
        assert!(load(Some(Path::new("/no/such/assets"))).is_err());
    }
}
