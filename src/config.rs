use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

/// Every tunable of the globe scene, with the reference defaults.
///
/// The values have no documented derivation; they were chosen empirically
/// and are preserved here as configuration rather than re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    /// Radius of the inner colored sphere.
    pub radius: f32,
    /// Ring and sector count for the sphere and land shells.
    pub segments: u32,
    /// Flat color of the inner sphere (linear 0..1 per channel).
    pub color: Vec3,
    pub land: LandConfig,
    pub background: BackgroundConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub motion: MotionConfig,
}

/// The semi-transparent textured shell floating just above the sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandConfig {
    pub texture: PathBuf,
    /// Radius offset added on top of the sphere radius.
    pub offset: f32,
}

/// The large inverted shell drawn from the inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub texture: PathBuf,
    pub radius: f32,
    pub segments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Tilt about the X axis in degrees.
    pub tilt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Directional light color (linear 0..1 per channel).
    pub color: Vec3,
    pub intensity: f32,
    /// Direction the light arrives from, normalized at use.
    pub direction: Vec3,
    /// Ambient term added to every lit surface.
    pub ambient: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Autonomous yaw increment per rendered frame, in radians.
    pub spin: f32,
    /// Cursor pixels per radian of drag rotation.
    pub drag_divisor: f32,
    /// Quiet period before a resize triggers the rebuild.
    pub debounce_ms: u64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            segments: 32,
            color: Vec3::new(104.0, 44.0, 232.0) / 255.0,
            land: LandConfig {
                texture: PathBuf::from("assets/images/land.png"),
                offset: 0.006,
            },
            background: BackgroundConfig {
                texture: PathBuf::from("assets/images/bg.png"),
                radius: 90.0,
                segments: 64,
            },
            camera: CameraConfig {
                fov: 45.0,
                near: 0.01,
                far: 1000.0,
                position: Vec3::new(-0.2, 0.8, 1.0),
                tilt: -15.0,
            },
            light: LightConfig {
                color: Vec3::ONE,
                intensity: 0.5,
                direction: Vec3::Y,
                ambient: Vec3::splat(51.0 / 255.0),
            },
            motion: MotionConfig {
                spin: 0.0005,
                drag_divisor: 1500.0,
                debounce_ms: 1000,
            },
        }
    }
}

impl GlobeConfig {
    /// Parses overrides from a `<globe>` XML document. Absent tags keep
    /// their defaults; malformed values are errors.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid globe XML")?;
        let root = document.root_element();
        if !root.has_tag_name("globe") {
            return Err(anyhow!("expected a <globe> root element"));
        }

        let mut config = Self::default();
        config.radius = parse_f32(optional_text(&root, "radius"), config.radius)?;
        config.segments = parse_u32(optional_text(&root, "segments"), config.segments)?;
        config.color = parse_color(optional_text(&root, "color"), config.color)?;

        if let Some(land) = section(&root, "land") {
            config.land.texture =
                parse_path(optional_text(&land, "texture"), config.land.texture.clone());
            config.land.offset = parse_f32(optional_text(&land, "offset"), config.land.offset)?;
        }

        if let Some(background) = section(&root, "background") {
            config.background.texture = parse_path(
                optional_text(&background, "texture"),
                config.background.texture.clone(),
            );
            config.background.radius =
                parse_f32(optional_text(&background, "radius"), config.background.radius)?;
            config.background.segments = parse_u32(
                optional_text(&background, "segments"),
                config.background.segments,
            )?;
        }

        if let Some(camera) = section(&root, "camera") {
            config.camera.fov = parse_f32(optional_text(&camera, "fov"), config.camera.fov)?;
            config.camera.near = parse_f32(optional_text(&camera, "near"), config.camera.near)?;
            config.camera.far = parse_f32(optional_text(&camera, "far"), config.camera.far)?;
            config.camera.position =
                parse_vec3(optional_text(&camera, "position"), config.camera.position)?;
            config.camera.tilt = parse_f32(optional_text(&camera, "tilt"), config.camera.tilt)?;
        }

        if let Some(light) = section(&root, "light") {
            config.light.color = parse_color(optional_text(&light, "color"), config.light.color)?;
            config.light.intensity =
                parse_f32(optional_text(&light, "intensity"), config.light.intensity)?;
            config.light.direction =
                parse_vec3(optional_text(&light, "direction"), config.light.direction)?;
            config.light.ambient =
                parse_color(optional_text(&light, "ambient"), config.light.ambient)?;
        }

        if let Some(motion) = section(&root, "motion") {
            config.motion.spin = parse_f32(optional_text(&motion, "spin"), config.motion.spin)?;
            config.motion.drag_divisor = parse_f32(
                optional_text(&motion, "drag"),
                config.motion.drag_divisor,
            )?;
            config.motion.debounce_ms = parse_u64(
                optional_text(&motion, "debounce"),
                config.motion.debounce_ms,
            )?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.motion.debounce_ms)
    }

    /// Radius of the land shell.
    pub fn land_radius(&self) -> f32 {
        self.radius + self.land.offset
    }

    fn validate(&self) -> Result<()> {
        if self.radius <= 0.0 {
            return Err(anyhow!("globe radius must be positive"));
        }
        if self.background.radius <= self.land_radius() {
            return Err(anyhow!("background shell must enclose the globe"));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(anyhow!("camera clip planes are inverted"));
        }
        if self.motion.drag_divisor == 0.0 {
            return Err(anyhow!("drag divisor must be non-zero"));
        }
        Ok(())
    }
}

fn section<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_path(value: Option<String>, default: PathBuf) -> PathBuf {
    value.map(PathBuf::from).unwrap_or(default)
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<f32>().ok());
    let x = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let y = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let z = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    Ok(Vec3::new(x, y, z))
}

fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<f32>().ok());
    let r = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    let g = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    let b = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    Ok(Vec3::new(r / 255.0, g / 255.0, b / 255.0))
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float: {err}")),
        None => Ok(default),
    }
}

fn parse_u32(value: Option<String>, default: u32) -> Result<u32> {
    match value {
        Some(value) => value
            .parse::<u32>()
            .map_err(|err| anyhow!("failed to parse integer: {err}")),
        None => Ok(default),
    }
}

fn parse_u64(value: Option<String>, default: u64) -> Result<u64> {
    match value {
        Some(value) => value
            .parse::<u64>()
            .map_err(|err| anyhow!("failed to parse integer: {err}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <globe>
        <radius>0.75</radius>
        <color>255 0 0</color>
        <camera>
            <fov>60</fov>
            <position>0 1 2</position>
        </camera>
        <motion>
            <debounce>250</debounce>
        </motion>
    </globe>
    "#;

    #[test]
    fn defaults_match_the_reference_constants() {
        let config = GlobeConfig::default();
        assert_eq!(config.radius, 0.5);
        assert_eq!(config.segments, 32);
        assert!((config.land_radius() - 0.506).abs() < 1e-6);
        assert_eq!(config.background.radius, 90.0);
        assert_eq!(config.background.segments, 64);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.motion.spin, 0.0005);
        assert_eq!(config.motion.drag_divisor, 1500.0);
        assert_eq!(config.debounce(), Duration::from_millis(1000));
        // 0x682CE8
        assert!((config.color.x - 104.0 / 255.0).abs() < 1e-6);
        assert!((config.color.y - 44.0 / 255.0).abs() < 1e-6);
        assert!((config.color.z - 232.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn overrides_apply_and_absent_tags_keep_defaults() {
        let config = GlobeConfig::from_xml(SAMPLE).unwrap();
        assert_eq!(config.radius, 0.75);
        assert_eq!(config.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(config.camera.tilt, -15.0);
        assert_eq!(config.motion.debounce_ms, 250);
        assert_eq!(config.motion.spin, 0.0005);
        assert_eq!(config.segments, 32);
    }

    #[test]
    fn wrong_root_element_is_an_error() {
        assert!(GlobeConfig::from_xml("<scene></scene>").is_err());
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let bad = "<globe><radius>wide</radius></globe>";
        assert!(GlobeConfig::from_xml(bad).is_err());
    }

    #[test]
    fn inconsistent_geometry_is_rejected() {
        let bad = "<globe><radius>120</radius></globe>";
        assert!(GlobeConfig::from_xml(bad).is_err());
    }
}
