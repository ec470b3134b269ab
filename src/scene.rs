use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::GlobeConfig;
use crate::rotation::Rotation;
use crate::sphere::{self, SphereMesh};

/// The complete renderable state of the globe: three shells, nothing else.
///
/// The scene is rebuilt from scratch whenever the debounced resize fires, so
/// everything in here must be derivable from a `GlobeConfig` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeScene {
    pub sphere: MeshNode,
    pub land: MeshNode,
    pub background: MeshNode,
}

/// One renderable shell: tessellated geometry plus its surface description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshNode {
    pub name: String,
    pub radius: f32,
    pub segments: u32,
    pub mesh: SphereMesh,
    pub surface: Surface,
    pub shading: Shading,
    pub side: Side,
    pub rotation: Rotation,
}

/// How a shell is painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Flat { color: Vec3 },
    Textured { kind: TextureKind, transparent: bool },
}

/// Which asynchronously loaded image a textured shell samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureKind {
    Land,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    Lit,
    Unlit,
}

/// Which faces of the shell are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Outside,
    /// Drawn from within, as the backdrop shell is.
    Inside,
}

impl GlobeScene {
    /// Tessellates the three shells described by the configuration.
    pub fn build(config: &GlobeConfig) -> Result<Self> {
        let sphere = MeshNode {
            name: "sphere".to_string(),
            radius: config.radius,
            segments: config.segments,
            mesh: sphere::tessellate(config.radius, config.segments)
                .context("failed to tessellate the globe sphere")?,
            surface: Surface::Flat {
                color: config.color,
            },
            shading: Shading::Lit,
            side: Side::Outside,
            rotation: Rotation::default(),
        };

        let land = MeshNode {
            name: "land".to_string(),
            radius: config.land_radius(),
            segments: config.segments,
            mesh: sphere::tessellate(config.land_radius(), config.segments)
                .context("failed to tessellate the land shell")?,
            surface: Surface::Textured {
                kind: TextureKind::Land,
                transparent: true,
            },
            shading: Shading::Lit,
            side: Side::Outside,
            rotation: Rotation::default(),
        };

        let background = MeshNode {
            name: "background".to_string(),
            radius: config.background.radius,
            segments: config.background.segments,
            mesh: sphere::tessellate(config.background.radius, config.background.segments)
                .context("failed to tessellate the backdrop shell")?,
            surface: Surface::Textured {
                kind: TextureKind::Background,
                transparent: false,
            },
            shading: Shading::Unlit,
            side: Side::Inside,
            rotation: Rotation::default(),
        };

        Ok(Self {
            sphere,
            land,
            background,
        })
    }

    /// Shells in draw order: backdrop first, then the opaque sphere, then
    /// the blended land overlay.
    pub fn draw_order(&self) -> [&MeshNode; 3] {
        [&self.background, &self.sphere, &self.land]
    }
}

impl MeshNode {
    /// Model matrix for the shell's current orientation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation.yaw) * Mat4::from_rotation_x(self.rotation.pitch)
    }

    pub fn is_transparent(&self) -> bool {
        matches!(
            self.surface,
            Surface::Textured {
                transparent: true,
                ..
            }
        )
    }

    pub fn texture_kind(&self) -> Option<TextureKind> {
        match self.surface {
            Surface::Textured { kind, .. } => Some(kind),
            Surface::Flat { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_produces_the_three_shells() {
        let scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        assert_eq!(scene.sphere.radius, 0.5);
        assert!((scene.land.radius - 0.506).abs() < 1e-6);
        assert_eq!(scene.background.radius, 90.0);
        assert_eq!(scene.background.segments, 64);
        assert!(!scene.sphere.mesh.vertices.is_empty());
    }

    #[test]
    fn shells_start_with_a_fresh_rotation() {
        let scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        for node in scene.draw_order() {
            assert_eq!(node.rotation, Rotation::default());
        }
    }

    #[test]
    fn only_the_land_shell_blends() {
        let scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        assert!(scene.land.is_transparent());
        assert!(!scene.sphere.is_transparent());
        assert!(!scene.background.is_transparent());
    }

    #[test]
    fn the_backdrop_is_seen_from_the_inside() {
        let scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        assert_eq!(scene.background.side, Side::Inside);
        assert_eq!(scene.background.shading, Shading::Unlit);
        assert_eq!(scene.background.texture_kind(), Some(TextureKind::Background));
        assert_eq!(scene.sphere.texture_kind(), None);
    }

    #[test]
    fn draw_order_puts_the_overlay_last() {
        let scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        let names: Vec<&str> = scene
            .draw_order()
            .iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names, ["background", "sphere", "land"]);
    }

    #[test]
    fn model_matrix_follows_the_rotation() {
        let mut scene = GlobeScene::build(&GlobeConfig::default()).unwrap();
        scene.land.rotation.yaw = std::f32::consts::FRAC_PI_2;
        let rotated = scene.land.model_matrix().transform_point3(Vec3::X);
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
