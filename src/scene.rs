use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::FrameError;
use crate::lights::{Light, LightSet, PhongMaterial};
use crate::projection::CameraProjection;

/// Scene file contents: one camera, a list of lights and the shared material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub lights: Vec<Light>,
    pub material: PhongMaterial,
}

/// Camera placement as written in the scene file. `fov` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fov: 35.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl SceneDescription {
    /// Parses a `<scene>` document. Missing elements keep their defaults.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid scene XML")?;
        let root = document.root_element();
        if !root.has_tag_name("scene") {
            return Err(anyhow!(
                "expected <scene> root element, found <{}>",
                root.tag_name().name()
            ));
        }

        let mut scene = Self::default();
        if let Some(node) = child(&root, "camera") {
            scene.camera = parse_camera(&node).context("invalid <camera>")?;
        }
        for (index, node) in root
            .children()
            .filter(|n| n.has_tag_name("light"))
            .enumerate()
        {
            let light = parse_light(&node).with_context(|| format!("invalid <light> #{index}"))?;
            scene.lights.push(light);
        }
        if let Some(node) = child(&root, "material") {
            scene.material = parse_material(&node).context("invalid <material>")?;
        }
        Ok(scene)
    }

    /// Builds a validated camera for a `width` x `height` viewport.
    pub fn camera(&self, width: f32, height: f32) -> Result<Camera> {
        let desc = &self.camera;
        let projection =
            CameraProjection::new(desc.fov.to_radians(), width, height, desc.near, desc.far)?;
        let camera = Camera::new(desc.eye, desc.center, desc.up, projection)?;
        Ok(camera)
    }

    pub fn lights(&self) -> Result<LightSet, FrameError> {
        LightSet::from_slice(&self.lights)
    }
}

fn parse_camera(node: &Node<'_, '_>) -> Result<CameraDescription> {
    let defaults = CameraDescription::default();
    Ok(CameraDescription {
        eye: parse_vec3(optional_text(node, "eye"), defaults.eye)?,
        center: parse_vec3(optional_text(node, "center"), defaults.center)?,
        up: parse_vec3(optional_text(node, "up"), defaults.up)?,
        fov: parse_f32(optional_text(node, "fov"), defaults.fov)?,
        near: parse_f32(optional_text(node, "near"), defaults.near)?,
        far: parse_f32(optional_text(node, "far"), defaults.far)?,
    })
}

fn parse_light(node: &Node<'_, '_>) -> Result<Light> {
    let position = parse_vec3(Some(required_text(node, "position")?), Vec3::ZERO)?;
    let color = parse_color(optional_text(node, "color"), Vec3::ONE)?;
    Ok(Light { position, color })
}

fn parse_material(node: &Node<'_, '_>) -> Result<PhongMaterial> {
    let defaults = PhongMaterial::default();
    Ok(PhongMaterial {
        ambient: parse_f32(optional_text(node, "ambient"), defaults.ambient)?,
        diffuse: parse_f32(optional_text(node, "diffuse"), defaults.diffuse)?,
        specular: parse_f32(optional_text(node, "specular"), defaults.specular)?,
        shininess: parse_f32(optional_text(node, "shininess"), defaults.shininess)?,
    })
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_components(value: &str, what: &str) -> Result<Vec3> {
    let numbers = value
        .split_whitespace()
        .map(|component| {
            component
                .parse::<f32>()
                .map_err(|err| anyhow!("{what} component {component:?}: {err}"))
        })
        .collect::<Result<Vec<_>>>()?;
    match numbers.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        other => Err(anyhow!(
            "{what} needs 3 components, found {}",
            other.len()
        )),
    }
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    match value {
        Some(value) => parse_components(&value, "vector"),
        None => Ok(default),
    }
}

/// Colors are written as 0-255 channel values.
fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    match value {
        Some(value) => Ok(parse_components(&value, "color")? / 255.0),
        None => Ok(default),
    }
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float {value:?}: {err}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lights::MAX_LIGHTS;

    const SAMPLE: &str = r#"
    <scene>
        <camera>
            <eye>0 2 6</eye>
            <center>0 0 0</center>
            <up>0 1 0</up>
            <fov>60</fov>
            <near>0.5</near>
            <far>50</far>
        </camera>
        <light>
            <position>0 5 0</position>
            <color>255 128 0</color>
        </light>
        <light>
            <position>-3 1 2</position>
        </light>
        <material>
            <diffuse>0.7</diffuse>
        </material>
    </scene>
    "#;

    #[test]
    fn parse_scene_populates_camera_lights_and_material() {
        let scene = SceneDescription::from_xml(SAMPLE).unwrap();
        assert_eq!(scene.camera.eye, Vec3::new(0.0, 2.0, 6.0));
        assert_eq!(scene.camera.fov, 60.0);
        assert_eq!(scene.camera.near, 0.5);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.lights[0].position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(scene.lights[0].color, Vec3::new(1.0, 128.0 / 255.0, 0.0));
        assert_eq!(scene.lights[1].color, Vec3::ONE);
        assert_eq!(scene.material.diffuse, 0.7);
        assert_eq!(scene.material.shininess, 16.0);
    }

    #[test]
    fn empty_scene_uses_defaults() {
        let scene = SceneDescription::from_xml("<scene/>").unwrap();
        assert_eq!(scene, SceneDescription::default());
        assert!(scene.lights().unwrap().is_empty());
    }

    #[test]
    fn camera_is_built_in_radians() {
        let scene = SceneDescription::from_xml(SAMPLE).unwrap();
        let camera = scene.camera(640.0, 480.0).unwrap();
        assert!((camera.projection().fovy() - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.projection().width(), 640.0);
        camera.view().validate().unwrap();
    }

    #[test]
    fn degenerate_camera_is_an_error() {
        let xml = "<scene><camera><eye>0 0 0</eye><center>0 0 0</center></camera></scene>";
        let scene = SceneDescription::from_xml(xml).unwrap();
        assert!(scene.camera(100.0, 100.0).is_err());
    }

    #[test]
    fn malformed_vector_is_an_error() {
        let xml = "<scene><camera><eye>1 two 3</eye></camera></scene>";
        assert!(SceneDescription::from_xml(xml).is_err());
        let short = "<scene><light><position>1 2</position></light></scene>";
        assert!(SceneDescription::from_xml(short).is_err());
    }

    #[test]
    fn light_without_position_is_an_error() {
        let xml = "<scene><light><color>1 1 1</color></light></scene>";
        assert!(SceneDescription::from_xml(xml).is_err());
    }

    #[test]
    fn wrong_root_is_an_error() {
        assert!(SceneDescription::from_xml("<world/>").is_err());
    }

    #[test]
    fn too_many_lights_fail_when_packed() {
        let light = "<light><position>0 0 0</position></light>";
        let xml = format!("<scene>{}</scene>", light.repeat(MAX_LIGHTS + 1));
        let scene = SceneDescription::from_xml(&xml).unwrap();
        assert!(matches!(
            scene.lights(),
            Err(FrameError::TooManyLights { .. })
        ));
    }
}
