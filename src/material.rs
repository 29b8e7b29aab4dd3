//! Phong material definitions and the tag-addressed material registry.

use glam::Vec3;

/// Phong surface properties, immutable once registered.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub ambient_color: Vec3,
    pub ambient_strength: f32,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
}

impl Material {
    /// Creates a material with white diffuse/specular, no ambient and
    /// shininess 32.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ambient_color: Vec3::ZERO,
            ambient_strength: 0.0,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            shininess: 32.0,
        }
    }

    /// Ambient color and the strength it is scaled by.
    pub fn ambient(mut self, color: impl Into<Vec3>, strength: f32) -> Self {
        self.ambient_color = color.into();
        self.ambient_strength = strength;
        self
    }

    /// Base color when the draw is not textured.
    pub fn diffuse(mut self, color: impl Into<Vec3>) -> Self {
        self.diffuse_color = color.into();
        self
    }

    /// Tint of the specular highlight.
    pub fn specular(mut self, color: impl Into<Vec3>) -> Self {
        self.specular_color = color.into();
        self
    }

    /// Specular exponent. Higher values give tighter highlights.
    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }
}

/// Ordered list of materials, looked up by exact tag.
///
/// Lookups return the first match, so a later material with an already used
/// tag can never be reached. Registering one is allowed but logged.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    /// Registry with no materials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `material`. A duplicate tag is kept but never found.
    pub fn register(&mut self, material: Material) {
        if self.lookup(&material.tag).is_some() {
            log::warn!(
                "material '{}' is already registered, the new definition is unreachable",
                material.tag
            );
        }
        self.materials.push(material);
    }

    /// First material registered under `tag`.
    pub fn lookup(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_stored_values() {
        let wood = Material::new("woodMaterial")
            .ambient([0.15, 0.08, 0.03], 0.25)
            .diffuse([0.5, 0.3, 0.1])
            .specular(Vec3::splat(0.5))
            .shininess(48.0);

        let mut registry = MaterialRegistry::new();
        registry.register(wood.clone());
        registry.register(Material::new("whiteMaterial"));

        assert_eq!(registry.lookup("woodMaterial"), Some(&wood));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn missing_tag_is_none() {
        let registry = MaterialRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("glass").is_none());
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = MaterialRegistry::new();
        registry.register(Material::new("m").shininess(8.0));
        registry.register(Material::new("m").shininess(64.0));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("m").map(|m| m.shininess), Some(8.0));
    }
}
