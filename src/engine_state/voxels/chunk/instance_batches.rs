//! Per-material instance transforms.
//!
//! Every visible block contributes one translation matrix to the list of its
//! material, so a chunk is drawn with one instanced call per material instead
//! of one call per block.

use std::collections::BTreeMap;

use cgmath::{Matrix4, Vector3};

use crate::engine_state::voxels::block::Material;

/// GPU-ready model matrix of one block instance.
///
/// Column-major, matching `cgmath::Matrix4`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    // cgmath types are not Pod, so the matrix is stored as plain arrays
    model: [[f32; 4]; 4],
}

impl InstanceTransform {
    /// A pure translation to `position`.
    pub fn from_translation(position: Vector3<f32>) -> Self {
        InstanceTransform {
            model: Matrix4::from_translation(position).into(),
        }
    }

    /// The translation part of the matrix.
    pub fn translation(&self) -> Vector3<f32> {
        let column = self.model[3];
        Vector3::new(column[0], column[1], column[2])
    }

    /// The full model matrix.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.model)
    }
}

/// Ordered mapping from material to instance transforms.
#[derive(Debug, Default, Clone)]
pub struct InstanceBatches {
    batches: BTreeMap<Material, Vec<InstanceTransform>>,
}

impl InstanceBatches {
    /// Appends one instance to `material`'s list.
    pub fn push(&mut self, material: Material, transform: InstanceTransform) {
        self.batches.entry(material).or_default().push(transform);
    }

    /// Transforms of `material`, empty if none.
    pub fn get(&self, material: Material) -> &[InstanceTransform] {
        self.batches.get(&material).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty batches in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (Material, &[InstanceTransform])> {
        self.batches
            .iter()
            .filter(|(_, transforms)| !transforms.is_empty())
            .map(|(material, transforms)| (*material, transforms.as_slice()))
    }

    /// Number of instanced draws needed for these batches.
    pub fn draw_count(&self) -> usize {
        self.iter().count()
    }

    /// Total number of instances over all materials.
    pub fn total(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.batches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_round_trips_through_matrix() {
        let transform = InstanceTransform::from_translation(Vector3::new(-3.0, 7.0, 12.5));
        assert_eq!(transform.translation(), Vector3::new(-3.0, 7.0, 12.5));
        assert_eq!(
            transform.matrix(),
            Matrix4::from_translation(Vector3::new(-3.0, 7.0, 12.5))
        );
    }

    #[test]
    fn transforms_cast_to_bytes_for_upload() {
        let transforms = [
            InstanceTransform::from_translation(Vector3::new(1.0, 2.0, 3.0)),
            InstanceTransform::from_translation(Vector3::new(4.0, 5.0, 6.0)),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&transforms);
        assert_eq!(bytes.len(), 2 * 16 * std::mem::size_of::<f32>());
    }

    #[test]
    fn batches_group_by_material_in_draw_order() {
        let mut batches = InstanceBatches::default();
        let t = InstanceTransform::from_translation(Vector3::new(0.0, 0.0, 0.0));
        batches.push(Material::Snow, t);
        batches.push(Material::Dirt, t);
        batches.push(Material::Snow, t);

        let order: Vec<_> = batches.iter().map(|(m, list)| (m, list.len())).collect();
        assert_eq!(order, vec![(Material::Dirt, 1), (Material::Snow, 2)]);
        assert_eq!(batches.draw_count(), 2);
        assert_eq!(batches.total(), 3);
        assert!(batches.get(Material::Rock).is_empty());
    }
}
