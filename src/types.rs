use glam::Vec3;

/// Line vertex for GPU upload (laser beams)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub _pad1: f32,
    pub color: [f32; 3],
    pub _pad2: f32,
}

impl LineVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            _pad1: 0.0,
            color,
            _pad2: 0.0,
        }
    }

    /// Straight segment from the local origin along -Z
    pub fn forward_segment(length: f32, color: [f32; 3]) -> [LineVertex; 2] {
        [
            Self::new(Vec3::ZERO.to_array(), color),
            Self::new((Vec3::NEG_Z * length).to_array(), color),
        ]
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 32);
    }

    #[test]
    fn forward_segment_casts_to_bytes() {
        let segment = LineVertex::forward_segment(10.0, [0.0, 1.0, 0.0]);
        let bytes: &[u8] = bytemuck::cast_slice(&segment);
        assert_eq!(bytes.len(), 64);
        assert_eq!(segment[1].position(), Vec3::new(0.0, 0.0, -10.0));
    }
}
