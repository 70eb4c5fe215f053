use cityforge_noise::NoiseField;

/// Ground height source for mesh builders.
pub trait HeightSampler: Send + Sync {
    fn height_at(&self, x: f64, z: f64) -> f64;
}

impl HeightSampler for NoiseField {
    fn height_at(&self, x: f64, z: f64) -> f64 {
        self.terrain_height(x, z)
    }
}

/// Level ground at a fixed height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround(pub f64);

impl HeightSampler for FlatGround {
    fn height_at(&self, _x: f64, _z: f64) -> f64 {
        self.0
    }
}

impl<H: HeightSampler + ?Sized> HeightSampler for &H {
    fn height_at(&self, x: f64, z: f64) -> f64 {
        (**self).height_at(x, z)
    }
}

impl<H: HeightSampler + ?Sized> HeightSampler for std::sync::Arc<H> {
    fn height_at(&self, x: f64, z: f64) -> f64 {
        (**self).height_at(x, z)
    }
}
