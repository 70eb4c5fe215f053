use crate::field::NoiseField;

/// How strongly one ridged octave gates the next.
const RIDGE_GAIN: f64 = 2.0;

impl NoiseField {
    /// Fractal Brownian motion over `simplex2`, normalized by total amplitude.
    pub fn fbm2(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        base_scale: f64,
    ) -> f64 {
        self.octave_sum(octaves, persistence, lacunarity, base_scale, |freq| {
            self.simplex2(x * freq, y * freq)
        })
    }

    /// Fractal Brownian motion over `simplex3`, normalized by total amplitude.
    #[allow(clippy::too_many_arguments)]
    pub fn fbm3(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        base_scale: f64,
    ) -> f64 {
        self.octave_sum(octaves, persistence, lacunarity, base_scale, |freq| {
            self.simplex3(x * freq, y * freq, z * freq)
        })
    }

    /// Ridged multifractal in `[0, 1]`.
    ///
    /// Each octave is folded through `1 - |n|` and squared so creases turn into
    /// sharp crests; the result weights the next octave, which keeps detail
    /// concentrated along connected ridge lines.
    pub fn ridged2(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        base_scale: f64,
    ) -> f64 {
        if octaves == 0 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        let mut frequency = base_scale;
        let mut weight = 1.0;

        for _ in 0..octaves {
            let mut signal = 1.0 - self.simplex2(x * frequency, y * frequency).abs();
            signal *= signal;
            signal *= weight;
            weight = (signal * RIDGE_GAIN).clamp(0.0, 1.0);

            total += signal * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        (total / max_amplitude).clamp(0.0, 1.0)
    }

    fn octave_sum(
        &self,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        base_scale: f64,
        sample: impl Fn(f64) -> f64,
    ) -> f64 {
        if octaves == 0 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        let mut frequency = base_scale;

        for _ in 0..octaves {
            total += sample(frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::NoiseField;

    #[test]
    fn fbm_is_normalized() {
        let noise = NoiseField::new(42);
        for i in 0..400 {
            let x = (i % 20) as f64 * 13.7;
            let z = (i / 20) as f64 * 9.1;
            let v2 = noise.fbm2(x, z, 6, 0.5, 2.0, 0.01);
            let v3 = noise.fbm3(x, 3.0, z, 4, 0.6, 2.1, 0.02);
            assert!((-1.0..=1.0).contains(&v2));
            assert!((-1.0..=1.0).contains(&v3));
        }
    }

    #[test]
    fn single_octave_fbm_equals_simplex() {
        let noise = NoiseField::new(8);
        let a = noise.fbm2(12.0, 7.5, 1, 0.5, 2.0, 0.1);
        let b = noise.simplex2(1.2, 0.75);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn zero_octaves_is_flat() {
        let noise = NoiseField::new(8);
        assert_eq!(noise.fbm2(1.0, 2.0, 0, 0.5, 2.0, 1.0), 0.0);
        assert_eq!(noise.ridged2(1.0, 2.0, 0, 0.5, 2.0, 1.0), 0.0);
    }

    #[test]
    fn ridged_is_unit_range() {
        let noise = NoiseField::new(77);
        for i in 0..400 {
            let x = (i % 20) as f64 * 31.3;
            let z = (i / 20) as f64 * 17.9;
            let v = noise.ridged2(x, z, 5, 0.5, 2.0, 0.004);
            assert!((0.0..=1.0).contains(&v), "ridged out of range: {v}");
        }
    }
}
