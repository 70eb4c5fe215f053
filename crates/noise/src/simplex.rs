use crate::field::NoiseField;

/// Skew/unskew factors: (sqrt(3) - 1) / 2 and (3 - sqrt(3)) / 6.
const F2: f64 = 0.366_025_403_784_438_6;
const G2: f64 = 0.211_324_865_405_187_1;
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

/// Gradients toward the edge midpoints of a cube.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

#[inline]
fn lattice(v: f64) -> (i64, usize) {
    let i = v.floor() as i64;
    (i, (i & 255) as usize)
}

#[inline]
fn corner2(g: usize, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let grad = GRAD3[g];
        t2 * t2 * (grad[0] * x + grad[1] * y)
    }
}

#[inline]
fn corner3(g: usize, x: f64, y: f64, z: f64) -> f64 {
    let t = 0.6 - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let grad = GRAD3[g];
        t2 * t2 * (grad[0] * x + grad[1] * y + grad[2] * z)
    }
}

impl NoiseField {
    /// 2D simplex noise in `[-1, 1]`.
    pub fn simplex2(&self, x: f64, y: f64) -> f64 {
        let p = &self.perm;

        let s = (x + y) * F2;
        let (i, ii) = lattice(x + s);
        let (j, jj) = lattice(y + s);
        let t = (i + j) as f64 * G2;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let gi0 = p.get(ii + p.get(jj)) % 12;
        let gi1 = p.get(ii + i1 + p.get(jj + j1)) % 12;
        let gi2 = p.get(ii + 1 + p.get(jj + 1)) % 12;

        let n = corner2(gi0, x0, y0) + corner2(gi1, x1, y1) + corner2(gi2, x2, y2);
        (70.0 * n).clamp(-1.0, 1.0)
    }

    /// 3D simplex noise in `[-1, 1]`.
    pub fn simplex3(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.perm;

        let s = (x + y + z) * F3;
        let (i, ii) = lattice(x + s);
        let (j, jj) = lattice(y + s);
        let (k, kk) = lattice(z + s);
        let t = (i + j + k) as f64 * G3;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);
        let z0 = z - (k as f64 - t);

        // Which simplex of the skewed cube we are in.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let gi0 = p.get(ii + p.get(jj + p.get(kk))) % 12;
        let gi1 = p.get(ii + i1 + p.get(jj + j1 + p.get(kk + k1))) % 12;
        let gi2 = p.get(ii + i2 + p.get(jj + j2 + p.get(kk + k2))) % 12;
        let gi3 = p.get(ii + 1 + p.get(jj + 1 + p.get(kk + 1))) % 12;

        let n = corner3(gi0, x0, y0, z0)
            + corner3(gi1, x1, y1, z1)
            + corner3(gi2, x2, y2, z2)
            + corner3(gi3, x3, y3, z3);
        (32.0 * n).clamp(-1.0, 1.0)
    }
}
