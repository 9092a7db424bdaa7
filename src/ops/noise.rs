//! 3D simplex noise (Ashima Arts / Stefan Gustavson formulation), evaluated on the CPU in `f32`
//! so results match the shader version closely.

type V3 = [f32; 3];
type V4 = [f32; 4];

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289((x * 34.0 + 1.0) * x)
}

fn permute4(v: V4) -> V4 {
    v.map(permute)
}

fn taylor_inv_sqrt(r: f32) -> f32 {
    1.792_842_9 - 0.853_734_73 * r
}

fn offset4(a: V4, k: f32, b: V4) -> V4 {
    [a[0] + k + b[0], a[1] + k + b[1], a[2] + k + b[2], a[3] + k + b[3]]
}

fn dot3(a: V3, b: V3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// Simplex noise at `v`, roughly in `[-1, 1]`.
pub(crate) fn simplex3(v: V3) -> f32 {
    const CX: f32 = 1.0 / 6.0;
    const CY: f32 = 1.0 / 3.0;

    // First corner.
    let s = (v[0] + v[1] + v[2]) * CY;
    let i = v.map(|c| (c + s).floor());
    let t = (i[0] + i[1] + i[2]) * CX;
    let x0 = [v[0] - i[0] + t, v[1] - i[1] + t, v[2] - i[2] + t];

    // Other corners.
    let g = [
        step(x0[1], x0[0]),
        step(x0[2], x0[1]),
        step(x0[0], x0[2]),
    ];
    let l = g.map(|c| 1.0 - c);
    let i1 = [g[0].min(l[2]), g[1].min(l[0]), g[2].min(l[1])];
    let i2 = [g[0].max(l[2]), g[1].max(l[0]), g[2].max(l[1])];
    let x1 = [
        x0[0] - i1[0] + CX,
        x0[1] - i1[1] + CX,
        x0[2] - i1[2] + CX,
    ];
    let x2 = [
        x0[0] - i2[0] + CY,
        x0[1] - i2[1] + CY,
        x0[2] - i2[2] + CY,
    ];
    let x3 = x0.map(|c| c - 0.5);

    // Permutations.
    let i = i.map(mod289);
    let corner = |axis: usize| [0.0, i1[axis], i2[axis], 1.0];
    let p = permute4(offset4([0.0; 4], i[2], corner(2)));
    let p = permute4(offset4(p, i[1], corner(1)));
    let p = permute4(offset4(p, i[0], corner(0)));

    // Gradients: 7x7 points over a square, mapped onto an octahedron.
    const N: f32 = 1.0 / 7.0;
    let ns = [N * 2.0, N * 0.5 - 1.0, N];
    let j = p.map(|c| c - 49.0 * (c * ns[2] * ns[2]).floor());
    let gx_ = j.map(|c| (c * ns[2]).floor());
    let gy_ = [
        (j[0] - 7.0 * gx_[0]).floor(),
        (j[1] - 7.0 * gx_[1]).floor(),
        (j[2] - 7.0 * gx_[2]).floor(),
        (j[3] - 7.0 * gx_[3]).floor(),
    ];
    let gx = gx_.map(|c| c * ns[0] + ns[1]);
    let gy = gy_.map(|c| c * ns[0] + ns[1]);
    let h = [
        1.0 - gx[0].abs() - gy[0].abs(),
        1.0 - gx[1].abs() - gy[1].abs(),
        1.0 - gx[2].abs() - gy[2].abs(),
        1.0 - gx[3].abs() - gy[3].abs(),
    ];

    let b0 = [gx[0], gx[1], gy[0], gy[1]];
    let b1 = [gx[2], gx[3], gy[2], gy[3]];
    let s0 = b0.map(|c| c.floor() * 2.0 + 1.0);
    let s1 = b1.map(|c| c.floor() * 2.0 + 1.0);
    let sh = h.map(|c| -step(c, 0.0));

    // a0 = b0.xzyw + s0.xzyw * sh.xxyy, a1 = b1.xzyw + s1.xzyw * sh.zzww
    let a0 = [
        b0[0] + s0[0] * sh[0],
        b0[2] + s0[2] * sh[0],
        b0[1] + s0[1] * sh[1],
        b0[3] + s0[3] * sh[1],
    ];
    let a1 = [
        b1[0] + s1[0] * sh[2],
        b1[2] + s1[2] * sh[2],
        b1[1] + s1[1] * sh[3],
        b1[3] + s1[3] * sh[3],
    ];

    let mut g0 = [a0[0], a0[1], h[0]];
    let mut g1 = [a0[2], a0[3], h[1]];
    let mut g2 = [a1[0], a1[1], h[2]];
    let mut g3 = [a1[2], a1[3], h[3]];

    // Normalise gradients.
    for g in [&mut g0, &mut g1, &mut g2, &mut g3] {
        let norm = taylor_inv_sqrt(dot3(*g, *g));
        *g = g.map(|c| c * norm);
    }

    // Mix final noise value.
    let m = [
        (0.6 - dot3(x0, x0)).max(0.0),
        (0.6 - dot3(x1, x1)).max(0.0),
        (0.6 - dot3(x2, x2)).max(0.0),
        (0.6 - dot3(x3, x3)).max(0.0),
    ];
    let m = m.map(|c| c * c);
    let contrib = [dot3(g0, x0), dot3(g1, x1), dot3(g2, x2), dot3(g3, x3)];
    42.0 * (0..4).map(|k| m[k] * m[k] * contrib[k]).sum::<f32>()
}
