use crate::algebra::Fp;

/// Real roots of `ax^2 + bx + c = 0`, smaller root first.
pub fn solve_quadratic(a: Fp, b: Fp, c: Fp) -> Option<(Fp, Fp)> {
    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return None;
    }
    let (x1, x2) = if discr == 0.0 {
        let x = -0.5 * b / a;
        (x, x)
    } else {
        // stable form, avoids cancellation when b^2 >> 4ac
        let q = if b > 0.0 {
            -0.5 * (b + discr.sqrt())
        } else {
            -0.5 * (b - discr.sqrt())
        };
        (q / a, c / q)
    };
    Some((Fp::min(x1, x2), Fp::max(x1, x2)))
}

pub fn saturate(x: Fp) -> Fp {
    x.clamp(0.0, 1.0)
}
