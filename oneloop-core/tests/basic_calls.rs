use num_complex::Complex64;
use oneloop_core::{
    four_point_complex, one_point_complex, three_point_complex, two_point_complex,
};

fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

#[test]
fn one_point_with_complex_mass() {
    let r = one_point_complex(Complex64::new(100.0, -1.4)).unwrap();
    println!("1-point: {r}");
    assert_eq!(r.epsilon_minus_2(), c(0.0));
    assert!((r.epsilon_minus_1() - Complex64::new(100.0, -1.4)).norm() < 1e-12);
}

#[test]
fn two_point_with_equal_masses() {
    let r = two_point_complex(c(1.0), c(0.5), c(0.5)).unwrap();
    println!("2-point: {r}");
    assert!((r.epsilon_minus_1() - c(1.0)).norm() < 1e-14);
    assert!(r.epsilon_0().re.is_finite());
}

#[test]
fn three_point_with_small_equal_masses() {
    let m_sq = c(0.0004);
    let r = three_point_complex(c(0.01), c(0.01), c(0.001), m_sq, m_sq, m_sq).unwrap();
    println!("3-point: {r}");
    // Internally massive: no poles survive.
    assert!(r.epsilon_minus_1().norm() < 1e-8);
    assert!(r.epsilon_minus_2().norm() < 1e-10);
}

#[test]
fn four_point_massless_internal_lines() {
    let zero = c(0.0);
    let s = c(0.1);
    let r = four_point_complex(s, s, s, s, s, s, zero, zero, zero, zero).unwrap();
    println!("4-point: {r}");
    assert!(r.epsilon_0().re.is_finite() && r.epsilon_0().im.is_finite());
}
