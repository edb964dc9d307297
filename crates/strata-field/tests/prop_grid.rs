use proptest::prelude::*;
use strata_field::{FieldGrid, GridDims};

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

proptest! {
    // idx maps each (x,y,z) within bounds to unique in-range indices
    #[test]
    fn idx_is_unique_and_in_range(w in dim(), h in dim(), d in dim()) {
        let g = FieldGrid::new(GridDims::volume(w, h, d)).unwrap();
        let expect = w * h * d;
        let mut seen = vec![false; expect];
        for z in 0..d { for y in 0..h { for x in 0..w {
            let i = g.idx(x, y, z);
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // get reads from linearized storage at idx, and from_fn fills in the same order
    #[test]
    fn from_fn_matches_linear_storage(w in dim(), h in dim(), d in dim()) {
        let g = FieldGrid::from_fn(GridDims::volume(w, h, d), |x, y, z| (x * 100 + y * 10 + z) as f32).unwrap();
        for z in 0..d { for y in 0..h { for x in 0..w {
            prop_assert_eq!(g.get(x, y, z), g.samples()[g.idx(x, y, z)]);
            prop_assert_eq!(g.get(x, y, z), (x * 100 + y * 10 + z) as f32);
        }}}
    }

    // try_get agrees with contains for in- and out-of-range probes
    #[test]
    fn try_get_agrees_with_contains(w in dim(), h in dim(), x in 0usize..10, y in 0usize..10) {
        let g = FieldGrid::new(GridDims::planar(w, h)).unwrap();
        let inside = x < w && y < h;
        prop_assert_eq!(g.contains(x, y, 0), inside);
        prop_assert_eq!(g.try_get(x, y, 0).is_ok(), inside);
    }

    // Resampling preserves the four corner samples and the world extent of a planar grid
    #[test]
    fn resample_preserves_corners(bx in 1usize..3, by in 1usize..3, a in 1usize..3, b in 1usize..4,
                                  vals in proptest::collection::vec(-10.0f32..10.0, 36)) {
        let (w, h) = (bx * a + 1, by * a + 1);
        let (tw, th) = (bx * b + 1, by * b + 1);
        let g = FieldGrid::from_fn(GridDims::planar(w, h), |x, y, _| vals[y * 6 + x]).unwrap();
        let r = g.resample(GridDims::planar(tw, th)).unwrap();
        let (ge, re) = (g.extent(), r.extent());
        prop_assert!((ge.x - re.x).abs() <= 1e-4 && (ge.z - re.z).abs() <= 1e-4);
        let close = |a: f32, b: f32| (a - b).abs() <= 1e-4;
        prop_assert!(close(r.get2(0, 0), g.get2(0, 0)));
        prop_assert!(close(r.get2(tw - 1, 0), g.get2(w - 1, 0)));
        prop_assert!(close(r.get2(0, th - 1), g.get2(0, h - 1)));
        prop_assert!(close(r.get2(tw - 1, th - 1), g.get2(w - 1, h - 1)));
        let (lo, hi) = g.min_max();
        for &v in r.samples() {
            prop_assert!(v >= lo - 1e-4 && v <= hi + 1e-4);
        }
    }
}
