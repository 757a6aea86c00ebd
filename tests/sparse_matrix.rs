//! Properties of the triplet and compressed sparse formats:
//! 1. Compression round-trips the combined triplet content
//! 2. Matrix-vector multiply is linear
//! 3. `+=` sums both operands position by position

use ferrite_ftwt::{CompressedMatrix, Triplet, TripletMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Integer-valued entries so summation order cannot change results.
fn random_triplets(rng: &mut StdRng, rows: usize, cols: usize, count: usize) -> TripletMatrix<f64> {
    let entries = (0..count).map(|_| {
        Triplet::new(
            rng.gen_range(0..rows),
            rng.gen_range(0..cols),
            rng.gen_range(-20..=20) as f64,
        )
    });
    TripletMatrix::from_entries(rows, cols, "random", entries)
}

#[test]
fn compression_round_trip_preserves_combined_entries() {
    let mut rng = StdRng::seed_from_u64(11);
    for trial in 0..25 {
        let rows = rng.gen_range(1..12);
        let cols = rng.gen_range(1..12);
        let count = rng.gen_range(0..60);
        let original = random_triplets(&mut rng, rows, cols, count);

        let mut direct = original.clone();
        direct.sort_and_combine();

        let mut round_trip = original.clone().to_compressed().to_triplet();
        round_trip.sort_and_combine();

        assert_eq!(round_trip.entries(), direct.entries(), "trial {}", trial);
    }
}

#[test]
fn compressed_layout_invariants_hold() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..25 {
        let rows = rng.gen_range(1..10);
        let mut mat = random_triplets(&mut rng, rows, 7, 30);
        let csr = mat.to_compressed();

        let offsets = csr.row_offsets();
        assert_eq!(offsets.len(), rows + 1);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[rows], csr.nnz());
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        for r in 0..rows {
            let cols = &csr.col_indices()[csr.row_range(r)];
            assert!(cols.windows(2).all(|w| w[0] < w[1]), "row {} columns not strictly ascending", r);
        }
    }
}

#[test]
fn multiply_is_linear() {
    let mut rng = StdRng::seed_from_u64(13);
    let csr = random_triplets(&mut rng, 9, 6, 40).to_compressed();

    let a: Vec<f64> = (0..6).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let b: Vec<f64> = (0..6).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let sum: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x + y).collect();

    let lhs = csr.multiply(&sum);
    let rhs: Vec<f64> = csr.multiply(&a).iter().zip(csr.multiply(&b)).map(|(x, y)| x + y).collect();
    for (l, r) in lhs.iter().zip(&rhs) {
        assert!((l - r).abs() < 1e-9, "{} vs {}", l, r);
    }
}

#[test]
fn add_assign_sums_every_position() {
    let mut rng = StdRng::seed_from_u64(14);
    for _ in 0..10 {
        let a = random_triplets(&mut rng, 6, 5, 15).to_compressed();
        let b = random_triplets(&mut rng, 6, 5, 15).to_compressed();

        let mut sum = a.clone();
        sum += &b;

        for r in 0..6 {
            for c in 0..5 {
                let expected = a.get(r, c).unwrap_or(0.0) + b.get(r, c).unwrap_or(0.0);
                let stored = sum.get(r, c);
                if a.get(r, c).is_some() || b.get(r, c).is_some() {
                    assert_eq!(stored, Some(expected), "position ({}, {})", r, c);
                } else {
                    assert_eq!(stored, None);
                }
            }
        }
    }
}

#[test]
fn works_with_single_precision_values() {
    let mut mat: TripletMatrix<f32> = TripletMatrix::new(2, 2, "f32");
    mat.insert(Triplet::new(0, 1, 0.5));
    mat.insert(Triplet::new(0, 1, 0.25));
    let csr: CompressedMatrix<f32> = mat.to_compressed();
    assert_eq!(csr.multiply(&[0.0, 4.0]), vec![3.0, 0.0]);
}
