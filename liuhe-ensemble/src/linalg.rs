use anyhow::{anyhow, bail, Result};
use faer::{Mat, Side};
use faer::prelude::Solve;
use ndarray::{Array1, Array2, Axis};

/// Convert ndarray Array2 to faer Mat (column-major).
fn ndarray_to_faer(arr: &Array2<f64>) -> Mat<f64> {
    let (rows, cols) = (arr.nrows(), arr.ncols());
    Mat::from_fn(rows, cols, |i, j| arr[[i, j]])
}

/// Convert faer Mat back to ndarray Array2.
fn faer_to_ndarray(mat: &Mat<f64>) -> Array2<f64> {
    let (rows, cols) = (mat.nrows(), mat.ncols());
    Array2::from_shape_fn((rows, cols), |(i, j)| mat[(i, j)])
}

/// Solve a symmetric positive-definite system via Cholesky factorization.
/// Returns X such that A * X = B.
fn cholesky_solve(a: &Mat<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let b_faer = ndarray_to_faer(b);
    let llt = a
        .llt(Side::Lower)
        .map_err(|e| anyhow!("Cholesky: matrix not positive-definite ({e:?})"))?;
    let x_faer = llt.solve(&b_faer);
    Ok(faer_to_ndarray(&x_faer))
}

/// Moindres carrés ordinaires par équations normales : (XᵀX) β = Xᵀy.
///
/// - x: [n_obs, n_params] (matrice de design)
/// - y: [n_obs]
/// - Retourne β: [n_params]
///
/// Échoue si le système est singulier (colonnes colinéaires, trop peu d'observations)
/// ou si la solution n'est pas finie.
pub fn least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
    if x.nrows() != y.len() {
        bail!("Dimensions incompatibles : {} lignes pour {} cibles", x.nrows(), y.len());
    }
    if x.nrows() < x.ncols() {
        bail!("Système sous-déterminé : {} observations pour {} paramètres", x.nrows(), x.ncols());
    }

    let gram = ndarray_to_faer(&x.t().dot(x));
    if is_degenerate(&gram) {
        bail!("Système singulier : colonnes colinéaires");
    }
    let rhs = x.t().dot(y).insert_axis(Axis(1));

    let beta = cholesky_solve(&gram, &rhs)?.column(0).to_owned();
    if beta.iter().any(|v| !v.is_finite()) {
        bail!("Solution non finie");
    }
    Ok(beta)
}

/// Matrice de Gram mal conditionnée : plus petite valeur propre sous
/// `CONDITION_TOLERANCE × plus grande`.
fn is_degenerate(gram: &Mat<f64>) -> bool {
    const CONDITION_TOLERANCE: f64 = 1e-10;

    // Valeurs propres triées par ordre croissant
    let eigenvalues = match gram.self_adjoint_eigenvalues(Side::Lower) {
        Ok(values) => values,
        Err(e) => {
            log::debug!("Décomposition spectrale impossible ({e:?})");
            return true;
        }
    };
    match (eigenvalues.first(), eigenvalues.last()) {
        (Some(&min), Some(&max)) => max <= 0.0 || min <= CONDITION_TOLERANCE * max,
        _ => true,
    }
}
