use super::*;

fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[test]
fn test_matmul_2x3_3x2() -> Result<(), DagradError> {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_tensor(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], vec![3, 2]);
    let c = matmul_op(&a, &b)?;
    assert_eq!(c.shape(), &[2, 2]);
    assert_eq!(c.data(), &[58.0, 64.0, 139.0, 154.0]);
    Ok(())
}

#[test]
fn test_matmul_inner_dim_mismatch() {
    let a = create_test_tensor(vec![1.0; 6], vec![2, 3]);
    let b = create_test_tensor(vec![1.0; 4], vec![2, 2]);
    let result = matmul_op(&a, &b);
    assert!(matches!(result, Err(DagradError::ShapeMismatch { .. })));
}

#[test]
fn test_matmul_requires_matrices() {
    let a = Tensor::from_vec(vec![1.0, 2.0]);
    let b = create_test_tensor(vec![1.0; 4], vec![2, 2]);
    assert!(matches!(matmul_op(&a, &b), Err(DagradError::ShapeMismatch { .. })));
}

#[test]
fn test_matmul_propagates_nan() -> Result<(), DagradError> {
    let a = create_test_tensor(vec![0.0, 1.0], vec![1, 2]);
    let b = create_test_tensor(vec![f64::NAN, 2.0], vec![2, 1]);
    let c = matmul_op(&a, &b)?;
    assert!(!c.is_finite());
    Ok(())
}

#[test]
fn test_transpose() -> Result<(), DagradError> {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let t = transpose_op(&a)?;
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(transpose_op(&t)?, a);
    Ok(())
}
