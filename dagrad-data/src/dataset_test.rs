use super::*;

fn create_features(rows: usize, cols: usize) -> Tensor {
    Tensor::new((0..rows * cols).map(|v| v as f64).collect(), vec![rows, cols])
        .expect("Failed to create features")
}

#[test]
fn test_tensor_dataset_new_valid() -> Result<(), DagradError> {
    let dataset = TensorDataset::new(create_features(3, 2), Tensor::from_vec(vec![0.0, 1.0, 2.0]))?;
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.feature_count(), 2);
    assert!(!dataset.is_empty());
    Ok(())
}

#[test]
fn test_tensor_dataset_accepts_column_targets() -> Result<(), DagradError> {
    let targets = Tensor::new(vec![0.0, 1.0], vec![2, 1])?;
    let dataset = TensorDataset::new(create_features(2, 4), targets)?;
    assert_eq!(dataset.len(), 2);
    Ok(())
}

#[test]
fn test_tensor_dataset_row_mismatch() {
    let result = TensorDataset::new(create_features(3, 2), Tensor::from_vec(vec![0.0, 1.0]));
    match result {
        Err(DagradError::ShapeMismatch { operation, .. }) => {
            assert_eq!(operation, "TensorDataset::new");
        }
        other => panic!("Expected ShapeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_tensor_dataset_rejects_vector_features() {
    let result = TensorDataset::new(Tensor::from_vec(vec![1.0, 2.0]), Tensor::from_vec(vec![0.0, 1.0]));
    assert!(matches!(result, Err(DagradError::ShapeMismatch { .. })));
}

#[test]
fn test_tensor_dataset_get_and_batch() -> Result<(), DagradError> {
    let dataset = TensorDataset::new(create_features(3, 2), Tensor::from_vec(vec![10.0, 11.0, 12.0]))?;

    let (row, target) = dataset.get(1)?;
    assert_eq!(row.shape(), &[1, 2]);
    assert_eq!(row.data(), &[2.0, 3.0]);
    assert_eq!(target.data(), &[11.0]);

    let (x, y) = dataset.batch(&[2, 0, 2])?;
    assert_eq!(x.data(), &[4.0, 5.0, 0.0, 1.0, 4.0, 5.0]);
    assert_eq!(y.data(), &[12.0, 10.0, 12.0]);
    Ok(())
}

#[test]
fn test_tensor_dataset_get_out_of_bounds() -> Result<(), DagradError> {
    let dataset = TensorDataset::new(create_features(2, 2), Tensor::from_vec(vec![0.0, 1.0]))?;
    assert!(dataset.get(2).is_err());
    Ok(())
}
