// src/data_input/tensor_loader.rs

use std::fs::File;
use std::path::Path;

use ndarray::{ArrayD, Axis, IxDyn, OwnedRepr, Zip};
use ndarray_npy::{NpzReader, ReadNpzError, ReadableElement};

use crate::constants::{
    AXIS_EVAL, AXIS_FIELD, AXIS_MODEL, AXIS_SEQUENCE, AXIS_TIME, GROUND_TRUTH_DATA_KEY,
    GROUND_TRUTH_RANK, OBS_MASK_KEY, OBS_MASK_RANK, TENSOR_RANK,
};
use crate::error::{LineFreqError, LineFreqResult};

/// Simulation reference data, lifted to the 7-D prediction layout.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    /// (1, 1, sequence, time, field, x, y), obstacle area already zeroed.
    pub data: ArrayD<f32>,
    /// (1, 1, sequence, 1, 1, x, y) when the container holds an obstacle mask.
    pub obs_mask: Option<ArrayD<f32>>,
}

fn open_npz(path: &Path) -> LineFreqResult<NpzReader<File>> {
    if !path.exists() {
        return Err(LineFreqError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(NpzReader::new(file)?)
}

/// Stored name of `key`; numpy writes entries as `<key>.npy`.
fn find_entry(npz: &mut NpzReader<File>, key: &str) -> LineFreqResult<Option<String>> {
    let with_ext = format!("{key}.npy");
    Ok(npz
        .names()?
        .into_iter()
        .find(|name| name == key || *name == with_ext))
}

fn read_entry<A: ReadableElement>(
    npz: &mut NpzReader<File>,
    name: &str,
) -> Result<ArrayD<A>, ReadNpzError> {
    npz.by_name::<OwnedRepr<A>, IxDyn>(name).or_else(|_| {
        let stem = name.strip_suffix(".npy").unwrap_or(name);
        npz.by_name::<OwnedRepr<A>, IxDyn>(&format!("{stem}.npy"))
    })
}

/// Reads a float array stored as f32 or f64 and returns it as f32.
fn read_tensor(npz: &mut NpzReader<File>, path: &Path, key: &str) -> LineFreqResult<ArrayD<f32>> {
    let name = find_entry(npz, key)?.ok_or_else(|| LineFreqError::MissingKey {
        path: path.to_path_buf(),
        key: key.to_string(),
    })?;
    match read_entry::<f32>(npz, &name) {
        Ok(array) => Ok(array),
        Err(f32_err) => match read_entry::<f64>(npz, &name) {
            Ok(array) => Ok(array.mapv(|v| v as f32)),
            Err(_) => Err(f32_err.into()),
        },
    }
}

/// Reads the obstacle mask. Binary masks are often stored as `bool` or
/// `uint8`; those map to 0.0 and 1.0.
fn read_mask(npz: &mut NpzReader<File>, path: &Path, key: &str) -> LineFreqResult<ArrayD<f32>> {
    let name = find_entry(npz, key)?.ok_or_else(|| LineFreqError::MissingKey {
        path: path.to_path_buf(),
        key: key.to_string(),
    })?;
    if let Ok(mask) = read_entry::<bool>(npz, &name) {
        return Ok(mask.mapv(|keep| if keep { 1.0 } else { 0.0 }));
    }
    if let Ok(mask) = read_entry::<u8>(npz, &name) {
        return Ok(mask.mapv(|keep| if keep != 0 { 1.0 } else { 0.0 }));
    }
    read_tensor(npz, path, key)
}

fn check_rank(name: &str, array: &ArrayD<f32>, expected: usize) -> LineFreqResult<()> {
    if array.ndim() != expected {
        return Err(LineFreqError::RankMismatch {
            name: name.to_string(),
            expected,
            actual: array.ndim(),
        });
    }
    Ok(())
}

/// Lifts (sequence, time, field, x, y) to (1, 1, sequence, time, field, x, y).
pub fn lift_ground_truth(data: ArrayD<f32>) -> ArrayD<f32> {
    data.insert_axis(Axis(0)).insert_axis(Axis(0))
}

/// Ground truth that already carries unit model and eval axes.
fn is_lifted_ground_truth(data: &ArrayD<f32>) -> bool {
    data.ndim() == TENSOR_RANK && data.shape()[AXIS_MODEL] == 1 && data.shape()[AXIS_EVAL] == 1
}

/// Lifts a (sequence, x, y) mask to (1, 1, sequence, 1, 1, x, y).
pub fn lift_obstacle_mask(mask: ArrayD<f32>) -> ArrayD<f32> {
    mask.insert_axis(Axis(AXIS_TIME - AXIS_SEQUENCE))
        .insert_axis(Axis(AXIS_FIELD - AXIS_SEQUENCE))
        .insert_axis(Axis(0))
        .insert_axis(Axis(0))
}

/// Zeroes the obstacle area of `tensor`.
///
/// Every mask axis must either match the tensor axis or have length 1.
/// For a binary mask applying it twice changes nothing.
pub fn apply_obstacle_mask(tensor: &mut ArrayD<f32>, mask: &ArrayD<f32>) -> LineFreqResult<()> {
    let mismatch = || LineFreqError::ShapeMismatch {
        tensor: tensor.shape().to_vec(),
        mask: mask.shape().to_vec(),
    };
    if mask.ndim() != tensor.ndim() {
        return Err(mismatch());
    }
    let broadcast_mask = mask.broadcast(tensor.raw_dim()).ok_or_else(mismatch)?;
    Zip::from(tensor.view_mut())
        .and(&broadcast_mask)
        .for_each(|value, &keep| *value *= keep);
    Ok(())
}

/// Loads the ground-truth container (`data` plus optional `obsMask`).
///
/// `data` is (sequence, time, field, x, y), or already (1, 1, sequence, time, field, x, y).
pub fn load_ground_truth(path: &Path) -> LineFreqResult<GroundTruth> {
    let mut npz = open_npz(path)?;

    let data = read_tensor(&mut npz, path, GROUND_TRUTH_DATA_KEY)?;
    let mut data = if is_lifted_ground_truth(&data) {
        data
    } else {
        check_rank(GROUND_TRUTH_DATA_KEY, &data, GROUND_TRUTH_RANK)?;
        lift_ground_truth(data)
    };

    let obs_mask = match find_entry(&mut npz, OBS_MASK_KEY)? {
        Some(_) => {
            let mask = read_mask(&mut npz, path, OBS_MASK_KEY)?;
            check_rank(OBS_MASK_KEY, &mask, OBS_MASK_RANK)?;
            let mask = lift_obstacle_mask(mask);
            apply_obstacle_mask(&mut data, &mask)?;
            Some(mask)
        }
        None => None,
    };

    log::info!(
        "Original ground truth shape: {:?}{}",
        data.shape(),
        if obs_mask.is_some() { " (obstacle mask applied)" } else { "" }
    );
    Ok(GroundTruth { data, obs_mask })
}

/// Loads one model's prediction tensor (model, eval, sequence, time, field, x, y).
pub fn load_prediction(path: &Path, key: &str) -> LineFreqResult<ArrayD<f32>> {
    let mut npz = open_npz(path)?;
    let prediction = read_tensor(&mut npz, path, key)?;
    check_rank(key, &prediction, TENSOR_RANK)?;
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array5};
    use ndarray_npy::NpzWriter;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_npz_path(tag: &str) -> PathBuf {
        let epoch_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "line_freq_loader_{}_{}_{}.npz",
            tag,
            std::process::id(),
            epoch_ns
        ))
    }

    #[test]
    fn test_lift_shapes() {
        let data = Array5::<f32>::zeros((3, 4, 2, 6, 8)).into_dyn();
        assert_eq!(lift_ground_truth(data).shape(), &[1, 1, 3, 4, 2, 6, 8]);

        let mask = Array3::<f32>::zeros((3, 6, 8)).into_dyn();
        assert_eq!(lift_obstacle_mask(mask).shape(), &[1, 1, 3, 1, 1, 6, 8]);
    }

    #[test]
    fn test_mask_zeroes_obstacle_and_is_idempotent() {
        let mut tensor = ArrayD::<f32>::from_elem(IxDyn(&[2, 1, 1, 2, 1, 2, 2]), 3.0);
        let mut mask = Array3::<f32>::ones((1, 2, 2));
        mask[[0, 1, 0]] = 0.0;
        let mask = lift_obstacle_mask(mask.into_dyn());

        apply_obstacle_mask(&mut tensor, &mask).unwrap();
        assert_eq!(tensor[&[1, 0, 0, 1, 0, 1, 0][..]], 0.0);
        assert_eq!(tensor[&[1, 0, 0, 1, 0, 0, 0][..]], 3.0);

        let once = tensor.clone();
        apply_obstacle_mask(&mut tensor, &mask).unwrap();
        assert_eq!(tensor, once);
    }

    #[test]
    fn test_mask_shape_mismatch_is_error() {
        let mut tensor = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 2, 1, 1, 4, 4]));
        let mask = lift_obstacle_mask(Array3::<f32>::ones((3, 4, 4)).into_dyn());
        let err = apply_obstacle_mask(&mut tensor, &mask).unwrap_err();
        assert!(matches!(err, LineFreqError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let path = temp_npz_path("missing");
        let err = load_prediction(&path, "arr_0").unwrap_err();
        assert!(matches!(err, LineFreqError::MissingFile(ref p) if *p == path));
    }

    #[test]
    fn test_ground_truth_roundtrip_with_mask() {
        let path = temp_npz_path("gt");
        let data = Array5::<f32>::from_elem((2, 3, 2, 4, 4), 2.0);
        let mut mask = Array3::<f32>::ones((2, 4, 4));
        mask[[0, 2, 2]] = 0.0;
        {
            let mut writer = NpzWriter::new(File::create(&path).unwrap());
            writer.add_array("data", &data).unwrap();
            writer.add_array("obsMask", &mask).unwrap();
            writer.finish().unwrap();
        }

        let gt = load_ground_truth(&path).unwrap();
        assert_eq!(gt.data.shape(), &[1, 1, 2, 3, 2, 4, 4]);
        assert!(gt.obs_mask.is_some());
        assert_eq!(gt.data[&[0, 0, 0, 1, 1, 2, 2][..]], 0.0);
        assert_eq!(gt.data[&[0, 0, 1, 1, 1, 2, 2][..]], 2.0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_ground_truth_accepts_bool_and_u8_masks() {
        let data = Array5::<f32>::from_elem((2, 1, 1, 4, 4), 1.5);
        let mut keep = Array3::<bool>::from_elem((2, 4, 4), true);
        keep[[1, 0, 3]] = false;

        let bool_path = temp_npz_path("bool_mask");
        {
            let mut writer = NpzWriter::new(File::create(&bool_path).unwrap());
            writer.add_array("data", &data).unwrap();
            writer.add_array("obsMask", &keep).unwrap();
            writer.finish().unwrap();
        }
        let gt = load_ground_truth(&bool_path).unwrap();
        let mask = gt.obs_mask.unwrap();
        assert_eq!(mask.shape(), &[1, 1, 2, 1, 1, 4, 4]);
        assert!(mask.iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(gt.data[&[0, 0, 1, 0, 0, 0, 3][..]], 0.0);
        assert_eq!(gt.data[&[0, 0, 0, 0, 0, 0, 3][..]], 1.5);
        std::fs::remove_file(&bool_path).ok();

        let u8_path = temp_npz_path("u8_mask");
        {
            let mut writer = NpzWriter::new(File::create(&u8_path).unwrap());
            writer.add_array("data", &data).unwrap();
            writer.add_array("obsMask", &keep.mapv(u8::from)).unwrap();
            writer.finish().unwrap();
        }
        let gt = load_ground_truth(&u8_path).unwrap();
        assert_eq!(gt.data[&[0, 0, 1, 0, 0, 0, 3][..]], 0.0);
        assert_eq!(gt.data.iter().filter(|&&v| v == 0.0).count(), 1);
        std::fs::remove_file(&u8_path).ok();
    }

    #[test]
    fn test_ground_truth_with_leading_unit_axes() {
        let path = temp_npz_path("gt7");
        {
            let mut writer = NpzWriter::new(File::create(&path).unwrap());
            writer
                .add_array("data", &ArrayD::<f32>::ones(IxDyn(&[1, 1, 3, 2, 5, 4, 4])))
                .unwrap();
            writer.finish().unwrap();
        }
        let gt = load_ground_truth(&path).unwrap();
        assert_eq!(gt.data.shape(), &[1, 1, 3, 2, 5, 4, 4]);
        assert!(gt.obs_mask.is_none());
        std::fs::remove_file(&path).ok();

        // a model axis longer than 1 is not a ground truth
        let path = temp_npz_path("gt7_models");
        {
            let mut writer = NpzWriter::new(File::create(&path).unwrap());
            writer
                .add_array("data", &ArrayD::<f32>::ones(IxDyn(&[2, 1, 3, 2, 5, 4, 4])))
                .unwrap();
            writer.finish().unwrap();
        }
        let err = load_ground_truth(&path).unwrap_err();
        assert!(matches!(err, LineFreqError::RankMismatch { expected: 5, actual: 7, .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_ground_truth_without_data_key() {
        let path = temp_npz_path("nodata");
        {
            let mut writer = NpzWriter::new(File::create(&path).unwrap());
            writer
                .add_array("obsMask", &Array3::<f32>::ones((1, 2, 2)))
                .unwrap();
            writer.finish().unwrap();
        }
        let err = load_ground_truth(&path).unwrap_err();
        assert!(matches!(err, LineFreqError::MissingKey { ref key, .. } if key == "data"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_prediction_accepts_f64_and_checks_rank() {
        let path = temp_npz_path("pred");
        {
            let mut writer = NpzWriter::new(File::create(&path).unwrap());
            writer
                .add_array("arr_0", &ArrayD::<f64>::from_elem(IxDyn(&[1, 1, 1, 2, 1, 2, 4]), 0.5))
                .unwrap();
            writer
                .add_array("flat", &Array3::<f32>::zeros((1, 2, 2)))
                .unwrap();
            writer.finish().unwrap();
        }
        let prediction = load_prediction(&path, "arr_0").unwrap();
        assert_eq!(prediction.shape(), &[1, 1, 1, 2, 1, 2, 4]);
        assert!(prediction.iter().all(|&v| v == 0.5));

        let err = load_prediction(&path, "flat").unwrap_err();
        assert!(matches!(err, LineFreqError::RankMismatch { expected: 7, actual: 3, .. }));
        std::fs::remove_file(&path).ok();
    }
}

// src/data_input/tensor_loader.rs
