#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::functional::core::{data::FarData, data::PanelData, options::FarOptions};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    Err(pyo3::exceptions::PyTypeError::new_err(
        "expected a 2-D numpy.ndarray or pandas.DataFrame of float64 (rows = time, \
         columns = series dimensions)",
    ))
}

#[cfg(feature = "python-bindings")]
pub fn extract_far_data<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, u: &Bound<'py, PyAny>,
) -> PyResult<FarData> {
    let y_mat = extract_f64_matrix(y)?;
    let u_arr = extract_f64_array(py, u)?;
    let u_slice = u_arr.as_slice().map_err(|_| {
        PyValueError::new_err("u must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(FarData::new(y_mat, Array1::from(u_slice.to_vec()))?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_panel_data<'py>(
    py: Python<'py>, sizes: Vec<usize>, series_len: usize, y: &Bound<'py, PyAny>,
    u: &Bound<'py, PyAny>,
) -> PyResult<PanelData> {
    let y_mat = extract_f64_matrix(y)?;
    let u_arr = extract_f64_array(py, u)?;
    let u_slice = u_arr.as_slice().map_err(|_| {
        PyValueError::new_err("u must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(PanelData::new(sizes, series_len, y_mat, Array1::from(u_slice.to_vec()))?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_far_options(
    bwp: Option<f64>, numpoints: Option<usize>, compute_fpdc: Option<bool>,
) -> PyResult<FarOptions> {
    let defaults = FarOptions::default();
    Ok(FarOptions::new(
        bwp.unwrap_or(defaults.bwp),
        numpoints.unwrap_or(defaults.numpoints),
        compute_fpdc.unwrap_or(defaults.compute_fpdc),
    )?)
}

/// Convert a row-major matrix into nested `Vec`s for Python consumption.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}
