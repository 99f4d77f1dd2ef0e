use ndarray::{Array1, ArrayView1};

/// Rescale a state by its largest component.
///
/// The maximum is folded starting from `0.0`, so an all-negative state is
/// treated as having maximum zero. When the maximum is zero the state is
/// returned unchanged. The input is never mutated.
pub fn normalize(state: ArrayView1<f32>) -> Array1<f32> {
    let max = state.iter().copied().fold(0.0f32, f32::max);
    if max == 0.0 {
        state.to_owned()
    } else {
        state.mapv(|v| v / max)
    }
}

/// Index of the first strict maximum, scanning left to right. `None` when empty.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best_index, mut best_value) = iter.next().map(|(i, &v)| (i, v))?;
    for (i, &v) in iter {
        if v > best_value {
            best_index = i;
            best_value = v;
        }
    }
    Some(best_index)
}

/// Largest value, folding from the first element. `None` when empty.
pub fn max_value(values: ArrayView1<f32>) -> Option<f32> {
    argmax(values).map(|i| values[i])
}
