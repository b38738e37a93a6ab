/// A trait that provides easy access to the last element of a slice.
pub trait Back<T> {
    fn back(&self) -> &T;
}

impl<T> Back<T> for [T] {
    #[inline(always)]
    fn back(&self) -> &T {
        &self[self.len() - 1]
    }
}

/// A trait to replace all elements in a container with zeros.
pub trait ZeroOut {
    fn zero_out(&mut self);
}

impl ZeroOut for f64 {
    fn zero_out(&mut self) {
        *self = 0.0;
    }
}

impl<T> ZeroOut for [T]
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        for elem in self {
            elem.zero_out();
        }
    }
}

impl<T> ZeroOut for Vec<T>
where
    T: ZeroOut,
{
    fn zero_out(&mut self) {
        self.as_mut_slice().zero_out();
    }
}

/// Computes the mean of the squared `errors`.
///
/// An empty slice has no error.
pub fn mean_square_error(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    let sum: f64 = errors.iter().map(|e| e * e).sum();
    sum / errors.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_out_nested() {
        let mut v = vec![vec![1.0, 2.0], vec![3.0]];
        v.zero_out();
        assert_eq!(v, vec![vec![0.0, 0.0], vec![0.0]]);
    }

    #[test]
    fn back_of_slice() {
        let v = [1, 2, 3];
        assert_eq!(*v.back(), 3);
    }

    #[test]
    fn mse() {
        assert_eq!(mean_square_error(&[1.0, -1.0, 2.0, 0.0]), 1.5);
        assert_eq!(mean_square_error(&[]), 0.0);
    }
}
