//! The [logistic sigmoid](https://en.wikipedia.org/wiki/Logistic_function)
//! activation used by every non-input neuron.

/// Evaluates `f(x) = 1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Evaluates the derivative `f'(x)`, where `y = f(x)`.
///
/// Note that this function takes in the *output* of the sigmoid rather than
/// its input. The network only keeps post-activation values, so this avoids
/// storing the weighted sums as well.
#[inline]
pub fn sigmoid_prime(y: f64) -> f64 {
    y * (1.0 - y)
}
