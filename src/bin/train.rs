use autoencoder::{Autoencoder, Config, Example, Logging, TrainingOptions};

use rand::Rng;

const PATTERN_LEN: usize = 8;

/// Noisy copies of a few sparse binary prototypes.
fn generate_data(num_samples: usize) -> Vec<(Vec<f64>, Vec<f64>)> {
    let mut rng = rand::rng();
    let prototypes: Vec<Vec<f64>> = (0..PATTERN_LEN)
        .map(|i| {
            let mut p = vec![0.0; PATTERN_LEN];
            p[i] = 1.0;
            p[(i + 3) % PATTERN_LEN] = 1.0;
            p
        })
        .collect();

    let mut data = Vec::new();
    for _ in 0..num_samples {
        let clean = prototypes[rng.random_range(0..prototypes.len())].clone();
        let noisy = clean
            .iter()
            .map(|&x| (x + rng.random_range(-0.1..0.1)).clamp(0.0, 1.0))
            .collect();
        data.push((noisy, clean));
    }
    data
}

fn score(set_name: &str, network: &mut Autoencoder, test_data: &[(Vec<f64>, Vec<f64>)]) -> autoencoder::Result<()> {
    let mut num_correct = 0;
    for (input, expected) in test_data {
        let output = network.run_input(input)?;
        let matches = output
            .iter()
            .zip(expected)
            .all(|(&y, &e)| (y > 0.5) == (e > 0.5));
        if matches {
            num_correct += 1;
        }
    }
    println!(
        "{} set results: {} of {} reconstructed",
        set_name,
        num_correct,
        test_data.len()
    );
    Ok(())
}

fn main() -> autoencoder::Result<()> {
    tracing_subscriber::fmt::init();

    let training_data = generate_data(200);
    let examples: Vec<Example> = training_data
        .iter()
        .map(|(noisy, clean)| Example::new(noisy.clone(), clean.clone()))
        .collect();

    let mut network = Autoencoder::new(Config::new().make_sparse(true))?;
    let status = network.train(
        &examples,
        &TrainingOptions::new()
            .iterations(2000)
            .error_threshold(0.01)
            .logging(Logging::Iterations(100)),
    )?;
    println!("Stopped after {} iterations, MSE={}", status.iterations, status.error);

    println!();
    score("Training", &mut network, &training_data)?;
    score("Test", &mut network, &generate_data(100))?;

    let model = network.to_json()?.to_json_string()?;
    println!("Serialized model: {} bytes", model.len());
    Ok(())
}
