// src/sampling.rs
use rand::seq::index;
use rand::Rng;

use crate::config::{MIN_SAMPLE_SIZE, SAMPLE_RATIO};
use crate::error::ParseError;

/// `max(1, floor(0.1 * n))`.
pub fn sample_size(population: usize) -> usize {
    ((population as f64 * SAMPLE_RATIO).floor() as usize).max(MIN_SAMPLE_SIZE)
}

/// Draws `sample_size(n)` items uniformly without replacement. Selected items
/// keep their source order.
pub fn draw_sample<T, R>(population: Vec<T>, rng: &mut R) -> Result<Vec<T>, ParseError>
where
    R: Rng + ?Sized,
{
    let n = population.len();
    if n == 0 {
        return Err(ParseError::EmptyPopulation);
    }

    let mut picked = index::sample(rng, n, sample_size(n)).into_vec();
    picked.sort_unstable();

    let mut wanted = picked.into_iter().peekable();
    let sample = population
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if wanted.peek() == Some(&i) {
                wanted.next();
                Some(item)
            } else {
                None
            }
        })
        .collect();

    Ok(sample)
}

/// Same as [`draw_sample`] using the thread-local generator.
pub fn sample<T>(population: Vec<T>) -> Result<Vec<T>, ParseError> {
    draw_sample(population, &mut rand::rng())
}
