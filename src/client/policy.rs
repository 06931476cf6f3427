use crate::endpoint::Endpoint;
use rand::Rng;

/// Policy for [`DohClient`] to use when selecting the endpoint of each attempt.
///
/// [`DohClient`]: crate::DohClient
pub trait Policy: Send + Sync {
    /// Picks the index of the endpoint to use for the next attempt.
    ///
    /// `endpoints` is never empty and the returned index must be in bounds.
    /// `attempt` counts from 1.
    fn select(&self, endpoints: &[Endpoint], attempt: u32) -> usize;
}

/// Policy that picks uniformly at random among all candidates, independently
/// for every attempt. Endpoints that failed earlier are not avoided.
#[derive(Debug, Clone, Copy, Default)]
pub struct Random;

impl Policy for Random {
    fn select(&self, endpoints: &[Endpoint], _attempt: u32) -> usize {
        match endpoints.len() {
            0 | 1 => 0,
            n => rand::rng().random_range(0..n),
        }
    }
}

/// Policy that walks the candidates in order, wrapping around. Useful when
/// the endpoints are listed by preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOrder;

impl Policy for InOrder {
    fn select(&self, endpoints: &[Endpoint], attempt: u32) -> usize {
        (attempt.saturating_sub(1) as usize) % endpoints.len().max(1)
    }
}

impl<P: Policy + ?Sized> Policy for &P {
    fn select(&self, endpoints: &[Endpoint], attempt: u32) -> usize {
        (**self).select(endpoints, attempt)
    }
}

#[cfg(test)]
fn endpoints(hosts: &[&str]) -> Vec<Endpoint> {
    hosts
        .iter()
        .map(|host| Endpoint::new(*host).unwrap())
        .collect()
}

#[test]
fn random_single_candidate_is_deterministic() {
    let pool = endpoints(&["only.example"]);
    for attempt in 1..=20 {
        assert_eq!(Random.select(&pool, attempt), 0);
    }
}

#[test]
fn random_stays_in_bounds_and_covers_pool() {
    let pool = endpoints(&["a.example", "b.example", "c.example"]);
    let mut seen = [false; 3];
    for attempt in 1..=500 {
        let idx = Random.select(&pool, attempt);
        assert!(idx < pool.len());
        seen[idx] = true;
    }
    assert!(seen.iter().all(|&s| s), "every endpoint should be drawn: {:?}", seen);
}

#[test]
fn in_order_wraps_around() {
    let pool = endpoints(&["a.example", "b.example"]);
    let order = (1..=5)
        .map(|attempt| InOrder.select(&pool, attempt))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![0, 1, 0, 1, 0]);
}
