pub mod test_agent;
pub mod test_trainer;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::network::ValueNetwork;

pub(crate) fn seeded_network(input: usize, hidden: usize, output: usize, activation: Activation) -> ValueNetwork {
    let mut rng = StdRng::seed_from_u64(1234);
    ValueNetwork::new(input, hidden, output, activation, &mut rng).unwrap()
}
