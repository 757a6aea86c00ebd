use ferrite_ftwt::problems::simple_cross;
use ferrite_ftwt::train::NeuronMap;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let mut network = simple_cross::build()?;
    println!("Before training:\n{}", network);

    for iteration in 0..10 {
        network.train_step(&[vec![(0, 1.0)]], &[vec![(3, 1.0)]]);
        network.train_step(&[vec![(1, 1.0)]], &[vec![(2, 1.0)]]);
        if iteration % 3 == 0 {
            println!("Iteration {iteration}: w(3,0) = {:.4}, w(2,0) = {:.4}",
                network.synapses().get(3, 0).unwrap_or(0.0),
                network.synapses().get(2, 0).unwrap_or(0.0));
        }
    }

    let map = NeuronMap { inputs: vec![0, 1], outputs: vec![3, 2] };
    for (input, expected) in [([1.0, 0.0], 0), ([0.0, 1.0], 1)] {
        let response = network.apply_input(&map.input_vector(&input, 4));
        println!("Input: {:?} -> Response: {:.4?} (class {:?}, expected {})",
            input, response, map.classify(&response), expected);
    }
    Ok(())
}
