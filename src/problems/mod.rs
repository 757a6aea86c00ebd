pub mod mnist;
pub mod simple_cross;

/// Named problems runnable from the command line.
pub const PROBLEMS: [(&str, &str); 3] = [
    ("simple-cross", "Train a network to cross two inputs to two outputs {0, 1} -> {1, 0}."),
    ("mnist", "Train a fixed input-to-output network to identify MNIST digit images."),
    ("mnist-rand", "Train randomly generated networks to identify MNIST digit images (parameter sweep)."),
];
