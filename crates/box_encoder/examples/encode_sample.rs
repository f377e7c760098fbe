use box_encoder::{BoxEncoder, DefaultBoxes};
use ndarray::{array, Array1, Array2};

fn main() {
    let layout = DefaultBoxes {
        aspect_ratios: vec![vec![2.0], vec![2.0, 3.0], vec![2.0]],
        feature_sizes: vec![(8, 8), (4, 4), (2, 2)],
        min_ratio: 0.2,
        max_ratio: 0.9,
    };

    let encoder = BoxEncoder::new(0.5, &layout.generate()).expect("valid configuration");

    let boxes: Array2<f32> = array![[0.1, 0.2, 0.4, 0.6], [0.5, 0.5, 0.9, 0.8]];
    let labels: Array1<i32> = array![1, 2];

    let (target_boxes, target_labels) = encoder.encode(boxes.view(), labels.view());

    let foreground = target_labels.iter().filter(|&&label| label != 0).count();
    println!(
        "{} of {} anchors matched a ground-truth box",
        foreground,
        encoder.anchors().len()
    );
    println!("{:?}", target_boxes);
}
