use argh::FromArgs;

use imalgebra::{
    image::{ArrayShape, PixelArray},
    imgproc::{
        draw::draw_circle,
        features::{harris_corners, HarrisParams},
        morphology::{
            dilate, erode_with, geodesic_erosion, reconstruct_by_dilation, select_strategy,
            BoundaryPolicy, ErosionOptions, SeShape, StructuringElement,
        },
        parallel::ExecutionStrategy,
    },
};

#[derive(FromArgs)]
/// Erode, dilate and reconstruct a synthetic binary image and print the results
struct Args {
    /// image width and height, at least 8 (default: 32)
    #[argh(option, short = 'n', default = "32")]
    size: usize,

    /// structuring element size (default: 3)
    #[argh(option, short = 's', default = "3")]
    kernel_size: usize,

    /// structuring element shape: square, cross, ellipse, hline, vline (default: square)
    #[argh(option, short = 'k', default = "String::from(\"square\")")]
    kernel_shape: String,

    /// boundary policy: ignore, white, black (default: ignore)
    #[argh(option, short = 'p', default = "String::from(\"ignore\")")]
    policy: String,

    /// run on a single thread
    #[argh(switch)]
    serial: bool,
}

fn print_binary(title: &str, img: &PixelArray<bool>) {
    println!("{title}:");
    for y in 0..img.y_dim() {
        let row: String = (0..img.x_dim())
            .map(|x| match img.get(x, y, 0, 0, 0) {
                Some(true) => '#',
                _ => '.',
            })
            .collect();
        println!("  {row}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let n = args.size.max(8);
    let r = (n / 4) as i64;

    // two nested rings and a filled block
    let mut canvas = PixelArray::from_shape_val(ArrayShape::new_2d(n, n), 0u8);
    draw_circle(&mut canvas, (r + 1, r + 1), r, &[255])?;
    draw_circle(&mut canvas, (r + 1, r + 1), r - 1, &[255])?;
    for y in n / 2..n - 2 {
        for x in n / 2..n - 2 {
            canvas.set(x, y, 0, 0, 0, 255)?;
        }
    }
    let binary = canvas.map(|&v| v >= 128);

    let shape = match args.kernel_shape.as_str() {
        "cross" => SeShape::Cross {
            size: args.kernel_size,
        },
        "ellipse" => SeShape::Ellipse {
            width: args.kernel_size,
            height: args.kernel_size,
        },
        "hline" => SeShape::HorizontalLine {
            length: args.kernel_size,
        },
        "vline" => SeShape::VerticalLine {
            length: args.kernel_size,
        },
        _ => SeShape::Square {
            size: args.kernel_size,
        },
    };
    let se = StructuringElement::new(shape)?;

    let policy = match args.policy.as_str() {
        "white" => BoundaryPolicy::White,
        "black" => BoundaryPolicy::Black,
        _ => BoundaryPolicy::Ignore,
    };
    log::info!(
        "{} element of {} offsets, {policy:?} policy, strategy {:?}",
        args.kernel_shape,
        se.len(),
        select_strategy(&se, policy)
    );

    let execution = if args.serial {
        ExecutionStrategy::Serial
    } else {
        ExecutionStrategy::default()
    };
    let options = ErosionOptions {
        execution,
        ..ErosionOptions::with_policy(policy)
    };

    let eroded = erode_with(&binary, &se, &options)?;
    let dilated = dilate(&binary, &se, policy)?;
    let geodesic = geodesic_erosion(&binary, &eroded, &se, policy)?;

    // grow the block back from a single seed
    let mut marker = PixelArray::from_shape_val(binary.shape(), false);
    marker.set(n * 3 / 4, n * 3 / 4, 0, 0, 0, true)?;
    let rec = reconstruct_by_dilation(&marker, &binary, &se, policy, n * n)?;
    log::info!(
        "reconstruction converged: {} after {} passes",
        rec.converged,
        rec.iterations
    );

    print_binary("input", &binary);
    print_binary("eroded", &eroded);
    print_binary("dilated", &dilated);
    print_binary("geodesic erosion", &geodesic);
    print_binary("reconstructed block", &rec.array);

    let corners = harris_corners(&canvas, &HarrisParams::default())?;
    println!("harris corners:");
    for kp in &corners {
        println!("  ({}, {}) response {:.3}", kp.x, kp.y, kp.response);
    }

    Ok(())
}
