//! Nebula: interactive GPU particle cloud.
//!
//! Run with: cargo run --release -- [--count N] [--seed S] [--palette NAME]
//! [--size X] [--speed X] [--turbulence X] [--no-bloom] [--bg #RRGGBB]

use nebula::params::{self, Params};
use nebula::prelude::*;
use nebula::rng::coerce_seed;
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nebula=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args: Vec<String> = std::env::args().collect();
    let params = params_from_args(&args);

    if let Err(e) = Viewer::new().with_params(params).run() {
        error!(error = %e, "viewer exited with an error");
        std::process::exit(1);
    }
}

/// Build startup parameters from command-line flags. Unparseable values are
/// ignored; out-of-range values are clamped.
fn params_from_args(args: &[String]) -> Params {
    let mut params = Params::with_random_seed();

    if let Some(count) = parse_arg(args, "--count") {
        params.count = count.max(0.0) as u32;
    }
    if let Some(seed) = parse_arg(args, "--seed") {
        params.seed = coerce_seed(seed);
    }
    if let Some(name) = string_arg(args, "--palette") {
        params.palette = Palette::try_from_name(name).unwrap_or_else(|| {
            warn!(palette = %name, "unknown palette, using galaxy");
            Palette::Galaxy
        });
    }
    if let Some(size) = parse_arg(args, "--size") {
        params.size = size as f32;
    }
    if let Some(speed) = parse_arg(args, "--speed") {
        params.speed = speed as f32;
    }
    if let Some(turbulence) = parse_arg(args, "--turbulence") {
        params.turbulence = turbulence as f32;
    }
    if args.iter().any(|a| a == "--no-bloom") {
        params.bloom = false;
    }
    if let Some(hex) = string_arg(args, "--bg") {
        match params::parse_hex_color(hex) {
            Some(color) => params.bg_color = color,
            None => warn!(bg = %hex, "invalid background color, expected #RRGGBB"),
        }
    }

    params.clamped()
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_arg(args: &[String], flag: &str) -> Option<f64> {
    string_arg(args, flag).and_then(|v| v.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("nebula")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults_without_flags() {
        let params = params_from_args(&args(""));
        let defaults = Params::default();
        assert_eq!(params.count, defaults.count);
        assert_eq!(params.palette, defaults.palette);
        assert!(params.bloom);
        assert!(params.seed < params::SEED_LIMIT);
    }

    #[test]
    fn test_flags_are_applied() {
        let params = params_from_args(&args(
            "--count 30000 --seed 42 --palette ocean --size 1.5 --no-bloom --bg #102030",
        ));
        assert_eq!(params.count, 30_000);
        assert_eq!(params.seed, 42);
        assert_eq!(params.palette, Palette::Ocean);
        assert_eq!(params.size, 1.5);
        assert!(!params.bloom);
        assert_eq!(params.bg_color, [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let params = params_from_args(&args("--count 5 --speed 99 --turbulence -3"));
        assert_eq!(params.count, 500);
        assert_eq!(params.speed, 3.0);
        assert_eq!(params.turbulence, 0.0);
    }

    #[test]
    fn test_seed_is_coerced_and_palette_falls_back() {
        let params = params_from_args(&args("--seed -1 --palette plaid"));
        assert_eq!(params.seed, u32::MAX);
        assert_eq!(params.palette, Palette::Galaxy);
    }
}
