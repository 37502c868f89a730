//! Built-in single-argument functions and named constants

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// A built-in function of one argument.
pub type Function = fn(f64) -> f64;

static FUNCTIONS: Lazy<FxHashMap<&'static str, Function>> = Lazy::new(|| {
    let entries: [(&'static str, Function); 14] = [
        // Trigonometry works in radians
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("tan", f64::tan),
        ("asin", f64::asin),
        ("acos", f64::acos),
        ("atan", f64::atan),
        ("sqrt", f64::sqrt),
        ("abs", f64::abs),
        ("ln", f64::ln),
        ("log", f64::log10),
        ("exp", f64::exp),
        ("floor", f64::floor),
        ("ceil", f64::ceil),
        ("round", f64::round),
    ];
    entries.into_iter().collect()
});

/// Look up a function by its lowercase name.
pub fn lookup_function(name: &str) -> Option<Function> {
    FUNCTIONS.get(name).copied()
}

/// Look up a named constant by its lowercase name.
pub fn lookup_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}
