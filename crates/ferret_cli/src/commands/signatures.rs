//! Signature listing and inspection.

use ferret_core::{Part, SignatureKind, SignatureSet};

use super::Result;
use crate::ui::{self, colors};

pub(crate) fn run(rules: Option<&std::path::Path>, match_level: u8, verbose: bool) -> Result {
    let set = match rules {
        Some(path) => SignatureSet::load(path, match_level)?,
        None => SignatureSet::embedded(match_level)?,
    };

    println!();
    if !set.meta.version.is_empty() {
        println!(
            "{} {} {}",
            colors::muted().apply_to("ruleset"),
            colors::secondary().apply_to(&set.meta.version),
            colors::muted().apply_to(&set.meta.date)
        );
        println!();
    }

    for signature in &set.signatures {
        println!(
            "{} {} {}",
            colors::accent().apply_to(&signature.id),
            colors::muted().apply_to(format!("[{} c{}]", part_name(signature.part), signature.confidence)),
            colors::secondary().apply_to(&signature.description)
        );
        if verbose {
            match &signature.kind {
                SignatureKind::Simple { literal } => {
                    println!("  {} {literal}", colors::muted().apply_to("literal:"));
                }
                SignatureKind::Pattern {
                    regex,
                    entropy_threshold,
                } => {
                    println!("  {} {}", colors::muted().apply_to("regex:"), regex.as_str());
                    if *entropy_threshold > 0.0 {
                        println!("  {} {entropy_threshold}", colors::muted().apply_to("entropy:"));
                    }
                }
            }
        }
    }

    println!();
    ui::print_info(&format!(
        "{} signatures, {} safe functions at match level {match_level}",
        set.signatures.len(),
        set.safe_functions.len()
    ));
    Ok(())
}

const fn part_name(part: Part) -> &'static str {
    match part {
        Part::Path => "path",
        Part::Filename => "filename",
        Part::Extension => "extension",
        Part::Content => "content",
    }
}
