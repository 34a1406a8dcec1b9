// ── Prometheus text exposition (format 0.0.4) ──
//
// Families are written in descriptor order with `# HELP` and `# TYPE`
// headers. Invalid-metric markers become plain comment lines so scrapers
// skip them while operators still see why a family is short.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::metric::{Descriptor, InvalidMetric, Observation, Sample};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

struct Family<'a> {
    descriptor: &'a Arc<Descriptor>,
    samples: Vec<&'a Sample>,
    invalid: Vec<&'a InvalidMetric>,
}

/// Render observations grouped by family. Families listed in
/// `descriptors` come first in that order; anything else follows in
/// first-seen order.
pub fn render(descriptors: &[Arc<Descriptor>], observations: &[Observation]) -> String {
    let mut families: Vec<Family<'_>> = descriptors
        .iter()
        .map(|descriptor| Family {
            descriptor,
            samples: Vec::new(),
            invalid: Vec::new(),
        })
        .collect();

    for obs in observations {
        let name = obs.descriptor().name();
        let idx = match families.iter().position(|f| f.descriptor.name() == name) {
            Some(idx) => idx,
            None => {
                families.push(Family {
                    descriptor: obs.descriptor(),
                    samples: Vec::new(),
                    invalid: Vec::new(),
                });
                families.len() - 1
            }
        };
        match obs {
            Observation::Sample(s) => families[idx].samples.push(s),
            Observation::Invalid(i) => families[idx].invalid.push(i),
        }
    }

    let mut out = String::with_capacity(observations.len() * 96);
    for family in &families {
        write_family(&mut out, family);
    }
    out
}

fn write_family(out: &mut String, family: &Family<'_>) {
    let desc = family.descriptor;

    if !family.samples.is_empty() {
        writeln!(out, "# HELP {} {}", desc.name(), escape_help(desc.help())).ok();
        writeln!(out, "# TYPE {} {}", desc.name(), desc.kind().as_str()).ok();
        for sample in &family.samples {
            writeln!(
                out,
                "{}{} {}",
                desc.name(),
                format_labels(desc.labels(), &sample.labels),
                format_value(sample.value)
            )
            .ok();
        }
    }

    for marker in &family.invalid {
        writeln!(
            out,
            "# collection failed for {}: {}",
            desc.name(),
            marker.error.replace('\n', " ")
        )
        .ok();
    }
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_labels(names: &[&str], values: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
        .collect();

    format!("{{{}}}", parts.join(","))
}

/// Format a floating point value for Prometheus.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let inf = if value.is_sign_positive() { "+Inf" } else { "-Inf" };
        inf.to_owned()
    } else {
        value.to_string()
    }
}
