//! Named-placeholder template rendering.
//!
//! Templates are plain strings with `{name}` placeholders. Rendering is a
//! single left-to-right pass: each known placeholder is substituted with
//! its value, everything else — including literal LaTeX braces such as
//! `\begin{figure}` and placeholders with no supplied value — passes
//! through untouched. Substituted values are never re-scanned, so a
//! caption containing `{label}` stays as written.
//!
//! The placeholder names (`label`, `block`, `eq`, `img_path`, `caption`,
//! `incl_args`, `table`, `formatting`) are a compatibility contract;
//! documents built against one version of the templates keep working when
//! the surrounding LaTeX changes.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Default equation template. Placeholders: `{label}`, `{block}`, `{eq}`.
pub const DEFAULT_EQ_TEMPLATE: &str = "\\begin{{block}}\\label{{label}}\n{eq}\n\\end{{block}}";

/// Default figure template. Placeholders: `{label}`, `{incl_args}`,
/// `{img_path}`, `{caption}`.
pub const DEFAULT_FIG_TEMPLATE: &str = "\\begin{figure}\n\t\\centering\n\t\\includegraphics[{incl_args}]{{img_path}}\n\t\\caption{{caption}}\n\t\\label{{label}}\n\\end{figure}";

/// Default table template. Placeholders: `{label}`, `{formatting}`,
/// `{table}`, `{caption}`.
pub const DEFAULT_TAB_TEMPLATE: &str = "\\begin{table}\n\t\\centering\n\t{formatting}\n{table}\n\t\\caption{{caption}}\n\t\\label{{label}}\n\\end{table}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Fill `{name}` placeholders in `template` from `vars`.
///
/// Unknown placeholders are left in place so user templates degrade
/// loudly (the raw `{name}` shows up in the output) instead of silently
/// dropping text.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Prefix every non-blank line of `text` with `prefix`.
///
/// Used to indent equation bodies one tab stop inside their environment.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_equation_template() {
        let out = fill(
            DEFAULT_EQ_TEMPLATE,
            &[("block", "equation"), ("label", "eq:test_eq"), ("eq", "\ta_b")],
        );
        assert_eq!(out, "\\begin{equation}\\label{eq:test_eq}\n\ta_b\n\\end{equation}");
    }

    #[test]
    fn test_fill_leaves_literal_latex_braces() {
        let out = fill(
            DEFAULT_FIG_TEMPLATE,
            &[
                ("label", "fig:a"),
                ("incl_args", "width=.8\\linewidth"),
                ("img_path", "../img/a.pdf"),
                ("caption", "A caption"),
            ],
        );
        assert!(out.starts_with("\\begin{figure}"));
        assert!(out.ends_with("\\end{figure}"));
        assert!(out.contains("\\includegraphics[width=.8\\linewidth]{../img/a.pdf}"));
        assert!(out.contains("\\caption{A caption}"));
        assert!(out.contains("\\label{fig:a}"));
    }

    #[test]
    fn test_fill_unknown_placeholder_passes_through() {
        assert_eq!(fill("{label} and {mystery}", &[("label", "x")]), "x and {mystery}");
    }

    #[test]
    fn test_fill_value_not_rescanned() {
        // a value containing a placeholder-shaped token stays as written
        let out = fill("\\caption{{caption}}", &[("caption", "uses {label} literally")]);
        assert_eq!(out, "\\caption{uses {label} literally}");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a_b", "\t"), "\ta_b");
        assert_eq!(indent("a\nb", "\t"), "\ta\n\tb");
        assert_eq!(indent("a\n\nb", "\t"), "\ta\n\n\tb");
    }
}
