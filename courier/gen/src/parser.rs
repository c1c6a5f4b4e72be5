//! Path template parsing.
//!
//! Templates use `{name}` placeholders (`users/{id}/posts/{post_id}`). A
//! placeholder made only of digits (`{0}`) refers to a parameter by position.

/// One piece of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Splits a template into literal text and placeholders.
///
/// ## Examples
///
/// ```
/// use courier_gen::parser::{Segment, parse_template};
///
/// let segments = parse_template("users/{id}").unwrap();
/// assert_eq!(
///     segments,
///     vec![Segment::Literal("users/".into()), Segment::Placeholder("id".into())]
/// );
/// ```
///
/// ## Errors
///
/// Returns a description of the problem for unbalanced braces, nested
/// braces or empty placeholders.
pub fn parse_template(template: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut placeholder: Option<String> = None;

    for (idx, c) in template.char_indices() {
        match (c, placeholder.as_mut()) {
            ('{', None) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                placeholder = Some(String::new());
            }
            ('{', Some(_)) => return Err(format!("nested '{{' at offset {idx}")),
            ('}', None) => return Err(format!("unmatched '}}' at offset {idx}")),
            ('}', Some(name)) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(format!("empty placeholder at offset {idx}"));
                }
                segments.push(Segment::Placeholder(name));
                placeholder = None;
            }
            (c, Some(name)) => name.push(c),
            (c, None) => literal.push(c),
        }
    }

    if placeholder.is_some() {
        return Err("unclosed '{'".to_string());
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Placeholder names in order of appearance (duplicates kept).
pub fn placeholders(segments: &[Segment]) -> Vec<&str> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Parses a positional placeholder such as `{0}`.
pub fn positional_index(placeholder: &str) -> Option<usize> {
    if placeholder.chars().all(|c| c.is_ascii_digit()) {
        placeholder.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(template: &str) -> Vec<String> {
        let segments = parse_template(template).unwrap();
        placeholders(&segments).into_iter().map(String::from).collect()
    }

    #[test]
    fn template_without_placeholders() {
        assert!(names("/models").is_empty());
        assert_eq!(
            parse_template("/models").unwrap(),
            vec![Segment::Literal("/models".into())]
        );
        assert!(parse_template("").unwrap().is_empty());
    }

    #[test]
    fn multiple_and_consecutive_placeholders() {
        assert_eq!(names("/orgs/{org}/repos/{repo}"), vec!["org", "repo"]);
        assert_eq!(names("/{a}/{b}"), vec!["a", "b"]);
        assert_eq!(names("{a}{b}"), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_placeholders_are_kept() {
        assert_eq!(names("/{id}/mirror/{id}"), vec!["id", "id"]);
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(parse_template("/users/{id").unwrap_err().contains("unclosed"));
        assert!(parse_template("/users/id}").unwrap_err().contains("unmatched"));
        assert!(parse_template("/users/{}").unwrap_err().contains("empty"));
        assert!(parse_template("/users/{{id}}").unwrap_err().contains("nested"));
    }

    #[test]
    fn positional_placeholders() {
        assert_eq!(positional_index("0"), Some(0));
        assert_eq!(positional_index("12"), Some(12));
        assert_eq!(positional_index("id"), None);
        assert_eq!(positional_index("1a"), None);
    }
}
