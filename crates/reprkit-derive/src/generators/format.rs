//! Format templates.
//!
//! A template rewrites part of a string form:
//! - `{}` - the next argument, `{0}` / `{1}` - an argument by position
//! - `{{` / `}}` - literal braces
//!
//! What the arguments are depends on where the template is declared, see
//! [`TemplateKind`]. Templates are parsed while expanding the derive, so a
//! malformed template is a compile error rather than a runtime failure.

use proc_macro2::TokenStream;
use quote::quote;

/// Where a template is declared, which fixes its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// On a field: `{0}` is the rendered value and must appear.
    Field,
    /// On a variant: `{0}` is the variant name.
    Variant,
    /// On the type: `{0}` is the type name, `{1}` the fields or the variant.
    Container,
}

impl TemplateKind {
    fn arity(self) -> usize {
        match self {
            TemplateKind::Field | TemplateKind::Variant => 1,
            TemplateKind::Container => 2,
        }
    }
}

/// Parsed template segment.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatPiece {
    /// Literal text, output as-is.
    Literal(String),
    /// Positional argument.
    Arg(usize),
}

/// Errors that can occur during template parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unclosed brace in template.
    UnclosedBrace { position: usize },
    /// `}` with no matching `{`.
    UnmatchedClose { position: usize },
    /// Anything other than `{}` or `{N}` between braces.
    InvalidPlaceholder { content: String },
    /// Placeholder refers to an argument the template does not have.
    ArgumentOutOfRange { index: usize, available: usize },
    /// Field template never mentions the value.
    MissingValue,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnclosedBrace { position } => {
                write!(f, "unclosed '{{' at position {}", position)
            }
            ParseError::UnmatchedClose { position } => {
                write!(f, "unmatched '}}' at position {}, use '}}}}' for a literal brace", position)
            }
            ParseError::InvalidPlaceholder { content } => {
                write!(f, "invalid placeholder '{{{}}}': use '{{}}' or a position like '{{0}}'", content)
            }
            ParseError::ArgumentOutOfRange { index, available } => write!(
                f,
                "placeholder {{{}}} is out of range, this template takes {} argument(s)",
                index, available
            ),
            ParseError::MissingValue => write!(f, "format template must contain '{{}}'"),
        }
    }
}

/// Parse a format template into pieces.
///
/// # Examples
///
/// ```ignore
/// let pieces = parse_template("A[{}]", TemplateKind::Field)?;
/// assert_eq!(pieces, vec![
///     FormatPiece::Literal("A[".into()),
///     FormatPiece::Arg(0),
///     FormatPiece::Literal("]".into()),
/// ]);
/// ```
pub fn parse_template(template: &str, kind: TemplateKind) -> Result<Vec<FormatPiece>, ParseError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut next_arg = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|(_, c)| *c) == Some('{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().map(|(_, c)| *c) == Some('}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut content = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == '}' {
                        closed = true;
                        break;
                    }
                    content.push(ch);
                }
                if !closed {
                    return Err(ParseError::UnclosedBrace { position: i });
                }
                let content = content.trim();
                let index = if content.is_empty() {
                    next_arg += 1;
                    next_arg - 1
                } else {
                    content.parse::<usize>().map_err(|_| ParseError::InvalidPlaceholder {
                        content: content.to_string(),
                    })?
                };
                if index >= kind.arity() {
                    return Err(ParseError::ArgumentOutOfRange {
                        index,
                        available: kind.arity(),
                    });
                }
                if !literal.is_empty() {
                    pieces.push(FormatPiece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(FormatPiece::Arg(index));
            }
            '}' => return Err(ParseError::UnmatchedClose { position: i }),
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        pieces.push(FormatPiece::Literal(literal));
    }
    if kind == TemplateKind::Field && !pieces.contains(&FormatPiece::Arg(0)) {
        return Err(ParseError::MissingValue);
    }

    Ok(pieces)
}

/// Generate a `&'static [FormatSegment]` expression for parsed pieces.
pub fn generate_segments(pieces: &[FormatPiece], root: &syn::Path) -> TokenStream {
    let segments = pieces.iter().map(|piece| match piece {
        FormatPiece::Literal(text) => quote! { #root::FormatSegment::Literal(#text) },
        FormatPiece::Arg(index) => quote! { #root::FormatSegment::Arg(#index) },
    });

    quote! {
        {
            const FORMAT: &[#root::FormatSegment] = &[#(#segments),*];
            FORMAT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_only() {
        assert_eq!(
            parse_template("{}", TemplateKind::Field).unwrap(),
            vec![FormatPiece::Arg(0)]
        );
    }

    #[test]
    fn test_parse_wrapped_value() {
        let pieces = parse_template("A[{}]", TemplateKind::Field).unwrap();
        assert_eq!(
            pieces,
            vec![
                FormatPiece::Literal("A[".into()),
                FormatPiece::Arg(0),
                FormatPiece::Literal("]".into()),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        let pieces = parse_template("{{{}}}", TemplateKind::Field).unwrap();
        assert_eq!(
            pieces,
            vec![
                FormatPiece::Literal("{".into()),
                FormatPiece::Arg(0),
                FormatPiece::Literal("}".into()),
            ]
        );
    }

    #[test]
    fn test_parse_repeated_value_by_position() {
        let pieces = parse_template("{0} / {0}", TemplateKind::Field).unwrap();
        assert_eq!(
            pieces,
            vec![
                FormatPiece::Arg(0),
                FormatPiece::Literal(" / ".into()),
                FormatPiece::Arg(0),
            ]
        );
        assert_eq!(
            parse_template("{} / {}", TemplateKind::Field),
            Err(ParseError::ArgumentOutOfRange {
                index: 1,
                available: 1
            })
        );
    }

    #[test]
    fn test_parse_container_arguments() {
        assert_eq!(
            parse_template("Enum: {}.{}", TemplateKind::Container).unwrap(),
            vec![
                FormatPiece::Literal("Enum: ".into()),
                FormatPiece::Arg(0),
                FormatPiece::Literal(".".into()),
                FormatPiece::Arg(1),
            ]
        );
        assert_eq!(
            parse_template("{1}", TemplateKind::Container).unwrap(),
            vec![FormatPiece::Arg(1)]
        );
        assert!(matches!(
            parse_template("{}{}{}", TemplateKind::Container),
            Err(ParseError::ArgumentOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn test_variant_and_container_templates_may_omit_arguments() {
        assert_eq!(
            parse_template("New York", TemplateKind::Variant).unwrap(),
            vec![FormatPiece::Literal("New York".into())]
        );
        assert_eq!(parse_template("", TemplateKind::Container).unwrap(), vec![]);
    }

    #[test]
    fn test_unclosed_brace_error() {
        assert_eq!(
            parse_template("A[{", TemplateKind::Field),
            Err(ParseError::UnclosedBrace { position: 2 })
        );
    }

    #[test]
    fn test_unmatched_close_error() {
        assert_eq!(
            parse_template("{}]}", TemplateKind::Field),
            Err(ParseError::UnmatchedClose { position: 3 })
        );
    }

    #[test]
    fn test_named_placeholder_error() {
        assert!(matches!(
            parse_template("{self.name}", TemplateKind::Field),
            Err(ParseError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    fn test_missing_value_error() {
        assert_eq!(
            parse_template("{{}}", TemplateKind::Field),
            Err(ParseError::MissingValue)
        );
        assert_eq!(
            parse_template("", TemplateKind::Field),
            Err(ParseError::MissingValue)
        );
    }
}
