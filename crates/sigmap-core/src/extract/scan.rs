use super::lexer::{Tok, tokenize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("unrecognized input at offset {offset}")]
    Lex { offset: usize },
    #[error("unbalanced bracket at offset {offset}")]
    Unbalanced { offset: usize },
    #[error("bracket opened at offset {offset} is never closed")]
    Unclosed { offset: usize },
}

/// A `@receiver(event, sender=...)` decorator attached to a plain function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverBinding {
    pub event: String,
    pub sender: String,
    pub function: String,
}

type Line<'src> = Vec<Tok<'src>>;

/// Splits the token stream into logical lines. Newlines inside brackets do not end a line, the
/// same way Python joins them implicitly.
fn logical_lines<'src>(tokens: Vec<(Tok<'src>, usize)>) -> Result<Vec<Line<'src>>, ScanError> {
    let mut lines = Vec::new();
    let mut cur: Line<'src> = Vec::new();
    let mut open: Vec<(Tok<'src>, usize)> = Vec::new();

    for (tok, offset) in tokens {
        match tok {
            Tok::LParen | Tok::LBracket | Tok::LBrace => open.push((tok, offset)),
            Tok::RParen | Tok::RBracket | Tok::RBrace => {
                let expected = match open.pop() {
                    Some((Tok::LParen, _)) => Tok::RParen,
                    Some((Tok::LBracket, _)) => Tok::RBracket,
                    Some((Tok::LBrace, _)) => Tok::RBrace,
                    _ => return Err(ScanError::Unbalanced { offset }),
                };
                if tok != expected {
                    return Err(ScanError::Unbalanced { offset });
                }
            }
            Tok::Newline => {
                if open.is_empty() && !cur.is_empty() {
                    lines.push(std::mem::take(&mut cur));
                }
                continue;
            }
            _ => {}
        }
        cur.push(tok);
    }

    if let Some((_, offset)) = open.first() {
        return Err(ScanError::Unclosed { offset: *offset });
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    Ok(lines)
}

fn depth_delta(tok: Tok<'_>) -> i32 {
    match tok {
        Tok::LParen | Tok::LBracket | Tok::LBrace => 1,
        Tok::RParen | Tok::RBracket | Tok::RBrace => -1,
        _ => 0,
    }
}

/// Splits call arguments on top-level commas. Empty trailing arguments are dropped.
fn split_args<'a, 'src>(toks: &'a [Tok<'src>]) -> Vec<&'a [Tok<'src>]> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, tok) in toks.iter().enumerate() {
        depth += depth_delta(*tok);
        if depth == 0 && *tok == Tok::Comma {
            out.push(&toks[start..i]);
            start = i + 1;
        }
    }
    out.push(&toks[start..]);
    out.retain(|arg| !arg.is_empty());
    out
}

/// Names that parse as constants rather than variable references.
fn is_constant_name(name: &str) -> bool {
    matches!(name, "None" | "True" | "False")
}

/// Keywords that build a boolean, conditional, comparison or lambda expression around operands.
fn is_operator_keyword(name: &str) -> bool {
    matches!(
        name,
        "or" | "and" | "not" | "if" | "else" | "in" | "is" | "lambda" | "await"
    )
}

/// A bare variable reference (`post_save`).
fn as_name<'src>(expr: &[Tok<'src>]) -> Option<&'src str> {
    match expr {
        [Tok::Ident(name)] if !is_constant_name(name) => Some(*name),
        _ => None,
    }
}

/// The attribute of an attribute access (`models.Order` -> `Order`). The access must be the
/// outermost operation of the expression, so `a.b + c.d` does not qualify.
fn as_attribute<'src>(expr: &[Tok<'src>]) -> Option<&'src str> {
    let [head @ .., Tok::Dot, Tok::Ident(attr)] = expr else {
        return None;
    };
    if head.is_empty() {
        return None;
    }
    let mut depth = 0i32;
    for tok in head {
        depth += depth_delta(*tok);
        let top_level_operator = match tok {
            Tok::Op(_) | Tok::Assign | Tok::Colon | Tok::Comma | Tok::Def | Tok::Class => true,
            Tok::Ident(name) => is_operator_keyword(name),
            _ => false,
        };
        if depth == 0 && top_level_operator {
            return None;
        }
    }
    Some(*attr)
}

#[derive(Debug, Default)]
struct ReceiverDecorator<'src> {
    event: Option<&'src str>,
    sender: Option<&'src str>,
}

/// Parses the tokens following `@`. Returns `None` unless the decorator is a call to the bare
/// name `receiver`.
fn parse_receiver_decorator<'src>(expr: &[Tok<'src>]) -> Option<ReceiverDecorator<'src>> {
    let [Tok::Ident("receiver"), Tok::LParen, inner @ .., Tok::RParen] = expr else {
        return None;
    };
    // `@receiver(a)(b)` slices as `a)(b`; the first call must span the whole expression.
    let mut depth = 0i32;
    for tok in inner {
        depth += depth_delta(*tok);
        if depth < 0 {
            return None;
        }
    }

    let mut out = ReceiverDecorator::default();
    let mut seen_positional = false;
    for arg in split_args(inner) {
        match arg {
            [Tok::Ident(key), Tok::Assign, value @ ..] => {
                if *key == "sender" {
                    out.sender = as_name(value).or_else(|| as_attribute(value));
                }
            }
            [Tok::Op(op), ..] if op.starts_with("**") => {}
            _ => {
                if !seen_positional {
                    out.event = as_name(arg);
                    seen_positional = true;
                }
            }
        }
    }
    Some(out)
}

/// Finds every receiver binding in one Python source file.
///
/// Fails when the file cannot be tokenized or its brackets do not balance; callers treat that as
/// "skip this file" and keep nothing from it.
pub fn scan_source(src: &str) -> Result<Vec<ReceiverBinding>, ScanError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let tokens = tokenize(src).map_err(|offset| ScanError::Lex { offset })?;
    let lines = logical_lines(tokens)?;

    let mut out = Vec::new();
    let mut pending: Vec<ReceiverDecorator<'_>> = Vec::new();
    let mut decorated = false;
    for line in &lines {
        match line.as_slice() {
            [Tok::At, expr @ ..] => {
                decorated = true;
                if let Some(deco) = parse_receiver_decorator(expr) {
                    pending.push(deco);
                }
            }
            [Tok::Def, Tok::Ident(function), ..] if decorated => {
                for deco in pending.drain(..) {
                    if let (Some(event), Some(sender)) = (deco.event, deco.sender) {
                        out.push(ReceiverBinding {
                            event: event.to_string(),
                            sender: sender.to_string(),
                            function: function.to_string(),
                        });
                    }
                }
                decorated = false;
            }
            _ => {
                pending.clear();
                decorated = false;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(event: &str, sender: &str, function: &str) -> ReceiverBinding {
        ReceiverBinding {
            event: event.to_string(),
            sender: sender.to_string(),
            function: function.to_string(),
        }
    }

    #[test]
    fn finds_simple_receiver() {
        let src = "\
from django.dispatch import receiver

@receiver(post_save, sender=Order)
def update_inventory(sender, instance, **kwargs):
    pass
";
        assert_eq!(
            scan_source(src).unwrap(),
            vec![binding("post_save", "Order", "update_inventory")]
        );
    }

    #[test]
    fn attribute_sender_uses_last_attribute() {
        let src = "@receiver(pre_delete, sender=auth.models.User)\ndef cleanup(sender, **kw):\n    pass\n";
        assert_eq!(
            scan_source(src).unwrap(),
            vec![binding("pre_delete", "User", "cleanup")]
        );
    }

    #[test]
    fn stacked_decorators_all_bind_to_the_function() {
        let src = "\
@receiver(post_save, sender=Order)
@other_decorator
@receiver(post_delete, sender=Order)
def sync(sender, **kw):
    pass
";
        assert_eq!(
            scan_source(src).unwrap(),
            vec![
                binding("post_save", "Order", "sync"),
                binding("post_delete", "Order", "sync"),
            ]
        );
    }

    #[test]
    fn multiline_decorator_arguments() {
        let src = "@receiver(\n    post_save,\n    sender=Order,\n    dispatch_uid='x',\n)\ndef f(sender, **kw):\n    pass\n";
        assert_eq!(scan_source(src).unwrap(), vec![binding("post_save", "Order", "f")]);
    }

    #[test]
    fn requires_both_event_name_and_sender() {
        let src = "\
@receiver(post_save)
def no_sender(**kw):
    pass

@receiver([post_save, post_delete], sender=Order)
def list_event(**kw):
    pass

@receiver(post_save, sender='app.Order')
def string_sender(**kw):
    pass

@receiver(signals.post_save, sender=Order)
def attribute_event(**kw):
    pass
";
        assert!(scan_source(src).unwrap().is_empty());
    }

    #[test]
    fn ignores_non_plain_functions_and_qualified_receiver() {
        let src = "\
@receiver(post_save, sender=Order)
class NotAFunction:
    pass

@receiver(post_save, sender=Order)
async def coroutine(**kw):
    pass

@dispatch.receiver(post_save, sender=Order)
def qualified(**kw):
    pass
";
        assert!(scan_source(src).unwrap().is_empty());
    }

    #[test]
    fn sender_wrapped_in_an_expression_is_not_an_attribute() {
        let src = "\
@receiver(post_save, sender=a or b.Order)
def boolean(**kw):
    pass

@receiver(post_save, sender=x if c else y.Order)
def conditional(**kw):
    pass

@receiver(post_save, sender=not m.Order)
def negated(**kw):
    pass

@receiver(post_save, sender=get_models()[0].Order)
def subscripted(**kw):
    pass
";
        assert_eq!(
            scan_source(src).unwrap(),
            vec![binding("post_save", "Order", "subscripted")]
        );
    }

    #[test]
    fn nested_methods_are_found() {
        let src = "\
class Handlers:
    @receiver(post_save, sender=Order)
    def on_save(self, **kw):
        pass
";
        assert_eq!(
            scan_source(src).unwrap(),
            vec![binding("post_save", "Order", "on_save")]
        );
    }

    #[test]
    fn unbalanced_brackets_fail_the_file() {
        assert_eq!(
            scan_source("@receiver(post_save, sender=Order\ndef f():\n    pass\n"),
            Err(ScanError::Unclosed { offset: 9 })
        );
        assert!(matches!(
            scan_source("x = (1]\n"),
            Err(ScanError::Unbalanced { .. })
        ));
    }
}
