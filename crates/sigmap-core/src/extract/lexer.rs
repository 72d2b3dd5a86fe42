//! Python tokenizer, just precise enough to find decorators and function definitions.
//!
//! Strings and comments are consumed whole so that `@`, brackets and newlines inside them never
//! leak into the token stream. Anything the tokenizer does not recognize is a lex error, which
//! makes the whole file a parse skip.

use logos::{Lexer, Logos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(skip r"[ \t\f]+")]
#[logos(skip r"\\\r?\n")]
#[logos(skip r"#[^\r\n]*")]
pub(crate) enum Tok<'src> {
    #[regex(r"\r?\n")]
    Newline,

    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Assign,
    #[token(":")]
    Colon,

    #[token("def")]
    Def,
    #[token("async")]
    Async,
    #[token("class")]
    Class,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9A-Za-z_]*)?")]
    Number,

    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'([^'\\\r\n]|\\(.|\r?\n))*'"#)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?"([^"\\\r\n]|\\(.|\r?\n))*""#)]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?'''"#, |lex| close_triple_quote(lex, "'''"))]
    #[regex(r#"[rRbBuUfF]?[rRbBuUfF]?""""#, |lex| close_triple_quote(lex, "\"\"\""))]
    Str,

    #[token("==", |lex| lex.slice())]
    #[regex(r"[-+*/%<>&|^~!;]+=?", |lex| lex.slice())]
    Op(&'src str),
}

/// Consumes the body of a triple-quoted string up to and including the closing delimiter.
/// Returns `false` (a lex error) when the string is never closed.
fn close_triple_quote<'src>(lex: &mut Lexer<'src, Tok<'src>>, delim: &str) -> bool {
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
            continue;
        }
        if rest[i..].starts_with(delim) {
            lex.bump(i + delim.len());
            return true;
        }
    }
    false
}

/// Tokenizes `src`, returning the byte offset of the first unrecognized input on failure.
pub(crate) fn tokenize(src: &str) -> Result<Vec<(Tok<'_>, usize)>, usize> {
    let mut out = Vec::new();
    let mut lex = Tok::lexer(src);
    while let Some(tok) = lex.next() {
        match tok {
            Ok(tok) => out.push((tok, lex.span().start)),
            Err(()) => return Err(lex.span().start),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Tok<'_>> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn decorator_line_tokens() {
        assert_eq!(
            kinds("@receiver(post_save, sender=Order)\n"),
            vec![
                Tok::At,
                Tok::Ident("receiver"),
                Tok::LParen,
                Tok::Ident("post_save"),
                Tok::Comma,
                Tok::Ident("sender"),
                Tok::Assign,
                Tok::Ident("Order"),
                Tok::RParen,
                Tok::Newline,
            ]
        );
    }

    #[test]
    fn strings_and_comments_hide_their_contents() {
        let toks = kinds("x = \"@receiver(\" # @receiver(a)\ny = '''\n@receiver(b)\n'''\n");
        assert!(!toks.contains(&Tok::At));
        assert_eq!(toks.iter().filter(|t| **t == Tok::Str).count(), 2);
    }

    #[test]
    fn prefixed_strings_are_not_identifiers() {
        assert_eq!(kinds("rb'x'"), vec![Tok::Str]);
        assert_eq!(kinds("f\"{a}\""), vec![Tok::Str]);
    }

    #[test]
    fn triple_quoted_strings_may_hold_non_ascii() {
        assert_eq!(kinds("\"\"\"Met à jour le stock.\"\"\""), vec![Tok::Str]);
        assert_eq!(
            kinds("x = '''\\é'''"),
            vec![Tok::Ident("x"), Tok::Assign, Tok::Str]
        );
        assert_eq!(kinds("'''señal \\'''' "), vec![Tok::Str]);
    }

    #[test]
    fn unterminated_triple_quote_is_an_error() {
        assert!(tokenize("x = \"\"\"never closed\n").is_err());
    }

    #[test]
    fn equality_is_not_assignment() {
        assert_eq!(
            kinds("a == b"),
            vec![Tok::Ident("a"), Tok::Op("=="), Tok::Ident("b")]
        );
    }
}
