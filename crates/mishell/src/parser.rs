//! Recursive-descent parser:
//! ```text
//! pipeline := redirect ( '|' redirect )*
//! redirect := command ( Redirect Word )*
//! command  := Word Word*
//! ```

use crate::ast::Ast;
use crate::token::Token;
use mishell_common::error::ParseError;

pub fn parse(tokens: &[Token]) -> Result<Ast, ParseError> {
    let mut pos = 0;
    let first = parse_redirect(tokens, &mut pos)?;
    let mut stages = vec![first];
    while let Some(Token::Pipe) = tokens.get(pos) {
        pos += 1;
        stages.push(parse_redirect(tokens, &mut pos)?);
    }
    // The grammar above fully consumes its input by construction except
    // for a stray word following a redirect target with nothing left to
    // bind it to (e.g. "cat > out extra"); treat that the same as a
    // missing leading word.
    if pos != tokens.len() {
        return Err(ParseError::ExpectedCommand);
    }
    if stages.len() >= 2 {
        Ok(Ast::Pipeline { stages })
    } else {
        Ok(stages.into_iter().next().expect("stages always has the first redirect"))
    }
}

fn parse_redirect(tokens: &[Token], pos: &mut usize) -> Result<Ast, ParseError> {
    let mut node = parse_command(tokens, pos)?;
    while let Some(Token::Redirect { fd, append }) = tokens.get(*pos) {
        let (fd, append) = (*fd, *append);
        *pos += 1;
        match tokens.get(*pos) {
            Some(Token::Word(bytes)) => {
                *pos += 1;
                node = Ast::Redirect {
                    inner: Box::new(node),
                    fd,
                    target_path: String::from_utf8_lossy(bytes).into_owned(),
                    append,
                };
            }
            _ => return Err(ParseError::ExpectedTarget),
        }
    }
    Ok(node)
}

fn parse_command(tokens: &[Token], pos: &mut usize) -> Result<Ast, ParseError> {
    let mut arguments = Vec::new();
    while let Some(Token::Word(bytes)) = tokens.get(*pos) {
        arguments.push(String::from_utf8_lossy(bytes).into_owned());
        *pos += 1;
    }
    if arguments.is_empty() {
        return Err(ParseError::ExpectedCommand);
    }
    Ok(Ast::Command { arguments })
}
