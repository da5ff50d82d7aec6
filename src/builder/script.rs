//! Textual action scripts.
//!
//! A script is the recorded action stream of an external grammar, one action
//! per line, replayed onto a fresh [`Builder`]. `#` starts a comment that runs
//! to the end of the line. Besides the plain actions, `expr <words>` opens an
//! expression, feeds it whitespace separated operators and literals and ends
//! it again. `rewind` holds the nodes it pops until `reattach` puts them
//! back on top.

use super::{Build, BuildError, Builder};
use crate::ast::Node;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown action `{action}`")]
    UnknownAction { line: usize, action: String },
    #[error("line {line}: `{action}` needs an argument")]
    MissingArgument { line: usize, action: String },
    #[error("line {line}: {source}")]
    Build {
        line: usize,
        #[source]
        source: BuildError,
    },
    #[error("{0}")]
    Finish(#[from] BuildError),
}

const OPERATORS: [&str; 16] = [
    "==", "!=", ">", "<", ">=", "<=", "+", "-", "*", "/", "^", "%", "!", "neg", "(", ")",
];

fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if q == c => quote = None,
            (None, '#') => return &line[..i],
            _ => (),
        }
    }
    line
}

/// Replays every action in `source` and finishes the construction.
pub fn replay(source: &str) -> Result<Build, ScriptError> {
    let mut builder = Builder::new();
    let mut held = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        let (action, argument) = match text.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (text, None),
        };
        apply(&mut builder, &mut held, line, action, argument)?;
    }
    Ok(builder.finish()?)
}

fn required<'a>(
    line: usize,
    action: &str,
    argument: Option<&'a str>,
) -> Result<&'a str, ScriptError> {
    argument.ok_or_else(|| ScriptError::MissingArgument {
        line,
        action: action.to_owned(),
    })
}

fn apply(
    builder: &mut Builder,
    held: &mut Vec<Node>,
    line: usize,
    action: &str,
    argument: Option<&str>,
) -> Result<(), ScriptError> {
    let fatal = |source| ScriptError::Build { line, source };
    match action {
        "begin-program" => builder.begin_program(),
        "begin-function" => builder.begin_function(),
        "begin-block" => builder.begin_block(),
        "begin-assignment" => builder.begin_assignment(),
        "begin-return" => builder.begin_return(),
        "begin-break" => builder.begin_break(),
        "begin-loop-exit" => builder.begin_loop_exit(),
        "begin-loop" => builder.begin_loop(),
        "begin-conditional" => builder.begin_conditional(),
        "begin-switch" => builder.begin_switch(),
        "begin-switch-block" => builder.begin_switch_block(),
        "begin-expression" => builder.begin_expression(),
        "end-expression" => builder.end_expression().map_err(fatal)?,
        "literal" => builder.append_literal(required(line, action, argument)?),
        "operator" => {
            let argument = required(line, action, argument)?;
            let (operator, unary) = match argument.split_once(char::is_whitespace) {
                Some((operator, flag)) => (operator, flag.trim() == "unary"),
                None => (argument, false),
            };
            builder.append_operator(operator, unary);
        }
        "identifier-token" => builder.append_identifier_token(),
        "call" => builder.append_call(),
        "begin-identifier" => builder.begin_identifier(),
        "identifier-to-call" => builder.identifier_to_call(),
        "case" => match argument {
            Some(words) => {
                builder.begin_expression();
                feed(builder, words);
                builder.end_expression().map_err(fatal)?;
                if let Some(value) = builder.pop_expression() {
                    builder.begin_switch_case(Some(value));
                }
            }
            None => builder.begin_switch_case(None),
        },
        "end-case" => builder.end_switch_case(),
        "name" => builder.set_name(required(line, action, argument)?),
        "param" => builder.add_parameter(required(line, action, argument)?),
        "attach" => builder.attach(),
        "waypoint" => builder.waypoint(),
        "rewind" => {
            let rewound = builder.rewind().map_err(fatal)?;
            log::debug!("line {line}: rewind held {} nodes", rewound.len());
            *held = rewound;
        }
        "reattach" => builder.reattach(std::mem::take(held)),
        "expr" => {
            let words = required(line, action, argument)?;
            builder.begin_expression();
            feed(builder, words);
            builder.end_expression().map_err(fatal)?;
        }
        other => {
            return Err(ScriptError::UnknownAction {
                line,
                action: other.to_owned(),
            })
        }
    }
    Ok(())
}

/// Appends words to the open expression: known operator symbols as
/// operators, `~` as unary minus, anything else as a literal.
fn feed(builder: &mut Builder, words: &str) {
    for word in words.split_whitespace() {
        if word == "~" {
            builder.append_operator("-", true);
        } else if OPERATORS.contains(&word) {
            builder.append_operator(word, false);
        } else {
            builder.append_literal(word);
        }
    }
}
